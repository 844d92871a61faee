//! Config module.
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{CONFIG_ENV, default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{CollisionPolicy, Config, LogLevel};
pub use xml::{XmlConfig, create_template_config, load_config, load_config_from_xml_path};
