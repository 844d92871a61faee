//! Core library for `tagmove`.
//!
//! Renames and reorganizes music files from their tags: a format string such
//! as `%z/%b/%n-%t` is expanded per file, sanitized for the target
//! filesystem and used as the file's new path. Directories emptied by the
//! run are removed afterwards.
//!
//! ```no_run
//! use tagmove::prelude::*;
//!
//! let cfg = Config::new("%z/%b/%n-%t");
//! let format = StaticFormat(cfg.template()?);
//! let walker = TreeWalker::new(&cfg, &LoftyProvider, &format);
//! walker.run(&["/music/incoming"])?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod format;
pub mod fs_ops;
pub mod metadata;
pub mod output;
pub mod platform;

pub use config::{
    CollisionPolicy, Config, LogLevel, default_config_path, default_log_path,
    path_has_symlink_ancestor,
};
pub use errors::TagMoveError;
pub use format::{PathConversion, Template};
pub use fs_ops::{MoveKind, MoveOutcome, TraversalResult, TreeWalker, move_file};
pub use metadata::{Field, LoftyProvider, MetadataProvider, MetadataRecord};

pub mod prelude {
    pub use crate::config::{CollisionPolicy, Config, LogLevel, default_config_path};
    pub use crate::errors::TagMoveError;
    pub use crate::format::{
        FormatSource, PathConversion, ScriptedFormat, StaticFormat, Template, resolve_destination,
        sanitize,
    };
    pub use crate::fs_ops::{MoveKind, MoveOutcome, TraversalResult, TreeWalker, move_file};
    pub use crate::metadata::{Field, LoftyProvider, MetadataProvider, MetadataRecord};
    pub use anyhow::Result;
}
