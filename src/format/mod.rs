//! Format-string handling: token expansion, value sanitizing and destination resolution.

pub mod resolve;
pub mod sanitize;
pub mod source;
pub mod template;

pub use resolve::{normalize_lexically, resolve_destination};
pub use sanitize::{PathConversion, sanitize};
pub use source::{FormatSource, ScriptedFormat, StaticFormat};
pub use template::{Template, Token, expand};
