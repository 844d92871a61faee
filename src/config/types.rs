//! Core configuration types.
//! - Config holds run-level settings with safe defaults (simulate on).
//! - LogLevel and CollisionPolicy are small enums with string parsing.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::TagMoveError;
use crate::format::PathConversion;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    #[default]
    Normal,
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// What to do when a computed destination is already taken by another file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Warn, leave the source where it is and carry on.
    #[default]
    Skip,
    /// Stop the whole run.
    Abort,
}

impl CollisionPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" | "warn" | "continue" => Some(CollisionPolicy::Skip),
            "abort" | "exit" | "fail" => Some(CollisionPolicy::Abort),
            _ => None,
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CollisionPolicy::Skip => "skip",
            CollisionPolicy::Abort => "abort",
        })
    }
}

impl FromStr for CollisionPolicy {
    type Err = TagMoveError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TagMoveError::InvalidCollisionPolicy(s.to_string()))
    }
}

/// Run-level settings consumed by the walker and mover.
#[derive(Debug, Clone)]
pub struct Config {
    /// Format string with `%x` tokens
    pub format: Option<String>,
    /// Character policy for substituted tag values
    pub path_conversion: PathConversion,
    pub on_collision: CollisionPolicy,
    /// Report planned moves/removals without touching the filesystem
    pub simulate: bool,
    /// Print no-op notices ("No change", "No tag found")
    pub verbose: bool,
    /// Also print a tag dump for every file considered
    pub very_verbose: bool,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: None,
            path_conversion: PathConversion::default(),
            on_collision: CollisionPolicy::default(),
            simulate: true,
            verbose: false,
            very_verbose: false,
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}

impl Config {
    /// A config with `format` set and every other field at its default.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
            ..Default::default()
        }
    }

    /// Builder-style: turn simulate mode off.
    pub fn for_real(mut self) -> Self {
        self.simulate = false;
        self
    }
}
