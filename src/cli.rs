//! CLI definition and parsing.
//!
//! Notes:
//! - Runs simulate by default; `--for-real` is required to touch the filesystem.
//! - --debug is a shorthand for --log-level debug.

use clap::{ArgAction, Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{CollisionPolicy, Config, LogLevel};
use crate::errors::TagMoveError;
use crate::format::PathConversion;

fn parse_conversion(s: &str) -> Result<PathConversion, TagMoveError> {
    s.parse()
}

/// Rename and reorganize music files from their tags.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Rename and organize music files using their tags",
    after_help = "Format tokens: %a artist, %b album, %c comment, %d disc number, %e encoded by, \
%g genre, %l track total, %n track number (2 digits), %o original artist, %p composer, \
%r copyright, %t title, %u url, %x disc total, %y date, %z album artist (or artist), %% percent.\n\
Relative formats are resolved against each file's directory; start with ./ or ../ to resolve \
against the working directory. The file extension is appended automatically."
)]
pub struct Args {
    /// Files and/or directories to process (directories recursively).
    #[arg(value_name = "PATH", value_hint = ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Destination format string, e.g. "%z/%b/%n-%t".
    #[arg(long, value_name = "FMT")]
    pub format: Option<String>,

    /// Only print what would be done (default).
    #[arg(short = 's', long, conflicts_with = "for_real")]
    pub simulate: bool,

    /// Actually move files and remove emptied directories.
    #[arg(short = 'f', long = "for-real")]
    pub for_real: bool,

    /// Character policy for tag values: posix, windows-ascii or utf-8.
    #[arg(long, value_name = "MODE", value_parser = parse_conversion)]
    pub path_conversion: Option<PathConversion>,

    /// Abort the whole run when a destination already exists (default: skip the file).
    #[arg(long)]
    pub exit_on_duplicate: bool,

    /// Print no-op notices; repeat (-vv) to dump the tags of every file.
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long)]
    pub json: bool,

    /// Print the config file location in use and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Write a template config file (if none exists) and exit.
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(f) = &self.format {
            cfg.format = Some(f.clone());
        }
        if let Some(pc) = self.path_conversion {
            cfg.path_conversion = pc;
        }
        if self.exit_on_duplicate {
            cfg.on_collision = CollisionPolicy::Abort;
        }
        if self.for_real {
            cfg.simulate = false;
        } else if self.simulate {
            cfg.simulate = true;
        }
        if self.verbose >= 1 {
            cfg.verbose = true;
        }
        if self.verbose >= 2 {
            cfg.very_verbose = true;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
