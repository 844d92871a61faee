//! Typed error definitions for tagmove.
//! Provides a small set of well-known fatal failure modes for better logs and tests.
//!
//! Recoverable per-file situations (no tag, unchanged path, skipped collision)
//! are not errors; they are reported through `fs_ops::MoveOutcome`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TagMoveError {
    #[error("Malformed format string '{template}': {reason}")]
    MalformedTemplate { template: String, reason: String },

    #[error("Tried to move '{}' to '{}', but that path already exists", from.display(), to.display())]
    PathUniquenessViolation { from: PathBuf, to: PathBuf },

    #[error("No format string or script specified")]
    MissingFormat,

    #[error("No path(s) specified")]
    NoPaths,

    #[error("Unknown path-conversion value '{0}' (expected posix, windows-ascii or utf-8)")]
    InvalidPathConversion(String),

    #[error("Unknown collision policy '{0}' (expected skip or abort)")]
    InvalidCollisionPolicy(String),
}

impl TagMoveError {
    /// Stable numeric code, emitted as a structured log field.
    pub fn code(&self) -> u16 {
        match self {
            TagMoveError::MalformedTemplate { .. } => 10,
            TagMoveError::PathUniquenessViolation { .. } => 20,
            TagMoveError::MissingFormat => 30,
            TagMoveError::NoPaths => 31,
            TagMoveError::InvalidPathConversion(_) => 32,
            TagMoveError::InvalidCollisionPolicy(_) => 33,
        }
    }

    /// Short machine-friendly name for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            TagMoveError::MalformedTemplate { .. } => "malformed_template",
            TagMoveError::PathUniquenessViolation { .. } => "path_uniqueness_violation",
            TagMoveError::MissingFormat => "missing_format",
            TagMoveError::NoPaths => "no_paths",
            TagMoveError::InvalidPathConversion(_) => "invalid_path_conversion",
            TagMoveError::InvalidCollisionPolicy(_) => "invalid_collision_policy",
        }
    }
}
