//! Platform-specific helpers.
//! Hides Unix/Windows differences for the few places that care about file
//! modes: the log file and the generated config file.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{open_log_file_secure_append, set_dir_mode_0700, write_config_secure_new_0600};

#[cfg(not(unix))]
pub use windows::{open_log_file_secure_append, set_dir_mode_0700, write_config_secure_new_0600};

/// Hidden sibling name for an atomic write of `target`.
fn tmp_sibling_name(target: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    target
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!(".tagmove.config.tmp.{pid}.{nanos}"))
}
