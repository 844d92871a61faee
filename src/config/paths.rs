//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/log paths and detects symlinked ancestors for safety.

use anyhow::{Result, anyhow};
use dirs::{config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file (or a directory holding `config.xml`).
pub const CONFIG_ENV: &str = "TAGMOVE_CONFIG";

const APP_DIR: &str = "tagmove";
const CONFIG_FILE: &str = "config.xml";

/// Config path in use: `$TAGMOVE_CONFIG` if set, else the per-user config dir.
///
/// A relative `$TAGMOVE_CONFIG` is taken relative to the CWD; a directory means
/// `<dir>/config.xml`.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(raw) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        let mut p = PathBuf::from(raw);
        if p.is_relative() {
            p = env::current_dir()?.join(p);
        }
        if p.is_dir() {
            p.push(CONFIG_FILE);
        }
        return Ok(p);
    }

    let base = config_dir()
        .or_else(|| env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok_or_else(|| anyhow!("cannot determine a config directory (no HOME?)"))?;
    Ok(base.join(APP_DIR).join(CONFIG_FILE))
}

/// Suggested log file location (per-user data dir). Does not create anything.
pub fn default_log_path() -> Result<PathBuf> {
    let base = data_dir()
        .or_else(|| env::var_os("HOME").map(|h| PathBuf::from(h).join(".local").join("share")))
        .ok_or_else(|| anyhow!("cannot determine a data directory (no HOME?)"))?;
    Ok(base.join(APP_DIR).join("tagmove.log"))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.as_os_str().is_empty() {
            break;
        }
        match fs::symlink_metadata(anc) {
            Ok(meta) if meta.file_type().is_symlink() => return Ok(true),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        p = anc.parent();
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn plain_ancestors_are_not_symlinks() {
        let td = tempdir().unwrap();
        let p = td.path().join("a/b/config.xml");
        assert!(!path_has_symlink_ancestor(&p).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_ancestor_is_detected() {
        let td = tempdir().unwrap();
        let real = td.path().join("real");
        fs::create_dir(&real).unwrap();
        let link = td.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        assert!(path_has_symlink_ancestor(&link.join("tagmove.log")).unwrap());
    }

    #[test]
    fn log_path_is_under_app_dir() {
        if let Ok(p) = default_log_path() {
            assert!(p.ends_with("tagmove/tagmove.log"));
        }
    }
}
