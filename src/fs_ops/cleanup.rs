//! Empty-directory detection and removal.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::Path;

use super::helpers::{io_error_with_help, io_error_with_help_io};

/// True when `dir` holds nothing but (recursively) empty directories.
/// Files and symlinks of any kind make it non-empty.
pub fn is_effectively_empty(dir: &Path) -> io::Result<bool> {
    for entry in fs::read_dir(dir).map_err(io_error_with_help_io("read directory", dir))? {
        let entry = entry?;
        let ft = entry.file_type()?;
        if !ft.is_dir() || !is_effectively_empty(&entry.path())? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Remove `dir` and its empty subdirectories, deepest first.
/// Uses `remove_dir`, so a file that appeared in the meantime makes this fail
/// instead of being deleted.
pub fn remove_empty_tree(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(io_error_with_help("read directory", dir))? {
        let entry = entry.map_err(io_error_with_help("read directory entry", dir))?;
        let ft = entry
            .file_type()
            .map_err(io_error_with_help("stat entry", &entry.path()))?;
        if ft.is_dir() {
            remove_empty_tree(&entry.path())?;
        }
    }
    fs::remove_dir(dir).map_err(io_error_with_help("remove directory", dir))
}
