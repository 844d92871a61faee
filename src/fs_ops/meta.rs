//! Carry permissions and timestamps over to a copied file.

use anyhow::Result;
use filetime::{FileTime, set_file_times};
use std::fs;
use std::path::Path;
use tracing::trace;

use super::helpers::io_error_with_help;

pub(super) fn preserve_metadata(src: &Path, dest: &Path) -> Result<()> {
    let meta = fs::metadata(src).map_err(io_error_with_help("stat source", src))?;

    fs::set_permissions(dest, meta.permissions())
        .map_err(io_error_with_help("set permissions", dest))?;

    let mtime = FileTime::from_last_modification_time(&meta);
    let atime = FileTime::from_last_access_time(&meta);
    if let Err(e) = set_file_times(dest, atime, mtime) {
        // Some filesystems (e.g. FAT on removable players) reject atime updates.
        trace!(path = %dest.display(), error = %e, "Could not restore timestamps");
    }
    Ok(())
}
