//! Rename with a best-effort fsync of the destination directory (Unix).
//! Returns the raw `io::Error` so callers can recognise EXDEV.

use std::fs;
use std::io;
use std::path::Path;

pub fn try_atomic_move(src: &Path, dst: &Path) -> io::Result<()> {
    fs::rename(src, dst)?;

    // A failed fsync must not turn a completed rename into an error.
    if let Some(parent) = dst.parent() {
        let _ = super::util::fsync_dir(parent);
    }
    Ok(())
}
