//! Single-file move with collision policy.
//! Tries a plain rename first; across filesystems falls back to copy + remove.
//! In simulate mode the same report lines are printed and nothing is touched.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::{CollisionPolicy, Config};
use crate::errors::TagMoveError;
use crate::output as out;

use super::atomic::try_atomic_move;
use super::copy::safe_copy_and_rename;
use super::helpers::io_error_with_help;
use super::util::is_cross_device;

/// Where a moved file ended up relative to where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Same directory, new name.
    Renamed,
    /// Into a subdirectory of its original directory.
    MovedWithinTree,
    /// Somewhere outside its original directory.
    MovedOutOfTree,
}

/// Per-file result. Fatal conditions are returned as `Err` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The file carries no recognizable tag; left alone.
    NoTag,
    /// Already at its computed destination.
    Unchanged,
    /// Destination taken by another file; source left in place.
    CollisionSkipped { destination: PathBuf },
    Moved { destination: PathBuf, kind: MoveKind },
}

impl MoveOutcome {
    /// True when the file no longer lives under its original directory.
    pub fn left_parent(&self) -> bool {
        matches!(
            self,
            MoveOutcome::Moved {
                kind: MoveKind::MovedOutOfTree,
                ..
            }
        )
    }
}

/// Classify `src -> dest` by comparing parent directories component-wise.
pub fn classify(src: &Path, dest: &Path) -> MoveKind {
    let src_parent = src.parent().unwrap_or_else(|| Path::new(""));
    let dest_parent = dest.parent().unwrap_or_else(|| Path::new(""));
    if src_parent == dest_parent {
        MoveKind::Renamed
    } else if dest_parent.starts_with(src_parent) {
        MoveKind::MovedWithinTree
    } else {
        MoveKind::MovedOutOfTree
    }
}

fn report_line(src: &Path, dest: &Path) -> String {
    let same_dir = src.parent() == dest.parent();
    let same_name = src.file_name() == dest.file_name();
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = dest.parent().unwrap_or_else(|| Path::new(""));
    match (same_dir, same_name) {
        (true, _) => format!("Rename {} to {}", src.display(), name),
        (false, true) => format!("Move {} to {}", src.display(), dir.display()),
        (false, false) => format!("Move/rename {} to {}", src.display(), dest.display()),
    }
}

/// Move `src` to `dest` honouring `config.on_collision` and `config.simulate`.
pub fn move_file(config: &Config, src: &Path, dest: &Path) -> Result<MoveOutcome> {
    move_file_with(config, src, dest, |p| fs::symlink_metadata(p).is_ok())
}

/// `move_file` with the "destination taken?" test supplied by the caller.
pub(crate) fn move_file_with<F>(
    config: &Config,
    src: &Path,
    dest: &Path,
    occupied: F,
) -> Result<MoveOutcome>
where
    F: Fn(&Path) -> bool,
{
    if src == dest {
        if config.verbose {
            out::print_user(&format!("No change in path for {}", src.display()));
        }
        return Ok(MoveOutcome::Unchanged);
    }

    if occupied(dest) {
        return match config.on_collision {
            CollisionPolicy::Skip => {
                warn!(
                    src = %src.display(),
                    dest = %dest.display(),
                    "Destination already exists; skipping"
                );
                out::print_warn(&format!(
                    "want to move {} to {}, but that path already exists. Skipping for now..",
                    src.display(),
                    dest.display()
                ));
                Ok(MoveOutcome::CollisionSkipped {
                    destination: dest.to_path_buf(),
                })
            }
            CollisionPolicy::Abort => Err(TagMoveError::PathUniquenessViolation {
                from: src.to_path_buf(),
                to: dest.to_path_buf(),
            }
            .into()),
        };
    }

    let kind = classify(src, dest);
    out::print_user(&report_line(src, dest));

    if !config.simulate {
        if let Some(dir) = dest.parent() {
            fs::create_dir_all(dir).map_err(io_error_with_help("create destination directory", dir))?;
        }
        relocate_with(src, dest, try_atomic_move)?;
    }

    debug!(src = %src.display(), dest = %dest.display(), ?kind, simulate = config.simulate, "Moved file");
    Ok(MoveOutcome::Moved {
        destination: dest.to_path_buf(),
        kind,
    })
}

/// Rename via `rename`; on a cross-device error copy to `dest` and remove `src`.
pub(crate) fn relocate_with<R>(src: &Path, dest: &Path, rename: R) -> Result<()>
where
    R: FnOnce(&Path, &Path) -> io::Result<()>,
{
    match rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            debug!(src = %src.display(), dest = %dest.display(), "Cross-device move; copying instead");
            safe_copy_and_rename(src, dest)?;
            fs::remove_file(src).map_err(io_error_with_help("remove original file", src))?;
            Ok(())
        }
        Err(e) => Err(io_error_with_help("rename", src)(e)),
    }
}
