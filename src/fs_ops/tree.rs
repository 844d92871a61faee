//! Recursive walk that applies the per-file pipeline and prunes emptied directories.
//!
//! Each directory's entries are snapshotted before recursing, so files created
//! by this run (already correctly named) are not visited again and each
//! pre-existing entry is visited exactly once. A directory becomes a removal
//! candidate when every snapshotted entry reported leaving it; it is only
//! removed if it is still empty on disk at that moment. A simulated run makes
//! the same decision against its planned moves.

use anyhow::Result;
use std::cell::RefCell;
use std::fs;
use std::io;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::format::{FormatSource, resolve_destination};
use crate::metadata::{MetadataProvider, MetadataRecord};
use crate::output as out;

use super::cleanup::{is_effectively_empty, remove_empty_tree};
use super::file_move::{MoveOutcome, move_file, move_file_with};
use super::helpers::io_error_with_help;
use super::plan::SimulatedMoves;

/// Counters for a visited subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalResult {
    pub files: usize,
    pub dirs: usize,
    /// The visited path no longer lives in its parent directory.
    pub moved_out: bool,
}

impl AddAssign for TraversalResult {
    fn add_assign(&mut self, rhs: Self) {
        self.files += rhs.files;
        self.dirs += rhs.dirs;
    }
}

pub struct TreeWalker<'a> {
    config: &'a Config,
    metadata: &'a dyn MetadataProvider,
    format: &'a dyn FormatSource,
    planned: RefCell<SimulatedMoves>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        config: &'a Config,
        metadata: &'a dyn MetadataProvider,
        format: &'a dyn FormatSource,
    ) -> Self {
        Self {
            config,
            metadata,
            format,
            planned: RefCell::new(SimulatedMoves::default()),
        }
    }

    /// Process each top-level path in order. Missing paths are warned about
    /// and skipped; the first fatal error stops the run.
    pub fn run<P: AsRef<Path>>(&self, paths: &[P]) -> Result<TraversalResult> {
        let mut total = TraversalResult::default();
        for p in paths {
            let p = p.as_ref();
            let path = match dunce::canonicalize(p) {
                Ok(c) => c,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!(path = %p.display(), "Path does not exist; skipping");
                    out::print_warn(&format!("Path does not exist: {}", p.display()));
                    continue;
                }
                Err(e) => return Err(io_error_with_help("resolve path", p)(e)),
            };
            total += self.process_path(&path)?;
        }
        info!(
            files = total.files,
            dirs = total.dirs,
            simulate = self.config.simulate,
            "Run complete"
        );
        Ok(total)
    }

    /// Visit `path`: a file goes through the move pipeline, a directory is
    /// walked and possibly removed afterwards.
    pub fn process_path(&self, path: &Path) -> Result<TraversalResult> {
        let meta = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Path vanished before it was visited");
                // Gone from its parent, whoever took it.
                return Ok(TraversalResult {
                    moved_out: true,
                    ..Default::default()
                });
            }
            Err(e) => return Err(io_error_with_help("stat", path)(e)),
        };

        let ft = meta.file_type();
        if ft.is_symlink() {
            debug!(path = %path.display(), "Leaving symlink untouched");
            Ok(TraversalResult::default())
        } else if ft.is_dir() {
            self.process_dir(path)
        } else {
            let outcome = self.process_file(path)?;
            Ok(TraversalResult {
                files: 1,
                dirs: 0,
                moved_out: outcome.left_parent(),
            })
        }
    }

    fn process_dir(&self, dir: &Path) -> Result<TraversalResult> {
        let mut snapshot: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error_with_help("read directory", dir))? {
            let entry = entry.map_err(io_error_with_help("read directory entry", dir))?;
            snapshot.push(entry.path());
        }
        snapshot.sort();

        let mut result = TraversalResult {
            dirs: 1,
            ..Default::default()
        };
        let mut remaining = snapshot.len();
        for child in &snapshot {
            let r = self.process_path(child)?;
            result += r;
            if r.moved_out {
                remaining -= 1;
            }
        }

        if remaining == 0 {
            result.moved_out = self.remove_if_empty(dir)?;
        } else {
            debug!(dir = %dir.display(), remaining, "Directory keeps entries");
        }
        Ok(result)
    }

    /// Returns true when the directory was (or, simulating, would be) removed.
    fn remove_if_empty(&self, dir: &Path) -> Result<bool> {
        let empty = if self.config.simulate {
            self.planned.borrow().is_vacant(dir)
        } else {
            is_effectively_empty(dir)
        }?;
        if !empty {
            debug!(dir = %dir.display(), "New entries appeared; keeping directory");
            return Ok(false);
        }
        if !self.config.simulate {
            remove_empty_tree(dir)?;
        }
        out::print_user(&format!("Remove empty directory {}", dir.display()));
        Ok(true)
    }

    fn process_file(&self, file: &Path) -> Result<MoveOutcome> {
        let record = self.metadata.read(file)?;
        if self.config.very_verbose {
            print_tag_dump(file, &record);
        }
        if !record.has_tag() {
            if self.config.verbose {
                out::print_user(&format!("No tag found for file {}.. skipping", file.display()));
            }
            return Ok(MoveOutcome::NoTag);
        }

        let template = self.format.template_for(file, &record)?;
        let expanded = template.expand(&record, self.config.path_conversion);
        let dest = resolve_destination(file, &expanded)?;
        debug!(file = %file.display(), template = %template, dest = %dest.display(), "Resolved destination");

        if !self.config.simulate {
            return move_file(self.config, file, &dest);
        }
        let outcome = move_file_with(self.config, file, &dest, |p| self.planned.borrow().occupied(p))?;
        if let MoveOutcome::Moved { destination, .. } = &outcome {
            self.planned.borrow_mut().record(file, destination);
        }
        Ok(outcome)
    }
}

fn print_tag_dump(file: &Path, record: &MetadataRecord) {
    out::print_user(&format!("Considering file {}", file.display()));
    if record.is_empty() {
        out::print_user("  (No tags)");
        return;
    }
    for (field, value) in record.iter() {
        out::print_user(&format!(" {field}: \"{value}\""));
    }
}
