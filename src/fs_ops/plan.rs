//! Bookkeeping for simulated runs.
//!
//! Nothing moves on disk while simulating, so occupancy and emptiness are
//! answered from the disk as it is, overlaid with the moves planned so far.
//! This keeps the report of a simulated run identical to a real one.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::helpers::io_error_with_help_io;

#[derive(Debug, Default)]
pub struct SimulatedMoves {
    arrivals: BTreeSet<PathBuf>,
    departures: BTreeSet<PathBuf>,
}

impl SimulatedMoves {
    pub fn record(&mut self, src: &Path, dest: &Path) {
        self.arrivals.insert(dest.to_path_buf());
        self.arrivals.remove(src);
        self.departures.insert(src.to_path_buf());
        self.departures.remove(dest);
    }

    /// Whether `path` would exist at this point of a real run.
    pub fn occupied(&self, path: &Path) -> bool {
        if self.arrivals.contains(path) {
            return true;
        }
        !self.departures.contains(path) && fs::symlink_metadata(path).is_ok()
    }

    /// Simulated counterpart of `is_effectively_empty`: nothing planned to
    /// arrive below `dir`, and every file still on disk below it has departed.
    pub fn is_vacant(&self, dir: &Path) -> io::Result<bool> {
        if self.arrivals.iter().any(|p| p.starts_with(dir)) {
            return Ok(false);
        }
        self.only_departed_below(dir)
    }

    fn only_departed_below(&self, dir: &Path) -> io::Result<bool> {
        for entry in fs::read_dir(dir).map_err(io_error_with_help_io("read directory", dir))? {
            let entry = entry?;
            let path = entry.path();
            let ft = entry.file_type()?;
            let gone = if ft.is_dir() {
                self.only_departed_below(&path)?
            } else {
                ft.is_file() && self.departures.contains(&path)
            };
            if !gone {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
