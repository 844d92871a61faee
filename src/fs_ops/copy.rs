//! Cross-device fallback: copy into a hidden temp file beside the destination,
//! fsync it, then rename it into place. The destination name only ever appears
//! fully written.

use anyhow::{Context, Result, anyhow};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use super::atomic::try_atomic_move;
use super::helpers::io_error_with_help;
use super::meta::preserve_metadata;
use super::util;

const BUF_SIZE: usize = 1024 * 1024;

/// Copy `src` into a new file at `dst` (never clobbers) and fsync it.
fn copy_streaming(src: &Path, dst: &Path) -> io::Result<u64> {
    let mut reader = BufReader::with_capacity(BUF_SIZE, File::open(src)?);
    let out = OpenOptions::new().write(true).create_new(true).open(dst)?;
    let mut writer = BufWriter::with_capacity(BUF_SIZE, out);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    let out = writer.into_inner().map_err(|e| e.into_error())?;
    out.sync_all()?;
    Ok(bytes)
}

/// Copy `src` to `dest` through a temp sibling, then restore permissions and
/// timestamps from `src`. The source is left in place.
pub fn safe_copy_and_rename(src: &Path, dest: &Path) -> Result<u64> {
    let dest_dir = dest
        .parent()
        .ok_or_else(|| anyhow!("destination has no parent: {}", dest.display()))?;

    fs::create_dir_all(dest_dir)
        .map_err(io_error_with_help("create destination directory", dest_dir))?;

    let tmp_path = util::unique_temp_path(dest_dir);
    let bytes = match copy_streaming(src, &tmp_path) {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            return Err(io_error_with_help("copy to temporary file", &tmp_path)(e));
        }
    };

    if let Err(e) = try_atomic_move(&tmp_path, dest) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e).with_context(|| {
            format!(
                "rename temporary file '{}' -> '{}'",
                tmp_path.display(),
                dest.display()
            )
        });
    }

    preserve_metadata(src, dest)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copies_content_and_leaves_no_temp() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.flac");
        fs::write(&src, b"fLaC data").unwrap();
        let dest = td.path().join("Artist").join("Title.flac");

        let n = safe_copy_and_rename(&src, &dest).unwrap();
        assert_eq!(n, 9);
        assert_eq!(fs::read(&dest).unwrap(), b"fLaC data");
        assert!(src.exists(), "source is the caller's to remove");

        for entry in fs::read_dir(dest.parent().unwrap()).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().into_owned();
            assert!(!name.starts_with(".tagmove."), "leftover temp: {name}");
        }
    }

    #[test]
    fn missing_source_cleans_up_temp() {
        let td = tempdir().unwrap();
        let dest = td.path().join("out.mp3");
        let err = safe_copy_and_rename(&td.path().join("nope.mp3"), &dest).unwrap_err();
        assert!(err.to_string().contains("copy to temporary file"), "{err}");
        assert_eq!(fs::read_dir(td.path()).unwrap().count(), 0);
    }
}
