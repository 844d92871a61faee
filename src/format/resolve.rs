//! Turn an expanded format string into a concrete destination path.

use anyhow::{Context, Result};
use std::env;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Resolve `expanded` for `source` and append the source's extension.
///
/// - absolute: used as-is
/// - leading `.` with more than one segment (`./x`, `../x`): relative to the CWD
/// - anything else: relative to the source file's directory
///
/// An empty final segment (empty expansion, or a trailing separator) still
/// names a file in that directory: `<dir>/.<ext>`.
pub fn resolve_destination(source: &Path, expanded: &str) -> Result<PathBuf> {
    let target = Path::new(expanded);

    let joined = if target.is_absolute() {
        target.to_path_buf()
    } else if expanded.starts_with('.') && target.components().count() > 1 {
        env::current_dir()
            .context("determine current working directory")?
            .join(target)
    } else {
        let base = source.parent().unwrap_or_else(|| Path::new(""));
        base.join(target)
    };

    let mut dest = normalize_lexically(&joined);
    let Some(ext) = source.extension() else {
        return Ok(dest);
    };
    let mut suffix = OsString::from(".");
    suffix.push(ext);
    if expanded.is_empty() || expanded.ends_with(std::path::is_separator) {
        dest.push(suffix);
        return Ok(dest);
    }
    let mut named = dest.into_os_string();
    named.push(suffix);
    Ok(PathBuf::from(named))
}

/// Drop `.` components and fold `..` into the preceding normal component.
/// Purely lexical; symlinks are not consulted. `..` above the root is dropped.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
