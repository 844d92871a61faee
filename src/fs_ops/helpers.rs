//! I/O error enrichment.
//!
//! Wraps `io::Error` with the failed operation, the path involved and a short
//! hint, for use with `map_err` in both `anyhow::Result` and `io::Result` code:
//!
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create directory", dir))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

/// Hint keyed by raw OS error code.
#[cfg(unix)]
fn os_hint(code: i32) -> Option<&'static str> {
    let hint = match code {
        libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
        libc::EXDEV => "source and destination are on different filesystems",
        libc::EBUSY => "resource busy; is a player or indexer holding the file open?",
        libc::ENOENT => "path not found; it may have been moved earlier in this run",
        libc::EEXIST => "already exists",
        libc::ENOTEMPTY => "directory not empty",
        libc::ENOSPC => "no space left on device",
        libc::EROFS => "read-only filesystem",
        libc::ENAMETOOLONG => "file name too long; shorten the format string or tag values",
        libc::ELOOP => "too many levels of symbolic links",
        _ => return None,
    };
    Some(hint)
}

#[cfg(windows)]
fn os_hint(code: i32) -> Option<&'static str> {
    let hint = match code {
        5 => "access denied; check permissions",
        2 | 3 => "path not found; it may have been moved earlier in this run",
        17 => "source and destination are on different drives",
        32 => "sharing violation; the file is in use",
        80 | 183 => "already exists",
        112 => "disk full",
        145 => "directory not empty",
        206 => "file name too long; shorten the format string or tag values",
        _ => return None,
    };
    Some(hint)
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied"),
        io::ErrorKind::NotFound => Some("path not found"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        _ => None,
    }
}

fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    let hint = match e.raw_os_error() {
        Some(code) => os_hint(code),
        None => kind_hint(e.kind()),
    };
    if let Some(h) = hint {
        msg.push_str(" (");
        msg.push_str(h);
        msg.push(')');
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {code}]"));
    }
    msg
}

/// For `anyhow::Result` code: io::Error -> anyhow::Error.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

/// For `io::Result` code: keeps the original `ErrorKind`.
pub fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_op_and_path() {
        let e = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = io_error_with_help("open file", Path::new("/x/y.flac"))(e);
        let s = err.to_string();
        assert!(s.starts_with("open file '/x/y.flac': gone"), "{s}");
        assert!(s.contains("path not found"), "{s}");
    }

    #[test]
    fn io_variant_keeps_kind() {
        let e = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        let wrapped = io_error_with_help_io("rename", Path::new("a"))(e);
        assert_eq!(wrapped.kind(), io::ErrorKind::PermissionDenied);
        assert!(wrapped.to_string().contains("rename 'a'"));
    }

    #[cfg(unix)]
    #[test]
    fn os_code_is_reported() {
        let e = io::Error::from_raw_os_error(libc::ENOSPC);
        let s = io_error_with_help("copy", Path::new("f"))(e).to_string();
        assert!(s.contains("no space left"), "{s}");
        assert!(s.contains(&format!("[os code: {}]", libc::ENOSPC)), "{s}");
    }
}
