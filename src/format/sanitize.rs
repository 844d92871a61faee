//! Filesystem-safe conversion of metadata fragments.
//!
//! Every value substituted into a format string passes through [`sanitize`]
//! so that tag content can never introduce a path separator, a control
//! character, or (outside UTF-8 mode) a character the target filesystem
//! dislikes.
//!
//! Rules, applied per character in this order:
//! - `/` and `\` always become `-`.
//! - ASCII control characters (0x00-0x1F) always become `_`.
//! - Outside UTF-8 mode, Latin-1 letters (U+00C0..=U+00FF) fold to a plain
//!   ASCII letter and any other non-ASCII character becomes `_`.
//! - `posix` keeps only `[A-Za-z0-9._-]`; `windows-ascii` replaces
//!   `< > : " | ? *` and drops one trailing dot.
//!
//! Outside UTF-8 mode the trailing run of `_` is trimmed.

use std::fmt;
use std::str::FromStr;

use crate::errors::TagMoveError;

/// Policy governing which characters may appear in a generated path segment.
/// Fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathConversion {
    /// Unaccented ASCII letters, digits, dot, underscore and hyphen only.
    #[default]
    Posix,
    /// 7-bit ASCII without the characters Windows forbids in file names.
    WindowsAscii,
    /// Only separators and control characters are replaced.
    Utf8,
}

impl PathConversion {
    /// Parse the user-facing names (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "posix" => Some(PathConversion::Posix),
            "windows-ascii" | "windows" | "windows-restricted" => Some(PathConversion::WindowsAscii),
            "utf-8" | "utf8" | "passthrough" | "utf8-passthrough" => Some(PathConversion::Utf8),
            _ => None,
        }
    }
}

impl fmt::Display for PathConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PathConversion::Posix => "posix",
            PathConversion::WindowsAscii => "windows-ascii",
            PathConversion::Utf8 => "utf-8",
        };
        f.write_str(s)
    }
}

impl FromStr for PathConversion {
    type Err = TagMoveError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TagMoveError::InvalidPathConversion(s.to_string()))
    }
}

/// Crude one-to-one fold of U+00C0..=U+00FF onto ASCII.
/// `×` and `÷` have no letter equivalent and map to `_`.
#[rustfmt::skip]
const LATIN1_FOLD: [char; 64] = [
    // ÀÁÂÃÄÅÆÇ
    'A', 'A', 'A', 'A', 'A', 'A', 'E', 'C',
    // ÈÉÊËÌÍÎÏ
    'E', 'E', 'E', 'E', 'I', 'I', 'I', 'I',
    // ÐÑÒÓÔÕÖ×
    'D', 'N', 'O', 'O', 'O', 'O', 'O', '_',
    // ØÙÚÛÜÝÞß
    'O', 'U', 'U', 'U', 'U', 'Y', 'P', 's',
    // àáâãäåæç
    'a', 'a', 'a', 'a', 'a', 'a', 'e', 'c',
    // èéêëìíîï
    'e', 'e', 'e', 'e', 'i', 'i', 'i', 'i',
    // ðñòóôõö÷
    'o', 'n', 'o', 'o', 'o', 'o', 'o', '_',
    // øùúûüýþÿ
    'o', 'u', 'u', 'u', 'u', 'y', 'p', 'y',
];

const WINDOWS_FORBIDDEN: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

#[inline]
fn convert_char(c: char, mode: PathConversion) -> char {
    let c = match c {
        '/' | '\\' => '-',
        c if (c as u32) < 0x20 => '_',
        c if mode == PathConversion::Utf8 => c,
        '\u{C0}'..='\u{FF}' => LATIN1_FOLD[(c as u32 - 0xC0) as usize],
        c if !c.is_ascii() => '_',
        c => c,
    };
    match mode {
        PathConversion::Posix
            if !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')) =>
        {
            '_'
        }
        PathConversion::WindowsAscii if WINDOWS_FORBIDDEN.contains(&c) => '_',
        _ => c,
    }
}

/// Convert `fragment` into a string usable as (part of) one path segment.
/// Never fails; empty input yields empty output.
pub fn sanitize(fragment: &str, mode: PathConversion) -> String {
    // A value of only dots would name the current or parent directory.
    if !fragment.is_empty() && fragment.chars().all(|c| c == '.') {
        return "-".repeat(fragment.len());
    }

    let mut safe: String = fragment.chars().map(|c| convert_char(c, mode)).collect();

    if mode == PathConversion::WindowsAscii && safe.ends_with('.') {
        safe.pop();
    }

    if mode != PathConversion::Utf8 {
        let kept = safe.trim_end_matches('_').len();
        safe.truncate(kept);
    }
    if !safe.is_empty() && safe.chars().all(|c| c == '.') {
        safe = "-".repeat(safe.len());
    }
    safe
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTROL: &str = "\u{1}\u{2}\u{3}\u{4}\u{5}\u{6}\u{7}\u{8}\u{9}\u{a}\u{b}\u{c}\u{d}\u{e}\u{f}\
        \u{10}\u{11}\u{12}\u{13}\u{14}\u{15}\u{16}\u{17}\u{18}\u{19}\u{1a}\u{1b}\u{1c}\u{1d}\u{1e}\u{1f}";

    fn latin1_letters() -> String {
        (0xC0u32..=0xFF).filter_map(char::from_u32).collect()
    }

    fn latin1_punctuation() -> String {
        (0xA0u32..=0xBF).filter_map(char::from_u32).collect()
    }

    #[test]
    fn posix_control_characters_trimmed() {
        let input = format!("abcd{CONTROL}");
        assert_eq!(sanitize(&input, PathConversion::Posix), "abcd");
    }

    #[test]
    fn posix_forbidden_ascii() {
        let p = PathConversion::Posix;
        assert_eq!(sanitize("1ascii_fragment-str", p), "1ascii_fragment-str");
        assert_eq!(sanitize("spaces get converted", p), "spaces_get_converted");
        assert_eq!(sanitize("foo (foo) \"foo\" <foo>", p), "foo__foo___foo___foo");
        assert_eq!(sanitize("some title (name of remix)", p), "some_title__name_of_remix");
        assert_eq!(sanitize("This / That", p), "This_-_That");
        assert_eq!(sanitize("That & This", p), "That___This");
        assert_eq!(sanitize("xyzw<>:\"|", p), "xyzw");
    }

    #[test]
    fn posix_folds_accents() {
        let p = PathConversion::Posix;
        assert_eq!(
            sanitize("S\u{f5}m\u{ea} \u{e5}\u{e7}c\u{e9}\u{f1}ted characters here", p),
            "Some_accented_characters_here"
        );
        assert_eq!(
            sanitize(&format!("Basic Latin punctuation:{}", latin1_punctuation()), p),
            "Basic_Latin_punctuation"
        );
        assert_eq!(
            sanitize(&format!("Basic Latin letters: {}", latin1_letters()), p),
            "Basic_Latin_letters__AAAAAAECEEEEIIIIDNOOOOO_OUUUUYPsaaaaaaeceeeeiiiionooooo_ouuuuypy"
        );
        assert_eq!(
            sanitize("Latin-1 Supplement, some of: \u{179}\u{17a}\u{17b}\u{17c}\u{17d}\u{17e}\u{17f}", p),
            "Latin-1_Supplement__some_of"
        );
    }

    #[test]
    fn utf8_keeps_everything_but_separators_and_controls() {
        let u = PathConversion::Utf8;
        let input = format!("abcd{CONTROL}");
        assert_eq!(sanitize(&input, u), format!("abcd{}", "_".repeat(31)));
        assert_eq!(sanitize("spaces not converted", u), "spaces not converted");
        assert_eq!(sanitize("foo (foo) \"foo\" <foo>", u), "foo (foo) \"foo\" <foo>");
        assert_eq!(sanitize("This / That", u), "This - That");
        assert_eq!(sanitize("xyzw<>:\"|", u), "xyzw<>:\"|");
        let accented = "S\u{f5}m\u{ea} \u{e5}\u{e7}c\u{e9}\u{f1}ted characters here";
        assert_eq!(sanitize(accented, u), accented);
        let letters = format!("Basic Latin letters: {}", latin1_letters());
        assert_eq!(sanitize(&letters, u), letters);
    }

    #[test]
    fn windows_rules() {
        let w = PathConversion::WindowsAscii;
        let input = format!("abcd{CONTROL}");
        assert_eq!(sanitize(&input, w), "abcd");
        assert_eq!(sanitize("spaces not converted", w), "spaces not converted");
        assert_eq!(sanitize("foo (foo) \"foo\" <foo>", w), "foo (foo) _foo_ _foo");
        assert_eq!(sanitize("This / That", w), "This - That");
        assert_eq!(sanitize("That & This", w), "That & This");
        assert_eq!(sanitize("xyzw<>:\"|", w), "xyzw");
        assert_eq!(
            sanitize(&format!("Basic Latin punctuation:{}", latin1_punctuation()), w),
            "Basic Latin punctuation"
        );
        assert_eq!(
            sanitize(&format!("Basic Latin letters: {}", latin1_letters()), w),
            "Basic Latin letters_ AAAAAAECEEEEIIIIDNOOOOO_OUUUUYPsaaaaaaeceeeeiiiionooooo_ouuuuypy"
        );
        assert_eq!(
            sanitize("Latin-1 Supplement, some of: \u{179}\u{17a}\u{17b}", w),
            "Latin-1 Supplement, some of_ "
        );
    }

    #[test]
    fn windows_drops_trailing_dot() {
        assert_eq!(sanitize("Vol. 2.", PathConversion::WindowsAscii), "Vol. 2");
        assert_eq!(sanitize("Vol. 2.", PathConversion::Posix), "Vol._2.");
    }

    #[test]
    fn empty_input_is_empty() {
        for mode in [PathConversion::Posix, PathConversion::WindowsAscii, PathConversion::Utf8] {
            assert_eq!(sanitize("", mode), "");
        }
    }

    #[test]
    fn only_trailing_run_of_underscores_is_trimmed() {
        assert_eq!(sanitize("a_b__", PathConversion::Posix), "a_b");
        assert_eq!(sanitize("__lead", PathConversion::Posix), "__lead");
        assert_eq!(sanitize("keep__", PathConversion::Utf8), "keep__");
    }

    #[test]
    fn dot_only_values_cannot_name_a_directory() {
        for mode in [PathConversion::Posix, PathConversion::WindowsAscii, PathConversion::Utf8] {
            assert_eq!(sanitize("..", mode), "--");
            assert_eq!(sanitize(".", mode), "-");
        }
        assert_eq!(sanitize(".?", PathConversion::Posix), "-");
        assert_eq!(sanitize("..\u{1}", PathConversion::WindowsAscii), "--");
        assert_eq!(sanitize("...And Justice", PathConversion::Utf8), "...And Justice");
    }

    #[test]
    fn no_separator_or_control_in_any_mode() {
        let nasty = "a/b\\c\u{0}d\u{1f}e/../\u{e9}\u{2603}";
        for mode in [PathConversion::Posix, PathConversion::WindowsAscii, PathConversion::Utf8] {
            let out = sanitize(nasty, mode);
            assert!(!out.contains('/') && !out.contains('\\'), "{mode}: {out}");
            assert!(!out.chars().any(|c| (c as u32) < 0x20), "{mode}: {out}");
        }
        let posix = sanitize(nasty, PathConversion::Posix);
        assert!(posix.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
        assert!(!posix.ends_with('_'));
    }

    #[test]
    fn parse_names() {
        assert_eq!(PathConversion::parse("POSIX"), Some(PathConversion::Posix));
        assert_eq!(PathConversion::parse("windows-ascii"), Some(PathConversion::WindowsAscii));
        assert_eq!(PathConversion::parse("utf-8"), Some(PathConversion::Utf8));
        assert_eq!(PathConversion::parse("ebcdic"), None);
        assert!("ebcdic".parse::<PathConversion>().is_err());
        assert_eq!(PathConversion::WindowsAscii.to_string(), "windows-ascii");
    }
}
