//! `%x` format strings.
//!
//! A [`Template`] is parsed once, up front, so a malformed format string is
//! rejected before any file is touched. Expansion substitutes tag values for
//! tokens and runs every substituted value through [`sanitize`]; literal text
//! is copied as-is, so separators written in the format string stay structural.

use anyhow::Result;
use std::fmt;
use std::str::FromStr;

use crate::errors::TagMoveError;
use crate::metadata::{Field, MetadataRecord};

use super::sanitize::{PathConversion, sanitize};

/// A single-letter placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Artist,
    Album,
    Comment,
    DiscNumber,
    EncodedBy,
    Genre,
    /// `%l`: track total, or the part after `/` of the track number.
    TrackTotal,
    /// `%n`: track number, single digits padded to two.
    TrackNumber,
    OriginalArtist,
    Composer,
    Copyright,
    Title,
    Url,
    /// `%x`: disc total, or the part after `/` of the disc number.
    DiscTotal,
    Date,
    /// `%z`: album artist, or artist when unset.
    AlbumArtist,
}

impl Token {
    pub fn from_letter(c: char) -> Option<Self> {
        let t = match c {
            'a' => Token::Artist,
            'b' => Token::Album,
            'c' => Token::Comment,
            'd' => Token::DiscNumber,
            'e' => Token::EncodedBy,
            'g' => Token::Genre,
            'l' => Token::TrackTotal,
            'n' => Token::TrackNumber,
            'o' => Token::OriginalArtist,
            'p' => Token::Composer,
            'r' => Token::Copyright,
            't' => Token::Title,
            'u' => Token::Url,
            'x' => Token::DiscTotal,
            'y' => Token::Date,
            'z' => Token::AlbumArtist,
            _ => return None,
        };
        Some(t)
    }

    /// Raw (unsanitized) value of this token for `record`.
    pub fn resolve(self, record: &MetadataRecord) -> String {
        match self {
            Token::Artist => record.field(Field::Artist).to_string(),
            Token::Album => record.field(Field::Album).to_string(),
            Token::Comment => record.field(Field::Comment).to_string(),
            Token::DiscNumber => record.field(Field::DiscNumber).to_string(),
            Token::EncodedBy => record.field(Field::EncodedBy).to_string(),
            Token::Genre => record.field(Field::Genre).to_string(),
            Token::TrackTotal => total_or_denominator(record, Field::TrackTotal, Field::TrackNumber),
            Token::TrackNumber => {
                let n = record.field(Field::TrackNumber);
                if n.chars().count() == 1 {
                    format!("0{n}")
                } else {
                    n.to_string()
                }
            }
            Token::OriginalArtist => record.field(Field::OriginalArtist).to_string(),
            Token::Composer => record.field(Field::Composer).to_string(),
            Token::Copyright => record.field(Field::Copyright).to_string(),
            Token::Title => record.field(Field::Title).to_string(),
            Token::Url => record.field(Field::Url).to_string(),
            Token::DiscTotal => total_or_denominator(record, Field::DiscTotal, Field::DiscNumber),
            Token::Date => record.field(Field::Date).to_string(),
            Token::AlbumArtist => {
                let z = record.field(Field::AlbumArtist);
                if z.is_empty() {
                    record.field(Field::Artist).to_string()
                } else {
                    z.to_string()
                }
            }
        }
    }
}

fn total_or_denominator(record: &MetadataRecord, total: Field, number: Field) -> String {
    let t = record.field(total);
    if !t.is_empty() {
        return t.to_string();
    }
    record
        .field(number)
        .split_once('/')
        .map(|(_, rest)| rest.to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Token(Token),
    Percent,
}

/// A parsed, validated format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source`; fails on a trailing `%` or an unknown token letter.
    pub fn parse(source: &str) -> Result<Self, TagMoveError> {
        let malformed = |reason: String| TagMoveError::MalformedTemplate {
            template: source.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices();

        while let Some((pos, c)) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            let Some((_, letter)) = chars.next() else {
                return Err(malformed(format!("unterminated '%' at offset {pos}")));
            };
            let seg = if letter == '%' {
                Segment::Percent
            } else {
                match Token::from_letter(letter) {
                    Some(t) => Segment::Token(t),
                    None => {
                        return Err(malformed(format!(
                            "unknown token '%{letter}' at offset {pos}"
                        )));
                    }
                }
            };
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(seg);
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// True when the format string contains no `%` token at all.
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Substitute `record` into the template.
    pub fn expand(&self, record: &MetadataRecord, mode: PathConversion) -> String {
        let mut out = String::with_capacity(self.source.len() + 32);
        for seg in &self.segments {
            match seg {
                Segment::Literal(s) => out.push_str(s),
                Segment::Percent => out.push('%'),
                Segment::Token(t) => out.push_str(&sanitize(&t.resolve(record), mode)),
            }
        }
        out
    }
}

impl FromStr for Template {
    type Err = TagMoveError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse and expand in one step.
pub fn expand(template: &str, record: &MetadataRecord, mode: PathConversion) -> Result<String> {
    Ok(Template::parse(template)?.expand(record, mode))
}
