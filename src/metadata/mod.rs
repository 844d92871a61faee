//! Per-file tag metadata as consumed by the format engine.
//!
//! The engine only needs a flat field -> string view plus a "has any tag"
//! flag. Container/tag parsing lives behind [`MetadataProvider`]; the
//! shipped implementation is [`tag_reader::LoftyProvider`].

pub mod tag_reader;

use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

pub use tag_reader::LoftyProvider;

/// The fixed set of tag fields a format string can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Album,
    AlbumArtist,
    Artist,
    Comment,
    Composer,
    Copyright,
    EncodedBy,
    Date,
    DiscNumber,
    DiscTotal,
    Genre,
    OriginalArtist,
    Title,
    TrackNumber,
    TrackTotal,
    Url,
}

impl Field {
    pub const ALL: [Field; 16] = [
        Field::Album,
        Field::AlbumArtist,
        Field::Artist,
        Field::Comment,
        Field::Composer,
        Field::Copyright,
        Field::EncodedBy,
        Field::Date,
        Field::DiscNumber,
        Field::DiscTotal,
        Field::Genre,
        Field::OriginalArtist,
        Field::Title,
        Field::TrackNumber,
        Field::TrackTotal,
        Field::Url,
    ];

    /// Upper-case property name, as printed in tag dumps.
    pub fn property_name(self) -> &'static str {
        match self {
            Field::Album => "ALBUM",
            Field::AlbumArtist => "ALBUMARTIST",
            Field::Artist => "ARTIST",
            Field::Comment => "COMMENT",
            Field::Composer => "COMPOSER",
            Field::Copyright => "COPYRIGHT",
            Field::EncodedBy => "ENCODEDBY",
            Field::Date => "DATE",
            Field::DiscNumber => "DISCNUMBER",
            Field::DiscTotal => "DISCTOTAL",
            Field::Genre => "GENRE",
            Field::OriginalArtist => "ORIGINALARTIST",
            Field::Title => "TITLE",
            Field::TrackNumber => "TRACKNUMBER",
            Field::TrackTotal => "TRACKTOTAL",
            Field::Url => "URL",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.property_name())
    }
}

/// Read-only tag values for one file. Unset fields read as "".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    has_tag: bool,
    fields: BTreeMap<Field, String>,
}

impl MetadataRecord {
    /// A record for a file with no recognizable tag.
    pub fn untagged() -> Self {
        Self::default()
    }

    /// A tagged record with the given values. Empty values are dropped.
    pub fn tagged<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (Field, S)>,
        S: Into<String>,
    {
        let mut rec = Self {
            has_tag: true,
            fields: BTreeMap::new(),
        };
        for (field, value) in fields {
            rec = rec.with(field, value);
        }
        rec
    }

    /// Builder-style setter.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            self.fields.remove(&field);
        } else {
            self.fields.insert(field, value);
        }
        self
    }

    pub fn has_tag(&self) -> bool {
        self.has_tag
    }

    pub fn field(&self, field: Field) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Non-empty fields in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.fields.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Source of tag metadata for a file path.
///
/// Implementations decide how to pick a parser (usually by probing content or
/// extension). Files that simply carry no tag must yield
/// `MetadataRecord::untagged()`, not an error; errors are fatal for the run.
pub trait MetadataProvider {
    fn read(&self, path: &Path) -> Result<MetadataRecord>;
}

impl<F> MetadataProvider for F
where
    F: Fn(&Path) -> Result<MetadataRecord>,
{
    fn read(&self, path: &Path) -> Result<MetadataRecord> {
        self(path)
    }
}
