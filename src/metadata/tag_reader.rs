//! `MetadataProvider` backed by the `lofty` tag reader.
//! Container format is probed from content (falling back to the extension).
//! Non-audio or unparsable files come back as untagged records; I/O failures
//! while reading are errors.

use anyhow::Result;
use lofty::error::{ErrorKind, LoftyError};
use lofty::file::TaggedFileExt;
use lofty::probe::read_from_path;
use lofty::tag::{ItemKey, Tag};
use std::io;
use std::path::Path;
use tracing::{debug, trace};

use super::{Field, MetadataProvider, MetadataRecord};
use crate::fs_ops::io_error_with_help;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyProvider;

impl LoftyProvider {
    pub fn new() -> Self {
        Self
    }
}

/// Lookup order per field; the first non-empty key wins.
fn item_keys(field: Field) -> &'static [ItemKey] {
    match field {
        Field::Album => &[ItemKey::AlbumTitle],
        Field::AlbumArtist => &[ItemKey::AlbumArtist],
        Field::Artist => &[ItemKey::TrackArtist],
        Field::Comment => &[ItemKey::Comment],
        Field::Composer => &[ItemKey::Composer],
        Field::Copyright => &[ItemKey::CopyrightMessage],
        Field::EncodedBy => &[ItemKey::EncodedBy],
        Field::Date => &[ItemKey::RecordingDate, ItemKey::Year],
        Field::DiscNumber => &[ItemKey::DiscNumber],
        Field::DiscTotal => &[ItemKey::DiscTotal],
        Field::Genre => &[ItemKey::Genre],
        Field::OriginalArtist => &[ItemKey::OriginalArtist, ItemKey::Performer],
        Field::Title => &[ItemKey::TrackTitle],
        Field::TrackNumber => &[ItemKey::TrackNumber],
        Field::TrackTotal => &[ItemKey::TrackTotal],
        Field::Url => &[ItemKey::AudioFileUrl],
    }
}

fn record_from_tag(tag: &Tag) -> MetadataRecord {
    let values = Field::ALL.iter().filter_map(|&field| {
        item_keys(field)
            .iter()
            .filter_map(|key| tag.get_string(key))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(|v| (field, v.to_string()))
    });
    MetadataRecord::tagged(values)
}

/// The underlying I/O failure, unless it is just a short or corrupt stream.
fn io_failure(e: &LoftyError) -> Option<io::Error> {
    let ErrorKind::Io(io_err) = e.kind() else {
        return None;
    };
    if io_err.kind() == io::ErrorKind::UnexpectedEof {
        return None;
    }
    Some(match io_err.raw_os_error() {
        Some(code) => io::Error::from_raw_os_error(code),
        None => io::Error::new(io_err.kind(), io_err.to_string()),
    })
}

impl MetadataProvider for LoftyProvider {
    fn read(&self, path: &Path) -> Result<MetadataRecord> {
        let tagged_file = match read_from_path(path) {
            Ok(tf) => tf,
            Err(e) => {
                if let Some(io_err) = io_failure(&e) {
                    return Err(io_error_with_help("read tags", path)(io_err));
                }
                debug!(path = %path.display(), error = %e, "No readable tag container");
                return Ok(MetadataRecord::untagged());
            }
        };

        let Some(tag) = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
        else {
            debug!(path = %path.display(), "Container has no tag");
            return Ok(MetadataRecord::untagged());
        };

        let rec = record_from_tag(tag);
        trace!(path = %path.display(), fields = rec.iter().count(), "Read tag");
        Ok(rec)
    }
}
