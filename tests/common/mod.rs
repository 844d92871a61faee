#![allow(dead_code)]

use anyhow::Result;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use tagmove::{Field, MetadataProvider, MetadataRecord};

/// Test metadata source keyed by file *content*, so a file keeps its tags
/// wherever it is moved.
#[derive(Default)]
pub struct ContentTags {
    by_content: HashMap<String, MetadataRecord>,
}

impl ContentTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, content: &str, record: MetadataRecord) -> &mut Self {
        self.by_content.insert(content.to_string(), record);
        self
    }
}

impl MetadataProvider for ContentTags {
    fn read(&self, path: &Path) -> Result<MetadataRecord> {
        let content = fs::read_to_string(path)?;
        Ok(self
            .by_content
            .get(&content)
            .cloned()
            .unwrap_or_else(MetadataRecord::untagged))
    }
}

pub fn track(artist: &str, album: &str, number: &str, title: &str) -> MetadataRecord {
    MetadataRecord::tagged([
        (Field::Artist, artist),
        (Field::Album, album),
        (Field::TrackNumber, number),
        (Field::Title, title),
    ])
}

/// Write `content` to `path`, creating parent directories.
pub fn put(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

/// Relative path -> file content (None for directories) for everything under `root`.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Option<String>> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| e.unwrap())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            let content = if e.file_type().is_file() {
                Some(fs::read_to_string(e.path()).unwrap())
            } else {
                None
            };
            (rel, content)
        })
        .collect()
}
