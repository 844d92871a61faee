//! Where a file's format string comes from.
//!
//! Most runs use one static template for every file. A [`ScriptedFormat`]
//! instead asks a callback per file; whatever string it returns is parsed and
//! expanded exactly like a static template.

use anyhow::Result;
use std::borrow::Cow;
use std::path::Path;

use crate::metadata::MetadataRecord;

use super::template::Template;

pub trait FormatSource {
    /// The template to apply to `file`, whose tags are `record`.
    fn template_for(&self, file: &Path, record: &MetadataRecord) -> Result<Cow<'_, Template>>;
}

/// The same template for every file.
#[derive(Debug, Clone)]
pub struct StaticFormat(pub Template);

impl StaticFormat {
    pub fn parse(format: &str) -> Result<Self> {
        Ok(Self(Template::parse(format)?))
    }
}

impl FormatSource for StaticFormat {
    fn template_for(&self, _file: &Path, _record: &MetadataRecord) -> Result<Cow<'_, Template>> {
        Ok(Cow::Borrowed(&self.0))
    }
}

/// A per-file format string computed by a callback (e.g. an embedded script).
pub struct ScriptedFormat<F> {
    producer: F,
}

impl<F> ScriptedFormat<F>
where
    F: Fn(&Path, &MetadataRecord) -> Result<String>,
{
    pub fn new(producer: F) -> Self {
        Self { producer }
    }
}

impl<F> FormatSource for ScriptedFormat<F>
where
    F: Fn(&Path, &MetadataRecord) -> Result<String>,
{
    fn template_for(&self, file: &Path, record: &MetadataRecord) -> Result<Cow<'_, Template>> {
        let format = (self.producer)(file, record)?;
        Ok(Cow::Owned(Template::parse(&format)?))
    }
}
