//! XML configuration support.
//! - Reads optional settings from config.xml (quick_xml + serde).
//! - Writes a commented template on request (`--init-config`).
//!
//! Unknown elements are rejected so typos surface instead of being ignored.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{CollisionPolicy, Config, LogLevel};
use crate::format::PathConversion;
use crate::platform::{set_dir_mode_0700, write_config_secure_new_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
pub struct XmlConfig {
    #[serde(rename = "format")]
    pub format: Option<String>,
    #[serde(rename = "path_conversion")]
    pub path_conversion: Option<String>,
    #[serde(rename = "on_collision")]
    pub on_collision: Option<String>,
    #[serde(rename = "log_level")]
    pub log_level: Option<String>,
    #[serde(rename = "log_file")]
    pub log_file: Option<String>,
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl XmlConfig {
    /// Overlay the values present in the file onto `cfg`.
    /// An unrecognised `log_level` is ignored; bad enum values for the
    /// conversion or collision policy are errors.
    pub fn apply_to(&self, cfg: &mut Config) -> Result<()> {
        if let Some(f) = non_empty(&self.format) {
            cfg.format = Some(f.to_string());
        }
        if let Some(pc) = non_empty(&self.path_conversion) {
            cfg.path_conversion = pc.parse::<PathConversion>()?;
        }
        if let Some(oc) = non_empty(&self.on_collision) {
            cfg.on_collision = oc.parse::<CollisionPolicy>()?;
        }
        if let Some(level) = non_empty(&self.log_level).and_then(LogLevel::parse) {
            cfg.log_level = level;
        }
        if let Some(lf) = non_empty(&self.log_file) {
            cfg.log_file = Some(PathBuf::from(lf));
        }
        Ok(())
    }
}

/// Parse config XML from a string.
pub fn parse_config_xml(contents: &str) -> Result<XmlConfig> {
    Ok(from_xml_str(contents)?)
}

/// Load and parse a config file at `path`.
pub fn load_config_from_xml_path(path: &Path) -> Result<XmlConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    parse_config_xml(&contents).with_context(|| format!("parse config xml '{}'", path.display()))
}

/// Load the config file in use (see `default_config_path`).
/// Returns Ok(None) when no file exists there.
pub fn load_config() -> Result<Option<(PathBuf, XmlConfig)>> {
    let path = default_config_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let parsed = load_config_from_xml_path(&path)?;
    Ok(Some((path, parsed)))
}

/// Write a commented template config to `path` (0600, parent 0700).
/// Refuses to overwrite an existing file or to write through a symlinked ancestor.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
        let _ = set_dir_mode_0700(parent);
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "/path/to/tagmove.log".into());

    let content = format!(
        "<!--\n  tagmove configuration (XML)\n\n  format           -> destination format string, e.g. %z/%b/%n-%t\n                      tokens: %a artist, %b album, %c comment, %d disc number, %e encoded by,\n                      %g genre, %l track total, %n track number, %o original artist, %p composer,\n                      %r copyright, %t title, %u url, %x disc total, %y date, %z album artist, %% percent\n  path_conversion  -> posix | windows-ascii | utf-8\n  on_collision     -> skip | abort\n  log_level        -> quiet | normal | info | debug\n  log_file         -> path to a log file (optional)\n\n  CLI flags override these values. Runs simulate unless --for-real is given.\n-->\n<config>\n  <format>%z/%b/%n-%t</format>\n  <path_conversion>posix</path_conversion>\n  <on_collision>skip</on_collision>\n  <log_level>normal</log_level>\n  <!-- <log_file>{suggested_log}</log_file> -->\n</config>\n"
    );

    write_config_secure_new_0600(path, content.as_bytes())?;
    info!("Created template config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_all_fields() {
        let x = parse_config_xml(
            "<config>\n  <format>%a/%t</format>\n  <path_conversion>windows</path_conversion>\n  <on_collision>abort</on_collision>\n  <log_level>debug</log_level>\n  <log_file>/tmp/t.log</log_file>\n</config>",
        )
        .unwrap();
        let mut cfg = Config::default();
        x.apply_to(&mut cfg).unwrap();
        assert_eq!(cfg.format.as_deref(), Some("%a/%t"));
        assert_eq!(cfg.path_conversion, PathConversion::WindowsAscii);
        assert_eq!(cfg.on_collision, CollisionPolicy::Abort);
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/t.log")));
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(parse_config_xml("<config><fromat>%a</fromat></config>").is_err());
    }

    #[test]
    fn bad_policy_is_an_error() {
        let x = parse_config_xml("<config><on_collision>maybe</on_collision></config>").unwrap();
        assert!(x.apply_to(&mut Config::default()).is_err());
    }

    #[test]
    fn template_parses_back() {
        let td = tempdir().unwrap();
        let p = td.path().join("tagmove").join("config.xml");
        create_template_config(&p).unwrap();
        let x = load_config_from_xml_path(&p).unwrap();
        let mut cfg = Config::default();
        x.apply_to(&mut cfg).unwrap();
        assert_eq!(cfg.format.as_deref(), Some("%z/%b/%n-%t"));
        assert!(cfg.log_file.is_none());

        assert!(create_template_config(&p).is_err(), "must not overwrite");
    }
}
