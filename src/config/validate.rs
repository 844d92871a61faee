//! Config validation.
//! Everything that can be rejected before the walk starts is rejected here,
//! so a bad format string never leaves a half-renamed tree behind.

use anyhow::Result;
use tracing::debug;

use crate::errors::TagMoveError;
use crate::format::Template;

use super::types::Config;

impl Config {
    /// The parsed format string.
    pub fn template(&self) -> Result<Template> {
        let raw = self
            .format
            .as_deref()
            .filter(|f| !f.is_empty())
            .ok_or(TagMoveError::MissingFormat)?;
        Ok(Template::parse(raw)?)
    }

    pub fn validate(&self) -> Result<()> {
        let template = self.template()?;
        if template.is_literal() {
            debug!(format = %template, "Format string has no tokens; every file maps to the same name");
        }
        debug!(
            format = %template,
            path_conversion = %self.path_conversion,
            on_collision = %self.on_collision,
            simulate = self.simulate,
            "Config validated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_format_is_rejected() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TagMoveError>(),
            Some(TagMoveError::MissingFormat)
        ));
    }

    #[test]
    fn malformed_format_is_rejected() {
        let err = Config::new("%a-%").validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TagMoveError>(),
            Some(TagMoveError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn good_format_passes() {
        Config::new("%z/%b/%n-%t").validate().unwrap();
    }
}
