//! Headless preview settings

use std::fmt;

use crate::label::Label;

pub const DEFAULT_PREVIEW_ENDPOINT: &str = "/api/preview";
pub const DEFAULT_PREVIEW_LABEL: &str = "Preview on Frontend";

#[derive(Clone, PartialEq, Eq)]
pub struct PreviewSettings {
    /// Frontend origin, e.g. `https://your-site.com`.
    pub base_url: String,
    /// Preview entry endpoint on the frontend, e.g. `/api/preview`.
    pub preview_endpoint: String,
    /// Shared secret the frontend checks before enabling draft mode.
    pub preview_secret: String,
    /// Literal label, or `#key` when `use_localization` is on.
    pub preview_label: String,
    pub use_localization: bool,
    pub enabled: bool,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            preview_endpoint: DEFAULT_PREVIEW_ENDPOINT.to_string(),
            preview_secret: String::new(),
            preview_label: DEFAULT_PREVIEW_LABEL.to_string(),
            use_localization: false,
            enabled: true,
        }
    }
}

impl PreviewSettings {
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.base_url.is_empty() && !self.preview_secret.is_empty()
    }

    pub fn label(&self) -> Label {
        Label::parse(&self.preview_label, self.use_localization)
    }
}

impl fmt::Debug for PreviewSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = if self.preview_secret.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("PreviewSettings")
            .field("base_url", &self.base_url)
            .field("preview_endpoint", &self.preview_endpoint)
            .field("preview_secret", &secret)
            .field("preview_label", &self.preview_label)
            .field("use_localization", &self.use_localization)
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> PreviewSettings {
        PreviewSettings {
            base_url: "https://site.com".to_string(),
            preview_secret: "s3cr3t".to_string(),
            ..PreviewSettings::default()
        }
    }

    #[test]
    fn defaults_are_not_configured() {
        let settings = PreviewSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.preview_endpoint, "/api/preview");
        assert_eq!(settings.preview_label, "Preview on Frontend");
        assert!(!settings.is_configured());
    }

    #[test]
    fn requires_enabled_base_url_and_secret() {
        assert!(configured().is_configured());

        let mut disabled = configured();
        disabled.enabled = false;
        assert!(!disabled.is_configured());

        let mut no_base = configured();
        no_base.base_url.clear();
        assert!(!no_base.is_configured());

        let mut no_secret = configured();
        no_secret.preview_secret.clear();
        assert!(!no_secret.is_configured());
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", configured());
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("<redacted>"));
    }
}
