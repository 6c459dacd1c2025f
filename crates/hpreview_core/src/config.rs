use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::warn;

use crate::settings::PreviewSettings;

pub const ENV_PREFIX: &str = "HEADLESS_PREVIEW__";

#[derive(Debug, Deserialize)]
struct ConfigFileRaw {
    headless_preview: Option<PreviewSettingsRaw>,
}

#[derive(Debug, Default, Deserialize)]
struct PreviewSettingsRaw {
    base_url: Option<String>,
    preview_endpoint: Option<String>,
    preview_secret: Option<String>,
    preview_label: Option<String>,
    use_localization: Option<bool>,
    enabled: Option<bool>,
}

pub fn load_preview_settings(path: &Path) -> Result<PreviewSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_preview_settings(&raw)
        .with_context(|| format!("failed to parse YAML config {}", path.display()))
}

pub fn parse_preview_settings(raw: &str) -> Result<PreviewSettings> {
    let parsed: Option<ConfigFileRaw> = if raw.trim().is_empty() {
        None
    } else {
        serde_yaml::from_str(raw)?
    };
    let section = parsed
        .and_then(|file| file.headless_preview)
        .unwrap_or_default();
    let defaults = PreviewSettings::default();
    Ok(PreviewSettings {
        base_url: section.base_url.unwrap_or(defaults.base_url),
        preview_endpoint: section.preview_endpoint.unwrap_or(defaults.preview_endpoint),
        preview_secret: section.preview_secret.unwrap_or(defaults.preview_secret),
        preview_label: section.preview_label.unwrap_or(defaults.preview_label),
        use_localization: section.use_localization.unwrap_or(defaults.use_localization),
        enabled: section.enabled.unwrap_or(defaults.enabled),
    })
}

/// Applies `HEADLESS_PREVIEW__<KEY>` overrides on top of file settings.
/// Unknown keys are skipped with a warning.
pub fn apply_env_overrides<I>(mut settings: PreviewSettings, vars: I) -> Result<PreviewSettings>
where
    I: IntoIterator<Item = (String, String)>,
{
    for (name, value) in vars {
        let Some(key) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        match key.to_ascii_lowercase().as_str() {
            "base_url" => settings.base_url = value,
            "preview_endpoint" => settings.preview_endpoint = value,
            "preview_secret" => settings.preview_secret = value,
            "preview_label" => settings.preview_label = value,
            "use_localization" => settings.use_localization = parse_bool(&name, &value)?,
            "enabled" => settings.enabled = parse_bool(&name, &value)?,
            _ => warn!(variable = %name, "ignoring unknown setting override"),
        }
    }
    Ok(settings)
}

pub fn load_settings_with_env(path: &Path) -> Result<PreviewSettings> {
    let settings = load_preview_settings(path)?;
    apply_env_overrides(settings, std::env::vars())
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => bail!("invalid boolean for {name}: {value:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn missing_section_yields_defaults() {
        let settings = parse_preview_settings("other:\n  key: 1\n").expect("parse");
        assert_eq!(settings, PreviewSettings::default());
        assert!(!settings.is_configured());
    }

    #[test]
    fn empty_document_yields_defaults() {
        let settings = parse_preview_settings("").expect("parse");
        assert_eq!(settings, PreviewSettings::default());
    }

    #[test]
    fn partial_section_fills_defaults() {
        let settings = parse_preview_settings(
            "headless_preview:\n  base_url: \"https://site.com\"\n  preview_secret: \"abc\"\n",
        )
        .expect("parse");
        assert_eq!(settings.base_url, "https://site.com");
        assert_eq!(settings.preview_secret, "abc");
        assert_eq!(settings.preview_endpoint, "/api/preview");
        assert_eq!(settings.preview_label, "Preview on Frontend");
        assert!(settings.enabled);
        assert!(!settings.use_localization);
        assert!(settings.is_configured());
    }

    #[test]
    fn full_section_is_read() {
        let settings = parse_preview_settings(
            "headless_preview:\n  base_url: \"https://site.com/\"\n  preview_endpoint: \"/preview\"\n  preview_secret: \"abc\"\n  preview_label: \"#PreviewLabel\"\n  use_localization: true\n  enabled: false\n",
        )
        .expect("parse");
        assert_eq!(settings.preview_endpoint, "/preview");
        assert_eq!(settings.preview_label, "#PreviewLabel");
        assert!(settings.use_localization);
        assert!(!settings.enabled);
    }

    #[test]
    fn invalid_yaml_names_the_file() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("preview.yaml");
        fs::write(&path, "headless_preview: [unclosed").expect("write config");
        let err = load_preview_settings(&path).expect_err("expected error");
        assert!(err.to_string().contains("preview.yaml"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = TempDir::new().expect("tempdir");
        let err = load_preview_settings(&temp.path().join("absent.yaml")).expect_err("error");
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn env_overrides_win_over_file() {
        let base = parse_preview_settings("headless_preview:\n  base_url: \"https://a.com\"\n")
            .expect("parse");
        let settings = apply_env_overrides(
            base,
            vars(&[
                ("HEADLESS_PREVIEW__BASE_URL", "https://b.com"),
                ("HEADLESS_PREVIEW__PREVIEW_SECRET", "env-secret"),
                ("HEADLESS_PREVIEW__USE_LOCALIZATION", "Yes"),
                ("HEADLESS_PREVIEW__ENABLED", "0"),
                ("PATH", "/usr/bin"),
            ]),
        )
        .expect("overrides");
        assert_eq!(settings.base_url, "https://b.com");
        assert_eq!(settings.preview_secret, "env-secret");
        assert!(settings.use_localization);
        assert!(!settings.enabled);
    }

    #[test]
    fn env_override_rejects_bad_boolean() {
        let err = apply_env_overrides(
            PreviewSettings::default(),
            vars(&[("HEADLESS_PREVIEW__ENABLED", "maybe")]),
        )
        .expect_err("expected error");
        assert!(err.to_string().contains("HEADLESS_PREVIEW__ENABLED"));
    }

    #[test]
    fn env_override_skips_unknown_key() {
        let settings = apply_env_overrides(
            PreviewSettings::default(),
            vars(&[
                ("HEADLESS_PREVIEW__COLOR", "blue"),
                ("HEADLESS_PREVIEW__PREVIEW_SECRET", "env-secret"),
            ]),
        )
        .expect("overrides");
        assert_eq!(settings.preview_secret, "env-secret");
        assert_eq!(
            settings,
            PreviewSettings {
                preview_secret: "env-secret".to_string(),
                ..PreviewSettings::default()
            }
        );
    }
}
