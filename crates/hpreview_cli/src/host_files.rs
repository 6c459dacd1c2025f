//! File- and argument-backed stand-ins for the host CMS services, used by
//! the offline `url` command.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use hpreview_core::host::{DictionaryItem, Translation};
use hpreview_core::{ContentKey, DictionaryService, HostError, PublishedRoutes};
use serde::Deserialize;

/// Routing index that knows at most one published route.
pub struct StaticRoute {
    route: Option<(ContentKey, String)>,
}

impl StaticRoute {
    pub fn new(key: ContentKey, route: Option<String>) -> Self {
        Self {
            route: route.map(|route| (key, route)),
        }
    }
}

#[async_trait]
impl PublishedRoutes for StaticRoute {
    async fn relative_url(
        &self,
        key: ContentKey,
        _culture: Option<&str>,
    ) -> Result<Option<String>, HostError> {
        match &self.route {
            Some((known, route)) if *known == key => Ok(Some(route.clone())),
            Some(_) => Ok(None),
            None => Err(HostError::Unavailable("routing index")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranslationRaw {
    language: String,
    value: Option<String>,
}

/// Dictionary loaded from YAML: `key: [ { language, value } ]`.
#[derive(Debug, Default)]
pub struct FileDictionary {
    items: Vec<DictionaryItem>,
}

impl FileDictionary {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read dictionary {}", path.display()))?;
        Self::parse(&raw)
            .with_context(|| format!("failed to parse YAML dictionary {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let parsed: serde_yaml::Mapping = serde_yaml::from_str(raw)?;
        let mut items = Vec::with_capacity(parsed.len());
        for (key, value) in parsed {
            let key = key
                .as_str()
                .context("dictionary keys must be strings")?
                .to_string();
            let translations: Vec<TranslationRaw> = serde_yaml::from_value(value)
                .with_context(|| format!("invalid translations for {key}"))?;
            items.push(DictionaryItem {
                key,
                translations: translations
                    .into_iter()
                    .map(|raw| Translation {
                        language_code: raw.language,
                        value: raw.value,
                    })
                    .collect(),
            });
        }
        Ok(Self { items })
    }
}

#[async_trait]
impl DictionaryService for FileDictionary {
    async fn get(&self, key: &str) -> Result<Option<DictionaryItem>, HostError> {
        Ok(self.items.iter().find(|item| item.key == key).cloned())
    }
}
