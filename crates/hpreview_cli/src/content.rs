//! File-backed content store for the demo frontend

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentFile {
    #[serde(default)]
    pub items: Vec<ContentItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentItem {
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// Unpublished edits, shown only in draft mode.
    #[serde(default)]
    pub draft_blocks: Option<Vec<Block>>,
}

impl ContentItem {
    pub fn blocks_for(&self, draft: bool) -> &[Block] {
        match (&self.draft_blocks, draft) {
            (Some(blocks), true) => blocks,
            _ => &self.blocks,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub content_type: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub settings: BlockSettings,
}

impl Block {
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(|value| value.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockSettings {
    #[serde(default)]
    pub hide: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    items: Vec<ContentItem>,
}

impl ContentStore {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read content {}", path.display()))?;
        let parsed: ContentFile = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON content {}", path.display()))?;
        Self::from_items(parsed.items)
    }

    pub fn from_items(items: Vec<ContentItem>) -> Result<Self> {
        let mut seen = std::collections::BTreeSet::new();
        for item in &items {
            let path = normalize_route(&item.path);
            if !seen.insert(path.clone()) {
                bail!("duplicate content path: {path}");
            }
        }
        Ok(Self { items })
    }

    pub fn find(&self, path: &str) -> Option<&ContentItem> {
        let wanted = normalize_route(path);
        self.items
            .iter()
            .find(|item| normalize_route(&item.path) == wanted)
    }
}

/// `/about/` and `about` both become `/about`; the root stays `/`.
pub fn normalize_route(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed.to_lowercase())
    }
}
