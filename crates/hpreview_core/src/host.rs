//! Capabilities the host CMS provides to the preview provider

use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::HostError;

/// Relative URL the routing index returns when it cannot route a node.
pub const UNRESOLVABLE_ROUTE: &str = "#";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentKey(pub Uuid);

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for ContentKey {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// The content item an editor is working on.
pub trait ContentNode: Send + Sync {
    fn key(&self) -> ContentKey;
    /// Invariant (default) name.
    fn name(&self) -> Option<&str>;
    fn culture_name(&self, culture: &str) -> Option<&str>;
}

/// Plain-data content node, for hosts that snapshot the edited item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSnapshot {
    pub key: ContentKey,
    pub name: Option<String>,
    pub culture_names: Vec<(String, String)>,
}

impl ContentSnapshot {
    pub fn new(key: impl Into<ContentKey>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: Some(name.into()),
            culture_names: Vec::new(),
        }
    }

    pub fn with_culture_name(mut self, culture: impl Into<String>, name: impl Into<String>) -> Self {
        self.culture_names.push((culture.into(), name.into()));
        self
    }
}

impl ContentNode for ContentSnapshot {
    fn key(&self) -> ContentKey {
        self.key
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn culture_name(&self, culture: &str) -> Option<&str> {
        self.culture_names
            .iter()
            .find(|(code, _)| code.eq_ignore_ascii_case(culture))
            .map(|(_, name)| name.as_str())
    }
}

/// Published-content routing index.
#[async_trait]
pub trait PublishedRoutes: Send + Sync {
    /// Relative URL of a published node. `Ok(None)` when the node is not in
    /// the index; `Err(HostError::Unavailable)` when there is no index for
    /// the current request.
    async fn relative_url(
        &self,
        key: ContentKey,
        culture: Option<&str>,
    ) -> Result<Option<String>, HostError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub language_code: String,
    pub value: Option<String>,
}

impl Translation {
    pub fn new(language_code: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            value: Some(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryItem {
    pub key: String,
    /// Declaration order is preserved.
    pub translations: Vec<Translation>,
}

#[async_trait]
pub trait DictionaryService: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<DictionaryItem>, HostError>;
}
