//! Preview URL provider registered with the host CMS
//!
//! The provider only answers preview requests. Regular front-end URL
//! resolution stays with the host's other providers.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{debug, error};

use crate::error::PreviewError;
use crate::host::{ContentKey, ContentNode, DictionaryService, PublishedRoutes};
use crate::label::resolve_label;
use crate::path::resolve_content_path;
use crate::settings::PreviewSettings;
use crate::url::PreviewUrlBuilder;

pub const PROVIDER_ALIAS: &str = "HeadlessPreview";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlInfo {
    pub url: String,
    pub provider: String,
    pub culture: Option<String>,
    pub message: String,
    pub is_external: bool,
}

/// URL provider contract of the host.
#[async_trait]
pub trait UrlProvider: Send + Sync {
    fn alias(&self) -> &str;

    fn url(&self, content: &dyn ContentNode, culture: Option<&str>) -> Option<UrlInfo>;

    fn other_urls(&self, key: ContentKey) -> Vec<UrlInfo>;

    async fn preview_url(&self, content: &dyn ContentNode, culture: Option<&str>)
    -> Option<UrlInfo>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    NotConfigured,
    PathUnresolved,
    Resolved(UrlInfo),
}

impl PreviewOutcome {
    pub fn into_url_info(self) -> Option<UrlInfo> {
        match self {
            PreviewOutcome::Resolved(info) => Some(info),
            PreviewOutcome::NotConfigured | PreviewOutcome::PathUnresolved => None,
        }
    }
}

pub struct HeadlessPreviewProvider {
    settings: Arc<PreviewSettings>,
    routes: Arc<dyn PublishedRoutes>,
    dictionary: Arc<dyn DictionaryService>,
}

impl HeadlessPreviewProvider {
    pub fn new(
        settings: Arc<PreviewSettings>,
        routes: Arc<dyn PublishedRoutes>,
        dictionary: Arc<dyn DictionaryService>,
    ) -> Self {
        Self {
            settings,
            routes,
            dictionary,
        }
    }

    pub async fn dispatch(
        &self,
        content: &dyn ContentNode,
        culture: Option<&str>,
    ) -> Result<PreviewOutcome, PreviewError> {
        if !self.settings.is_configured() {
            return Ok(PreviewOutcome::NotConfigured);
        }

        let path = resolve_content_path(self.routes.as_ref(), content, culture).await;
        if path.is_empty() {
            debug!(
                content = content.name().unwrap_or_default(),
                culture = ?culture,
                "could not determine content path for preview"
            );
            return Ok(PreviewOutcome::PathUnresolved);
        }

        let label = self.settings.label();
        let message = resolve_label(&label, self.dictionary.as_ref(), culture).await;
        let url = PreviewUrlBuilder::new(&self.settings).build(&path, content.key())?;

        debug!(
            content = content.name().unwrap_or_default(),
            url = %url,
            "generated headless preview url"
        );
        Ok(PreviewOutcome::Resolved(UrlInfo {
            url,
            provider: PROVIDER_ALIAS.to_string(),
            culture: culture.map(str::to_string),
            message,
            is_external: true,
        }))
    }
}

#[async_trait]
impl UrlProvider for HeadlessPreviewProvider {
    fn alias(&self) -> &str {
        PROVIDER_ALIAS
    }

    fn url(&self, _content: &dyn ContentNode, _culture: Option<&str>) -> Option<UrlInfo> {
        None
    }

    fn other_urls(&self, _key: ContentKey) -> Vec<UrlInfo> {
        Vec::new()
    }

    async fn preview_url(
        &self,
        content: &dyn ContentNode,
        culture: Option<&str>,
    ) -> Option<UrlInfo> {
        let outcome = AssertUnwindSafe(self.dispatch(content, culture))
            .catch_unwind()
            .await;
        match outcome {
            Ok(Ok(outcome)) => outcome.into_url_info(),
            Ok(Err(err)) => {
                error!(
                    content = content.name().unwrap_or_default(),
                    error = %err,
                    "error generating preview url"
                );
                None
            }
            Err(panic) => {
                error!(
                    content = content.name().unwrap_or_default(),
                    error = panic_message(panic.as_ref()),
                    "error generating preview url"
                );
                None
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "host service panicked"
    }
}
