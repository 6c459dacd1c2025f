use std::sync::Arc;

use crate::host::{ContentNode, DictionaryService, PublishedRoutes};
use crate::provider::{HeadlessPreviewProvider, UrlInfo, UrlProvider};
use crate::settings::PreviewSettings;

/// Ordered URL provider collection; earlier providers are offered first.
#[derive(Default, Clone)]
pub struct UrlProviders {
    providers: Vec<Arc<dyn UrlProvider>>,
}

impl UrlProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_first(&mut self, provider: Arc<dyn UrlProvider>) {
        self.providers.insert(0, provider);
    }

    pub fn append(&mut self, provider: Arc<dyn UrlProvider>) {
        self.providers.push(provider);
    }

    pub fn aliases(&self) -> Vec<&str> {
        self.providers.iter().map(|provider| provider.alias()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Preview options for `content`, in provider order.
    pub async fn preview_urls(
        &self,
        content: &dyn ContentNode,
        culture: Option<&str>,
    ) -> Vec<UrlInfo> {
        let mut urls = Vec::new();
        for provider in &self.providers {
            if let Some(info) = provider.preview_url(content, culture).await {
                urls.push(info);
            }
        }
        urls
    }
}

/// Registers the headless preview provider as the primary preview option.
pub fn compose(
    providers: &mut UrlProviders,
    settings: Arc<PreviewSettings>,
    routes: Arc<dyn PublishedRoutes>,
    dictionary: Arc<dyn DictionaryService>,
) {
    providers.insert_first(Arc::new(HeadlessPreviewProvider::new(
        settings, routes, dictionary,
    )));
}
