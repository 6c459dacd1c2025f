use crate::error::PreviewError;
use crate::host::ContentKey;
use crate::settings::PreviewSettings;

#[derive(Debug, Clone, Copy)]
pub struct PreviewUrlBuilder<'a> {
    base_url: &'a str,
    endpoint: &'a str,
    secret: &'a str,
}

impl<'a> PreviewUrlBuilder<'a> {
    pub fn new(settings: &'a PreviewSettings) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/'),
            endpoint: settings.preview_endpoint.trim_start_matches('/'),
            secret: &settings.preview_secret,
        }
    }

    /// `{base}/{endpoint}?secret=..&path=..&id=..`; the parameter order is
    /// part of the frontend contract.
    pub fn build(&self, path: &str, key: ContentKey) -> Result<String, PreviewError> {
        if !has_http_origin(self.base_url) {
            return Err(PreviewError::InvalidBaseUrl(self.base_url.to_string()));
        }
        Ok(format!(
            "{}/{}?secret={}&path={}&id={}",
            self.base_url,
            self.endpoint,
            urlencoding::encode(self.secret),
            urlencoding::encode(path),
            key
        ))
    }
}

pub fn build_preview_url(
    path: &str,
    settings: &PreviewSettings,
    key: ContentKey,
) -> Result<String, PreviewError> {
    PreviewUrlBuilder::new(settings).build(path, key)
}

fn has_http_origin(base_url: &str) -> bool {
    let lower = base_url.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or("");
            !host.is_empty() && !host.contains(char::is_whitespace)
        }
        None => false,
    }
}
