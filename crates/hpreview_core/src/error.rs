use thiserror::Error;

/// Failures reported by host services behind the capability traits.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("{0} is not available")]
    Unavailable(&'static str),
    #[error("host service failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("invalid base url: {0:?}")]
    InvalidBaseUrl(String),
}
