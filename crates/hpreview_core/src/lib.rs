pub mod config;
pub mod error;
pub mod host;
pub mod label;
pub mod path;
pub mod provider;
pub mod registry;
pub mod settings;
pub mod url;

pub use crate::error::{HostError, PreviewError};
pub use crate::host::{ContentKey, ContentNode, ContentSnapshot, DictionaryService, PublishedRoutes};
pub use crate::provider::{HeadlessPreviewProvider, PreviewOutcome, UrlInfo, UrlProvider};
pub use crate::registry::UrlProviders;
pub use crate::settings::PreviewSettings;
