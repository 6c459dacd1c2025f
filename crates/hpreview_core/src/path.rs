use tracing::{debug, warn};

use crate::error::HostError;
use crate::host::{ContentNode, PublishedRoutes, UNRESOLVABLE_ROUTE};

pub const FALLBACK_SEGMENT: &str = "content";

/// Public path of `content`, preferring the published route over the
/// synthesized one. Never fails.
pub async fn resolve_content_path(
    routes: &dyn PublishedRoutes,
    content: &dyn ContentNode,
    culture: Option<&str>,
) -> String {
    let culture = normalize_culture(culture);
    match routes.relative_url(content.key(), culture).await {
        Ok(Some(url)) if is_usable_route(&url) => return url,
        Ok(_) => {}
        Err(HostError::Unavailable(what)) => {
            debug!(key = %content.key(), "{what} unavailable, using fallback path");
        }
        Err(err) => {
            warn!(key = %content.key(), error = %err, "route lookup failed, using fallback path");
        }
    }
    fallback_path(content, culture)
}

/// `/{language}/{segment}` built from the node name, or `/{segment}` for
/// invariant content.
pub fn fallback_path(content: &dyn ContentNode, culture: Option<&str>) -> String {
    let culture = normalize_culture(culture);
    let name = culture
        .and_then(|code| content.culture_name(code))
        .filter(|name| !name.is_empty())
        .or_else(|| content.name());
    let segment = url_segment(name.unwrap_or(""));
    let prefix = culture.map(culture_prefix).unwrap_or_default();
    format!("{prefix}/{segment}")
}

pub fn url_segment(name: &str) -> String {
    if name.is_empty() {
        return FALLBACK_SEGMENT.to_string();
    }
    name.to_lowercase().replace(' ', "-")
}

fn culture_prefix(culture: &str) -> String {
    let language = culture.split(['-', '_']).next().unwrap_or(culture);
    format!("/{}", language.to_lowercase())
}

fn normalize_culture(culture: Option<&str>) -> Option<&str> {
    culture.filter(|code| !code.is_empty())
}

fn is_usable_route(url: &str) -> bool {
    !url.is_empty() && url != UNRESOLVABLE_ROUTE
}
