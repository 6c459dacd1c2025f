use tracing::{debug, warn};

use crate::host::{DictionaryItem, DictionaryService};

pub const DICTIONARY_MARKER: char = '#';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Literal(String),
    DictionaryRef { key: String, raw: String },
}

impl Label {
    /// `#key` is a dictionary reference only when localization is on.
    /// Every leading marker is stripped from the key.
    pub fn parse(raw: &str, use_localization: bool) -> Self {
        if use_localization && raw.starts_with(DICTIONARY_MARKER) {
            Label::DictionaryRef {
                key: raw.trim_start_matches(DICTIONARY_MARKER).to_string(),
                raw: raw.to_string(),
            }
        } else {
            Label::Literal(raw.to_string())
        }
    }

    /// The label text as configured.
    pub fn original(&self) -> String {
        match self {
            Label::Literal(text) | Label::DictionaryRef { raw: text, .. } => text.clone(),
        }
    }
}

pub async fn resolve_label(
    label: &Label,
    dictionary: &dyn DictionaryService,
    culture: Option<&str>,
) -> String {
    let key = match label {
        Label::Literal(text) => return text.clone(),
        Label::DictionaryRef { key, .. } => key,
    };
    match dictionary.get(key).await {
        Ok(Some(item)) => {
            if let Some(value) = select_translation(&item, culture) {
                return value.to_string();
            }
            debug!(key = %key, "dictionary item has no usable translation");
        }
        Ok(None) => {
            debug!(key = %key, "dictionary item not found");
        }
        Err(err) => {
            warn!(key = %key, error = %err, "failed to get dictionary item");
        }
    }
    label.original()
}

/// Exact culture match first, then the first non-empty translation.
pub fn select_translation<'a>(item: &'a DictionaryItem, culture: Option<&str>) -> Option<&'a str> {
    let non_empty = |value: &'a Option<String>| value.as_deref().filter(|text| !text.is_empty());
    let exact = culture.and_then(|culture| {
        item.translations
            .iter()
            .find(|translation| translation.language_code.eq_ignore_ascii_case(culture))
    });
    exact
        .and_then(|translation| non_empty(&translation.value))
        .or_else(|| {
            item.translations
                .iter()
                .find_map(|translation| non_empty(&translation.value))
        })
}
