//! Helper functions shared by snippet storage operations.

use crate::models::snippet::{normalize_description, Snippet, UpdateSnippetRequest};
use crate::tags::{contains_case_insensitive, normalize_tags};
use chrono::{DateTime, Utc};

pub(crate) fn reverse_timestamp_key(created_at: DateTime<Utc>) -> u64 {
    // Pre-epoch timestamps clamp to the oldest slot; past 2262 to the newest.
    let nanos = created_at.timestamp_nanos_opt().unwrap_or(i64::MAX).max(0) as u64;
    u64::MAX.saturating_sub(nanos)
}

pub(crate) fn apply_update_request(snippet: &mut Snippet, update: &UpdateSnippetRequest) {
    if let Some(title) = &update.title {
        snippet.title = title.trim().to_string();
    }
    if let Some(tags) = &update.tags {
        snippet.tags = normalize_tags(tags);
    }
    if let Some(description) = &update.description {
        snippet.description = normalize_description(Some(description.clone()));
    }
    if let Some(code) = &update.code {
        snippet.code = code.clone();
    }
    if let Some(is_favorite) = update.is_favorite {
        snippet.is_favorite = is_favorite;
    }
    snippet.touch();
}

/// Title, description, or any tag contains the lowercase query.
pub(super) fn snippet_matches(snippet: &Snippet, query_lower: &str) -> bool {
    contains_case_insensitive(&snippet.title, query_lower)
        || snippet
            .description
            .as_deref()
            .map(|description| contains_case_insensitive(description, query_lower))
            .unwrap_or(false)
        || snippet
            .tags
            .iter()
            .any(|tag| contains_case_insensitive(tag, query_lower))
}

pub(crate) fn deserialize_snippet(bytes: &[u8]) -> Result<Snippet, bincode::Error> {
    bincode::deserialize(bytes)
}
