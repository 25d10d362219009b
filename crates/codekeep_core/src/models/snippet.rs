//! Snippet data models and request payloads.

use crate::tags::normalize_tags;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snippet record stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub code: String,
    #[serde(default)]
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Snippet shape written before tags replaced the single `category` field.
///
/// Rows of this shape only live in the legacy table and are converted by
/// [`crate::db::migrate::migrate_legacy_snippets`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacySnippet {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub code: String,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a snippet.
///
/// Required fields are optional here so that a missing field surfaces as a
/// validation error instead of a body-decoding rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSnippetRequest {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
    pub code: Option<String>,
}

/// Request payload for updating a snippet. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSnippetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// `Some("")` clears the description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

/// Query parameters for listing snippets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

/// Validated fields for a snippet about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSnippet {
    pub title: String,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub code: String,
}

impl Snippet {
    /// Create a new snippet with a fresh id and timestamps.
    ///
    /// Tags are normalized; the caller is responsible for title/code validation.
    pub fn new(fields: NewSnippet) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: fields.title,
            tags: normalize_tags(fields.tags),
            description: fields.description,
            code: fields.code,
            is_favorite: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Advance `updated_at`, keeping it strictly increasing for this record.
    pub fn touch(&mut self) {
        self.updated_at = next_updated_at(self.updated_at, Utc::now());
    }
}

/// Next `updated_at` value given the previous one and the current clock.
///
/// Clock reads within the same millisecond (or a clock step backwards) still
/// yield a later timestamp than `previous`.
pub fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous + Duration::milliseconds(1);
    if now >= floor {
        now
    } else {
        floor
    }
}

/// Trim an optional description, mapping blank text to `None`.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl From<LegacySnippet> for Snippet {
    fn from(old: LegacySnippet) -> Self {
        let LegacySnippet {
            id,
            title,
            category,
            description,
            code,
            is_favorite,
            created_at,
            updated_at,
        } = old;
        Self {
            id,
            title,
            tags: normalize_tags([category]),
            description: normalize_description(description),
            code,
            is_favorite,
            created_at,
            updated_at,
        }
    }
}
