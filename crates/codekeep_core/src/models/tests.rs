use super::snippet::*;
use chrono::{Duration, TimeZone, Utc};

fn sample_fields() -> NewSnippet {
    NewSnippet {
        title: "Binary Search Tree".to_string(),
        tags: vec!["Rust".to_string(), "rust".to_string(), "DSA".to_string()],
        description: Some("Insert and lookup".to_string()),
        code: "struct Node;".to_string(),
    }
}

#[test]
fn new_snippet_normalizes_tags_and_sets_timestamps() {
    let snippet = Snippet::new(sample_fields());
    assert!(!snippet.id.is_empty());
    assert_eq!(snippet.tags, vec!["rust".to_string(), "dsa".to_string()]);
    assert!(!snippet.is_favorite);
    assert_eq!(snippet.created_at, snippet.updated_at);
}

#[test]
fn snippet_json_uses_camel_case_and_iso_timestamps() {
    let mut snippet = Snippet::new(sample_fields());
    snippet.created_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    snippet.updated_at = snippet.created_at;

    let value = serde_json::to_value(&snippet).expect("serialize");
    assert_eq!(value["isFavorite"], false);
    assert_eq!(value["createdAt"], "2024-03-01T12:00:00Z");
    assert_eq!(value["updatedAt"], "2024-03-01T12:00:00Z");
    assert_eq!(value["tags"][0], "rust");
    assert!(value.get("is_favorite").is_none());
}

#[test]
fn create_request_accepts_missing_fields_and_ignores_legacy_category() {
    let req: CreateSnippetRequest =
        serde_json::from_str(r#"{"code":"x","category":"React"}"#).expect("parse");
    assert!(req.title.is_none());
    assert!(req.tags.is_none());
    assert_eq!(req.code.as_deref(), Some("x"));
}

#[test]
fn update_request_parses_camel_case_favorite_flag() {
    let req: UpdateSnippetRequest =
        serde_json::from_str(r#"{"isFavorite":true}"#).expect("parse");
    assert_eq!(req.is_favorite, Some(true));
    assert!(req.title.is_none());
    assert!(req.code.is_none());
}

#[test]
fn next_updated_at_is_strictly_increasing() {
    let previous = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(
        next_updated_at(previous, previous),
        previous + Duration::milliseconds(1)
    );
    let earlier = previous - Duration::seconds(5);
    assert!(next_updated_at(previous, earlier) > previous);
    let later = previous + Duration::seconds(5);
    assert_eq!(next_updated_at(previous, later), later);
}

#[test]
fn legacy_category_becomes_single_lowercase_tag() {
    let created = Utc.with_ymd_and_hms(2023, 5, 1, 8, 30, 0).unwrap();
    let legacy = LegacySnippet {
        id: "legacy-1".to_string(),
        title: "Flexbox centering".to_string(),
        category: " CSS ".to_string(),
        description: Some("   ".to_string()),
        code: ".c { display: flex; }".to_string(),
        is_favorite: true,
        created_at: created,
        updated_at: created,
    };
    let migrated = Snippet::from(legacy);
    assert_eq!(migrated.id, "legacy-1");
    assert_eq!(migrated.tags, vec!["css".to_string()]);
    assert!(migrated.description.is_none());
    assert!(migrated.is_favorite);
    assert_eq!(migrated.created_at, created);
}

#[test]
fn normalize_description_trims_and_drops_blank() {
    assert_eq!(
        normalize_description(Some("  hi  ".to_string())).as_deref(),
        Some("hi")
    );
    assert!(normalize_description(Some(" ".to_string())).is_none());
    assert!(normalize_description(None).is_none());
}
