//! Snippet store tests.

use super::*;
use crate::db::Database;
use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

fn setup_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("open db");
    (db, temp_dir)
}

fn snippet_at(title: &str, tags: &[&str], minutes: i64) -> Snippet {
    let mut snippet = Snippet::new(NewSnippet {
        title: title.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        description: None,
        code: format!("// {}", title),
    });
    let at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes);
    snippet.created_at = at;
    snippet.updated_at = at;
    snippet
}

#[test]
fn snippet_create_get_update_delete_roundtrip() {
    let (db, _temp) = setup_test_db();

    let snippet = snippet_at("Quicksort", &["python"], 0);
    db.snippets.create(&snippet).expect("create");

    let fetched = db
        .snippets
        .get(&snippet.id)
        .expect("get")
        .expect("snippet should exist");
    assert_eq!(fetched, snippet);

    let update = UpdateSnippetRequest {
        code: Some("def qs(xs): ...".to_string()),
        ..UpdateSnippetRequest::default()
    };
    let updated = db
        .snippets
        .update(&snippet.id, &update)
        .expect("update")
        .expect("updated");
    assert_eq!(updated.code, "def qs(xs): ...");
    assert_eq!(updated.title, "Quicksort");
    assert!(updated.updated_at > snippet.updated_at);
    assert_eq!(updated.created_at, snippet.created_at);

    assert!(db
        .snippets
        .delete_and_return(&snippet.id)
        .expect("delete")
        .is_some());
    assert!(db.snippets.get(&snippet.id).expect("get").is_none());
}

#[test]
fn create_rejects_duplicate_id_without_overwrite() {
    let (db, _temp) = setup_test_db();

    let original = snippet_at("first", &[], 0);
    db.snippets.create(&original).expect("create original");

    let mut conflicting = snippet_at("second", &[], 1);
    conflicting.id = original.id.clone();
    let err = db
        .snippets
        .create(&conflicting)
        .expect_err("duplicate id create must fail");
    assert!(
        matches!(err, AppError::Storage(ref message) if message.contains("already exists")),
        "unexpected duplicate-create error: {}",
        err
    );

    let stored = db.snippets.get(&original.id).expect("get").expect("exists");
    assert_eq!(stored.title, "first");
}

#[test]
fn list_orders_by_creation_newest_first_regardless_of_updates() {
    let (db, _temp) = setup_test_db();
    let oldest = snippet_at("oldest", &[], 0);
    let middle = snippet_at("middle", &[], 10);
    let newest = snippet_at("newest", &[], 20);
    for snippet in [&middle, &oldest, &newest] {
        db.snippets.create(snippet).expect("create");
    }

    // Touching the oldest row must not move it in a creation-ordered list.
    db.snippets
        .toggle_favorite(&oldest.id)
        .expect("toggle")
        .expect("exists");

    let titles: Vec<String> = db
        .snippets
        .list(None)
        .expect("list")
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(titles, vec!["newest", "middle", "oldest"]);
}

#[test]
fn list_search_is_case_insensitive_substring_over_title_description_and_tags() {
    let (db, _temp) = setup_test_db();
    let bst = snippet_at("Binary Search Tree", &["dsa"], 0);
    let mut described = snippet_at("Debounce", &["javascript"], 1);
    described.description = Some("Delay a SEARCH box handler".to_string());
    let tagged = snippet_at("Heap", &["searching"], 2);
    let unrelated = snippet_at("Flexbox", &["css"], 3);
    for snippet in [&bst, &described, &tagged, &unrelated] {
        db.snippets.create(snippet).expect("create");
    }

    for query in ["search", "SEARCH", " Search "] {
        let ids: Vec<String> = db
            .snippets
            .list(Some(query))
            .expect("search")
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(
            ids,
            vec![tagged.id.clone(), described.id.clone(), bst.id.clone()],
            "query: {:?}",
            query
        );
    }

    let ids: Vec<String> = db
        .snippets
        .list(Some("ary tree"))
        .expect("search")
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec![bst.id.clone()]);
}

#[test]
fn blank_search_returns_everything() {
    let (db, _temp) = setup_test_db();
    db.snippets.create(&snippet_at("a", &[], 0)).expect("create");
    db.snippets.create(&snippet_at("b", &[], 1)).expect("create");
    assert_eq!(db.snippets.list(Some("   ")).expect("list").len(), 2);
    assert_eq!(db.snippets.list(Some("")).expect("list").len(), 2);
}

#[test]
fn missing_ids_report_none_for_every_mutation() {
    let (db, _temp) = setup_test_db();
    assert!(db
        .snippets
        .update(
            "missing",
            &UpdateSnippetRequest {
                is_favorite: Some(true),
                ..UpdateSnippetRequest::default()
            },
        )
        .expect("update")
        .is_none());
    assert!(db
        .snippets
        .toggle_favorite("missing")
        .expect("toggle")
        .is_none());
    assert!(db
        .snippets
        .delete_and_return("missing")
        .expect("delete")
        .is_none());
}

#[test]
fn toggle_favorite_twice_restores_flag_and_bumps_updated_at_each_time() {
    let (db, _temp) = setup_test_db();
    let snippet = snippet_at("Toggle me", &[], 0);
    db.snippets.create(&snippet).expect("create");

    let first = db
        .snippets
        .toggle_favorite(&snippet.id)
        .expect("toggle")
        .expect("exists");
    assert!(first.is_favorite);
    assert!(first.updated_at > snippet.updated_at);

    let second = db
        .snippets
        .toggle_favorite(&snippet.id)
        .expect("toggle")
        .expect("exists");
    assert!(!second.is_favorite);
    assert!(second.updated_at > first.updated_at);
}

#[test]
fn delete_removes_index_entry() {
    let (db, _temp) = setup_test_db();
    let keep = snippet_at("keep", &[], 0);
    let drop_me = snippet_at("drop", &[], 1);
    db.snippets.create(&keep).expect("create");
    db.snippets.create(&drop_me).expect("create");

    let deleted = db
        .snippets
        .delete_and_return(&drop_me.id)
        .expect("delete")
        .expect("deleted row");
    assert_eq!(deleted.title, "drop");

    let remaining = db.snippets.list(None).expect("list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);
    assert!(db
        .snippets
        .delete_and_return(&drop_me.id)
        .expect("second delete")
        .is_none());
}
