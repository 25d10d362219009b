//! Snippet HTTP handlers.

use crate::{error::HttpError, models::snippet::*, snippet_ops, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

/// List snippets newest first, optionally filtered by `?search=`.
///
/// # Errors
/// Returns `500` when the store fails.
pub async fn list_snippets(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Snippet>>, HttpError> {
    let snippets = snippet_ops::list_snippets(&state.db, query.search.as_deref())?;
    Ok(Json(snippets))
}

/// Fetch a snippet by id.
///
/// # Errors
/// Returns `404` for unknown ids.
pub async fn get_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Snippet>, HttpError> {
    Ok(Json(snippet_ops::get_snippet(&state.db, &id)?))
}

/// Create a snippet and return it with `201 Created`.
///
/// # Errors
/// Returns `400` when title or code is missing/blank or the code is too large.
pub async fn create_snippet(
    State(state): State<AppState>,
    Json(req): Json<CreateSnippetRequest>,
) -> Result<(StatusCode, Json<Snippet>), HttpError> {
    let snippet = snippet_ops::create_snippet(&state.db, req, state.config.max_snippet_size)?;
    Ok((StatusCode::CREATED, Json(snippet)))
}

/// Apply a partial update.
///
/// # Errors
/// Returns `404` for unknown ids and `400` for blank title/code.
pub async fn update_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSnippetRequest>,
) -> Result<Json<Snippet>, HttpError> {
    let updated =
        snippet_ops::update_snippet(&state.db, &id, &req, state.config.max_snippet_size)?;
    Ok(Json(updated))
}

/// Hard-delete a snippet.
///
/// # Errors
/// Returns `404` when the id does not exist (including repeated deletes).
pub async fn delete_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, HttpError> {
    let deleted = snippet_ops::delete_snippet(&state.db, &id)?;
    tracing::debug!("Deleted snippet {}", deleted.id);
    Ok(Json(
        serde_json::json!({ "message": "Snippet deleted successfully" }),
    ))
}

/// Flip the favorite flag and return the updated record.
///
/// Store failures on this route are reported as `400`.
///
/// # Errors
/// Returns `404` for unknown ids.
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Snippet>, HttpError> {
    snippet_ops::toggle_favorite(&state.db, &id)
        .map(Json)
        .map_err(HttpError::store_failure_as_bad_request)
}
