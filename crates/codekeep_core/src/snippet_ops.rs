//! Validated snippet operations shared by API handlers and maintenance tooling.
//!
//! Every function takes the store handle explicitly; none of them retries or
//! swallows store failures.

use crate::{
    models::snippet::{
        normalize_description, CreateSnippetRequest, NewSnippet, Snippet, UpdateSnippetRequest,
    },
    AppError, Database,
};

fn required_text(value: Option<&str>, field: &str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(AppError::Validation(format!("{} is required", field))),
    }
}

fn ensure_code_within_limit(code: &str, max_size: usize) -> Result<(), AppError> {
    if code.len() > max_size {
        return Err(AppError::Validation(format!(
            "Code exceeds maximum of {} bytes",
            max_size
        )));
    }
    Ok(())
}

/// Validate a create payload.
///
/// Title is trimmed; code must contain non-whitespace text but is kept verbatim.
///
/// # Errors
/// Returns [`AppError::Validation`] when title or code is missing/blank or the
/// code exceeds `max_code_size`.
pub fn validate_create(
    req: CreateSnippetRequest,
    max_code_size: usize,
) -> Result<NewSnippet, AppError> {
    let title = required_text(req.title.as_deref(), "Title")?;
    required_text(req.code.as_deref(), "Code")?;
    let code = req.code.unwrap_or_default();
    ensure_code_within_limit(&code, max_code_size)?;

    Ok(NewSnippet {
        title,
        tags: req.tags.unwrap_or_default(),
        description: normalize_description(req.description),
        code,
    })
}

/// Validate an update payload; only provided fields are checked.
///
/// # Errors
/// Returns [`AppError::Validation`] when a provided title or code is blank or
/// the code exceeds `max_code_size`.
pub fn validate_update(req: &UpdateSnippetRequest, max_code_size: usize) -> Result<(), AppError> {
    if req.title.is_some() {
        required_text(req.title.as_deref(), "Title")?;
    }
    if let Some(code) = req.code.as_deref() {
        required_text(Some(code), "Code")?;
        ensure_code_within_limit(code, max_code_size)?;
    }
    Ok(())
}

/// List snippets newest first, filtered by an optional search text.
///
/// # Errors
/// Propagates store failures.
pub fn list_snippets(db: &Database, search: Option<&str>) -> Result<Vec<Snippet>, AppError> {
    db.snippets.list(search)
}

/// Fetch one snippet.
///
/// # Errors
/// Returns [`AppError::NotFound`] for unknown ids, otherwise store failures.
pub fn get_snippet(db: &Database, id: &str) -> Result<Snippet, AppError> {
    db.snippets.get(id)?.ok_or(AppError::NotFound)
}

/// Validate and persist a new snippet.
///
/// # Returns
/// The stored record with server-assigned id and timestamps.
///
/// # Errors
/// Returns [`AppError::Validation`] for invalid payloads (nothing is written)
/// or store failures.
pub fn create_snippet(
    db: &Database,
    req: CreateSnippetRequest,
    max_code_size: usize,
) -> Result<Snippet, AppError> {
    let fields = validate_create(req, max_code_size)?;
    let snippet = Snippet::new(fields);
    db.snippets.create(&snippet)?;
    tracing::debug!("Created snippet {}", snippet.id);
    Ok(snippet)
}

/// Validate and apply a partial update.
///
/// # Errors
/// Returns [`AppError::Validation`] for invalid fields, [`AppError::NotFound`]
/// for unknown ids (store unchanged), or store failures.
pub fn update_snippet(
    db: &Database,
    id: &str,
    req: &UpdateSnippetRequest,
    max_code_size: usize,
) -> Result<Snippet, AppError> {
    validate_update(req, max_code_size)?;
    db.snippets.update(id, req)?.ok_or(AppError::NotFound)
}

/// Hard-delete a snippet.
///
/// # Errors
/// Returns [`AppError::NotFound`] when the id does not exist, including when
/// it was already deleted.
pub fn delete_snippet(db: &Database, id: &str) -> Result<Snippet, AppError> {
    db.snippets.delete_and_return(id)?.ok_or(AppError::NotFound)
}

/// Flip the favorite flag.
///
/// # Errors
/// Returns [`AppError::NotFound`] for unknown ids, otherwise store failures.
pub fn toggle_favorite(db: &Database, id: &str) -> Result<Snippet, AppError> {
    db.snippets.toggle_favorite(id)?.ok_or(AppError::NotFound)
}
