//! In-memory [`SnippetApi`] used by unit tests.

use crate::api::{ApiError, SnippetApi};
use codekeep_core::models::snippet::{
    normalize_description, CreateSnippetRequest, Snippet, UpdateSnippetRequest,
};
use codekeep_core::snippet_ops::{validate_create, validate_update};
use codekeep_core::tags::{contains_case_insensitive, normalize_tags};
use codekeep_core::{AppError, DEFAULT_MAX_SNIPPET_SIZE};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Shared-state fake; clones see the same snippets.
#[derive(Clone, Default)]
pub(crate) struct FakeApi {
    snippets: Arc<Mutex<Vec<Snippet>>>,
    unavailable: Arc<AtomicBool>,
}

pub(crate) fn sample_request(title: &str, tags: &[&str]) -> CreateSnippetRequest {
    CreateSnippetRequest {
        title: Some(title.to_string()),
        tags: Some(tags.iter().map(|t| t.to_string()).collect()),
        description: None,
        code: Some(format!("// {}", title)),
    }
}

fn to_api_error(err: AppError) -> ApiError {
    match err {
        AppError::Validation(message) => ApiError::Validation(message),
        AppError::NotFound => ApiError::NotFound,
        other => ApiError::Server {
            status: 500,
            message: other.to_string(),
        },
    }
}

impl FakeApi {
    /// Insert a snippet directly, newest first.
    pub(crate) fn seed(&self, title: &str, tags: &[&str]) -> Snippet {
        self.create(&sample_request(title, tags))
            .expect("seed snippet")
    }

    /// Make every subsequent call fail with a 503.
    pub(crate) fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub(crate) fn stored(&self) -> Vec<Snippet> {
        self.snippets.lock().expect("fake store").clone()
    }

    fn check_available(&self) -> Result<(), ApiError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ApiError::Server {
                status: 503,
                message: "Service unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn mutate<F>(&self, id: &str, apply: F) -> Result<Snippet, ApiError>
    where
        F: FnOnce(&mut Snippet),
    {
        self.check_available()?;
        let mut snippets = self.snippets.lock().expect("fake store");
        let snippet = snippets
            .iter_mut()
            .find(|snippet| snippet.id == id)
            .ok_or(ApiError::NotFound)?;
        apply(snippet);
        snippet.touch();
        Ok(snippet.clone())
    }
}

impl SnippetApi for FakeApi {
    fn list(&self, search: Option<&str>) -> Result<Vec<Snippet>, ApiError> {
        self.check_available()?;
        let query = search
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let snippets = self.snippets.lock().expect("fake store");
        Ok(snippets
            .iter()
            .filter(|snippet| match query.as_deref() {
                None => true,
                Some(q) => {
                    contains_case_insensitive(&snippet.title, q)
                        || snippet
                            .description
                            .as_deref()
                            .is_some_and(|d| contains_case_insensitive(d, q))
                        || snippet.tags.iter().any(|t| contains_case_insensitive(t, q))
                }
            })
            .cloned()
            .collect())
    }

    fn get(&self, id: &str) -> Result<Snippet, ApiError> {
        self.check_available()?;
        self.snippets
            .lock()
            .expect("fake store")
            .iter()
            .find(|snippet| snippet.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    fn create(&self, request: &CreateSnippetRequest) -> Result<Snippet, ApiError> {
        self.check_available()?;
        let fields =
            validate_create(request.clone(), DEFAULT_MAX_SNIPPET_SIZE).map_err(to_api_error)?;
        let snippet = Snippet::new(fields);
        self.snippets
            .lock()
            .expect("fake store")
            .insert(0, snippet.clone());
        Ok(snippet)
    }

    fn update(&self, id: &str, request: &UpdateSnippetRequest) -> Result<Snippet, ApiError> {
        validate_update(request, DEFAULT_MAX_SNIPPET_SIZE).map_err(to_api_error)?;
        let request = request.clone();
        self.mutate(id, move |snippet| {
            if let Some(title) = request.title {
                snippet.title = title.trim().to_string();
            }
            if let Some(tags) = request.tags {
                snippet.tags = normalize_tags(tags);
            }
            if let Some(description) = request.description {
                snippet.description = normalize_description(Some(description));
            }
            if let Some(code) = request.code {
                snippet.code = code;
            }
            if let Some(is_favorite) = request.is_favorite {
                snippet.is_favorite = is_favorite;
            }
        })
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.check_available()?;
        let mut snippets = self.snippets.lock().expect("fake store");
        let before = snippets.len();
        snippets.retain(|snippet| snippet.id != id);
        if snippets.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    fn toggle_favorite(&self, id: &str) -> Result<Snippet, ApiError> {
        self.mutate(id, |snippet| snippet.is_favorite = !snippet.is_favorite)
    }
}
