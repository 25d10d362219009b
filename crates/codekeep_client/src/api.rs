//! HTTP access to the snippet service.
//!
//! [`SnippetApi`] is the seam the background worker talks to; [`HttpSnippetApi`]
//! is the real implementation over blocking `reqwest`.

use codekeep_core::constants::SNIPPETS_API_PATH;
use codekeep_core::models::snippet::{CreateSnippetRequest, Snippet, UpdateSnippetRequest};
use reqwest::{blocking::Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Default request timeout for client calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure reported by a snippet service call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service rejected the payload (HTTP 400).
    #[error("{0}")]
    Validation(String),

    /// The snippet does not exist (HTTP 404).
    #[error("Snippet not found")]
    NotFound,

    /// Any other non-success status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Connection, timeout, or other transport failure.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected JSON shape.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The configured server URL cannot be used as an API base.
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Operations the client needs from the snippet service.
pub trait SnippetApi {
    /// List snippets newest first, optionally filtered by search text.
    fn list(&self, search: Option<&str>) -> Result<Vec<Snippet>, ApiError>;
    /// Fetch one snippet.
    fn get(&self, id: &str) -> Result<Snippet, ApiError>;
    /// Create a snippet; returns the confirmed record.
    fn create(&self, request: &CreateSnippetRequest) -> Result<Snippet, ApiError>;
    /// Partially update a snippet; returns the confirmed record.
    fn update(&self, id: &str, request: &UpdateSnippetRequest) -> Result<Snippet, ApiError>;
    /// Hard-delete a snippet.
    fn delete(&self, id: &str) -> Result<(), ApiError>;
    /// Flip the favorite flag; returns the confirmed record.
    fn toggle_favorite(&self, id: &str) -> Result<Snippet, ApiError>;
}

/// Extract the human-readable message from an error response body.
///
/// Prefers the `error` field of a JSON body, then the raw body, then the
/// status reason phrase.
pub fn error_message_for_response(status: StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return value
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or(body)
            .to_string();
    }

    body.to_string()
}

fn error_for_status(status: StatusCode, body: &str) -> ApiError {
    let message = error_message_for_response(status, body);
    match status {
        StatusCode::BAD_REQUEST => ApiError::Validation(message),
        StatusCode::NOT_FOUND => ApiError::NotFound,
        _ => ApiError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

/// Trim whitespace and trailing slashes from a server URL.
pub fn normalize_server(server: &str) -> String {
    server.trim().trim_end_matches('/').to_string()
}

/// [`SnippetApi`] over HTTP using a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpSnippetApi {
    client: Client,
    base: Url,
}

impl HttpSnippetApi {
    /// Build a client for `server` (e.g. `http://localhost:5000`).
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidUrl`] for unusable URLs and
    /// [`ApiError::Transport`] when the HTTP client cannot be built.
    pub fn new(server: &str, timeout: Duration) -> Result<Self, ApiError> {
        let normalized = normalize_server(server);
        let base = Url::parse(&normalized).map_err(|err| ApiError::InvalidUrl {
            url: normalized.clone(),
            reason: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: normalized,
                reason: "cannot be used as an API base".to_string(),
            });
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    /// Server base URL this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn api_url(&self, extra: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| ApiError::InvalidUrl {
                url: self.base.to_string(),
                reason: "cannot be used as an API base".to_string(),
            })?;
            path.pop_if_empty();
            for segment in SNIPPETS_API_PATH.split('/').filter(|s| !s.is_empty()) {
                path.push(segment);
            }
            for segment in extra {
                path.push(segment);
            }
        }
        Ok(url)
    }

    fn read_json<T: DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response)?;
        response.json::<T>().map_err(|err| {
            if err.is_decode() {
                ApiError::Decode(err.to_string())
            } else {
                ApiError::Transport(err)
            }
        })
    }

    fn ensure_success(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = match response.text() {
            Ok(body) => body,
            Err(err) => format!("failed to read error response body: {}", err),
        };
        Err(error_for_status(status, &body))
    }
}

impl SnippetApi for HttpSnippetApi {
    fn list(&self, search: Option<&str>) -> Result<Vec<Snippet>, ApiError> {
        let mut url = self.api_url(&[])?;
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            url.query_pairs_mut().append_pair("search", search);
        }
        Self::read_json(self.client.get(url).send()?)
    }

    fn get(&self, id: &str) -> Result<Snippet, ApiError> {
        let url = self.api_url(&[id])?;
        Self::read_json(self.client.get(url).send()?)
    }

    fn create(&self, request: &CreateSnippetRequest) -> Result<Snippet, ApiError> {
        let url = self.api_url(&[])?;
        Self::read_json(self.client.post(url).json(request).send()?)
    }

    fn update(&self, id: &str, request: &UpdateSnippetRequest) -> Result<Snippet, ApiError> {
        let url = self.api_url(&[id])?;
        Self::read_json(self.client.put(url).json(request).send()?)
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.api_url(&[id])?;
        Self::ensure_success(self.client.delete(url).send()?)?;
        Ok(())
    }

    fn toggle_favorite(&self, id: &str) -> Result<Snippet, ApiError> {
        let url = self.api_url(&[id, "toggle-favorite"])?;
        Self::read_json(self.client.put(url).send()?)
    }
}
