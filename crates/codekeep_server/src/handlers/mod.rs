//! HTTP request handlers.

/// Snippet endpoints under `/api/snippets`.
pub mod snippet;

/// Liveness probe served at `/`.
pub async fn liveness() -> &'static str {
    "CodeKeep API is running..."
}
