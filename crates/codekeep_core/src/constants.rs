//! Shared constants used across CodeKeep crates.

/// Default API port for the CodeKeep server.
pub const DEFAULT_PORT: u16 = 5000;

/// Default maximum size of a snippet's `code` field in bytes.
pub const DEFAULT_MAX_SNIPPET_SIZE: usize = 1024 * 1024;

/// Default base URL for CLI/API clients.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Sentinel tag filter value meaning "no tag restriction".
pub const ALL_TAGS: &str = "All";

/// Base path of the snippet REST resource.
pub const SNIPPETS_API_PATH: &str = "/api/snippets";
