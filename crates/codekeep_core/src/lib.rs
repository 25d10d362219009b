//! Core domain library for CodeKeep (config, storage, models, snippet operations).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants used across CodeKeep crates.
pub mod constants;
/// Database access layer backed by redb.
pub mod db;
/// Application error types (storage/domain).
pub mod error;
/// Data models for API requests and persistence.
pub mod models;
/// Validated snippet operations shared by the HTTP handlers and tooling.
pub mod snippet_ops;
/// Tag normalization and matching helpers.
pub mod tags;

pub use config::Config;
pub use constants::{ALL_TAGS, DEFAULT_MAX_SNIPPET_SIZE, DEFAULT_PORT, DEFAULT_SERVER_URL};
pub use db::Database;
pub use error::AppError;
