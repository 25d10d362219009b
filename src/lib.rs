//! Root crate facade for the CodeKeep server, client, and core library.

pub use codekeep_client as client;
pub use codekeep_server as server;

pub use codekeep_client::{ClientApp, HttpSnippetApi, SnippetApi, SnippetCache, SnippetForm};
pub use codekeep_core::{config, db, models, snippet_ops, tags, AppError, Config, Database};
pub use codekeep_server::{create_app, serve_router, AppState, EmbeddedServer};
