//! Client-side library for CodeKeep: HTTP access, a background worker, the
//! snippet cache with tag/search filters, and form state.

/// HTTP access to the snippet service.
pub mod api;
/// User intents routed through the worker and applied to the cache.
pub mod app;
/// Background worker thread and its command/event protocol.
pub mod backend;
/// Cached snippet list, filters, and selection.
pub mod cache;
/// Toast notifications.
pub mod feedback;
/// Create/edit form state and tag entry.
pub mod form;
/// Language resolution and terminal highlighting from snippet tags.
pub mod highlight;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiError, HttpSnippetApi, SnippetApi, DEFAULT_TIMEOUT};
pub use app::ClientApp;
pub use backend::{spawn_backend, BackendHandle, ClientCmd, ClientEvent, ClientOp};
pub use cache::{filter_by_tag, SnippetCache};
pub use feedback::{Notifications, Toast, ToastKind};
pub use form::{FormError, FormMode, FormSubmission, SnippetForm, TagKey};
pub use highlight::Highlighter;
