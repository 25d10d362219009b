//! Protocol types for the client backend worker.

use crate::api::ApiError;
use codekeep_core::models::snippet::{CreateSnippetRequest, Snippet, UpdateSnippetRequest};
use std::fmt;

/// Commands issued by the controller for the backend worker to execute.
#[derive(Debug)]
pub enum ClientCmd {
    /// Re-query the service. `request_id` lets the caller drop stale replies.
    List {
        request_id: u64,
        search: Option<String>,
    },
    /// Load a single snippet by id.
    Get { id: String },
    /// Create a snippet from a validated form.
    Create { request: CreateSnippetRequest },
    /// Apply a partial update.
    Update {
        id: String,
        request: UpdateSnippetRequest,
    },
    /// Hard-delete a snippet.
    Delete { id: String },
    /// Flip the favorite flag.
    ToggleFavorite { id: String },
}

/// Which operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientOp {
    Load,
    Create,
    Update,
    Delete,
    ToggleFavorite,
}

impl fmt::Display for ClientOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Load => "Load",
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::ToggleFavorite => "Favorite",
        };
        f.write_str(label)
    }
}

/// Events produced by the backend worker and polled by the controller.
///
/// Every success event carries the server-confirmed payload.
#[derive(Debug)]
pub enum ClientEvent {
    /// Reply to [`ClientCmd::List`].
    Listed {
        request_id: u64,
        items: Vec<Snippet>,
    },
    /// A list request failed.
    ListFailed { request_id: u64, error: ApiError },
    /// Reply to [`ClientCmd::Get`].
    Loaded { snippet: Snippet },
    /// Confirmed creation.
    Created { snippet: Snippet },
    /// Confirmed update.
    Updated { snippet: Snippet },
    /// Confirmed deletion.
    Deleted { id: String },
    /// Confirmed favorite toggle.
    FavoriteToggled { snippet: Snippet },
    /// A non-list operation failed.
    Failed { op: ClientOp, error: ApiError },
}
