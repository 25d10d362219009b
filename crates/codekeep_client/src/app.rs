//! Client controller: routes user intents to the backend worker and applies
//! confirmed results to the cache.

use crate::api::ApiError;
use crate::backend::{BackendHandle, ClientCmd, ClientEvent, ClientOp};
use crate::cache::SnippetCache;
use crate::feedback::Notifications;
use crate::form::{FormError, FormMode, FormSubmission, SnippetForm};
use crossbeam_channel::RecvTimeoutError;
use std::time::Duration;
use tracing::debug;

/// Owns the cache, the open form, and the pending delete confirmation.
///
/// All cache mutations happen in [`ClientApp::apply_event`], driven by
/// server-confirmed events.
pub struct ClientApp {
    backend: BackendHandle,
    cache: SnippetCache,
    notifications: Notifications,
    form: Option<SnippetForm>,
    form_in_flight: bool,
    pending_delete: Option<String>,
    latest_list_request: u64,
    outstanding: usize,
}

impl ClientApp {
    pub fn new(backend: BackendHandle) -> Self {
        Self {
            backend,
            cache: SnippetCache::new(),
            notifications: Notifications::default(),
            form: None,
            form_in_flight: false,
            pending_delete: None,
            latest_list_request: 0,
            outstanding: 0,
        }
    }

    pub fn cache(&self) -> &SnippetCache {
        &self.cache
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    /// Number of commands sent whose reply has not been applied yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    fn send(&mut self, cmd: ClientCmd) -> bool {
        if self.backend.cmd_tx.send(cmd).is_err() {
            self.notifications
                .error("Request failed: backend unavailable.");
            return false;
        }
        self.outstanding += 1;
        true
    }

    /// Issue a fresh list request with the current search text.
    ///
    /// Replies to earlier list requests are ignored once this one is sent.
    pub fn refresh(&mut self) {
        self.latest_list_request += 1;
        let cmd = ClientCmd::List {
            request_id: self.latest_list_request,
            search: self.cache.search_query().map(str::to_string),
        };
        self.send(cmd);
    }

    /// Update the search text; re-queries on every change.
    pub fn set_search(&mut self, text: impl Into<String>) {
        if self.cache.set_search_text(text) {
            self.refresh();
        }
    }

    /// Switch the tag filter; `"All"` (or blank) clears it.
    pub fn set_tag_filter(&mut self, tag: &str) {
        if self.cache.set_active_tag(tag) {
            self.refresh();
        }
    }

    /// Set search text and tag filter together, then issue one list request.
    pub fn set_filters(&mut self, search: impl Into<String>, tag: &str) {
        self.cache.set_search_text(search);
        self.cache.set_active_tag(tag);
        self.refresh();
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.cache.select(id)
    }

    /// Fetch a snippet by id and select it once loaded.
    pub fn load(&mut self, id: &str) {
        self.send(ClientCmd::Get { id: id.to_string() });
    }

    pub fn open_create_form(&mut self) -> &mut SnippetForm {
        self.form_in_flight = false;
        self.form.insert(SnippetForm::new())
    }

    /// Open the edit form for a cached snippet.
    ///
    /// # Returns
    /// `None` when the id is not cached.
    pub fn open_edit_form(&mut self, id: &str) -> Option<&mut SnippetForm> {
        let snippet = self
            .cache
            .snippets()
            .iter()
            .chain(self.cache.selected())
            .find(|snippet| snippet.id == id)?
            .clone();
        self.form_in_flight = false;
        Some(self.form.insert(SnippetForm::for_edit(&snippet)))
    }

    pub fn form(&self) -> Option<&SnippetForm> {
        self.form.as_ref()
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.form_in_flight = false;
    }

    /// Validate the open form and send it. The form stays open until the
    /// service confirms, so a failed save can be corrected and resubmitted.
    ///
    /// # Errors
    /// Returns [`FormError`] when required fields are blank; nothing is sent.
    pub fn submit_form(&mut self) -> Result<(), FormError> {
        let Some(form) = self.form.as_mut() else {
            return Ok(());
        };
        let cmd = match form.finalize()? {
            FormSubmission::Create(request) => ClientCmd::Create { request },
            FormSubmission::Update { id, request } => ClientCmd::Update { id, request },
        };
        self.form_in_flight = self.send(cmd);
        Ok(())
    }

    pub fn toggle_favorite(&mut self, id: &str) {
        self.send(ClientCmd::ToggleFavorite { id: id.to_string() });
    }

    /// Stage a delete; nothing is sent until [`ClientApp::confirm_delete`].
    pub fn request_delete(&mut self, id: &str) {
        self.pending_delete = Some(id.to_string());
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Send the staged delete, if any.
    ///
    /// # Returns
    /// `true` when a delete request was sent.
    pub fn confirm_delete(&mut self) -> bool {
        match self.pending_delete.take() {
            Some(id) => self.send(ClientCmd::Delete { id }),
            None => false,
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Apply every event already waiting from the worker.
    ///
    /// # Returns
    /// Number of events applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.backend.evt_rx.try_recv() {
            self.apply_event(event);
            applied += 1;
        }
        self.notifications.prune();
        applied
    }

    /// Block until one event arrives (or `timeout` passes) and apply it.
    ///
    /// # Returns
    /// `false` on timeout or when the worker is gone.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.backend.evt_rx.recv_timeout(timeout) {
            Ok(event) => {
                self.apply_event(event);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                self.notifications.error("Backend worker stopped.");
                false
            }
        }
    }

    /// Block until every outstanding command has been answered.
    ///
    /// # Returns
    /// `false` if `timeout_each` elapsed waiting for a reply.
    pub fn settle(&mut self, timeout_each: Duration) -> bool {
        while self.outstanding > 0 {
            if !self.wait_for_event(timeout_each) {
                return false;
            }
        }
        true
    }

    fn report_failure(&mut self, op: ClientOp, error: &ApiError) {
        self.notifications.error(format!("{} failed: {}", op, error));
    }

    /// Apply one worker event to the cache. Failures leave the cache as it
    /// was and surface a notification.
    pub fn apply_event(&mut self, event: ClientEvent) {
        self.outstanding = self.outstanding.saturating_sub(1);
        match event {
            ClientEvent::Listed { request_id, items } => {
                if request_id != self.latest_list_request {
                    debug!(
                        "dropping stale list #{} (latest #{})",
                        request_id, self.latest_list_request
                    );
                    return;
                }
                self.cache.apply_list(items);
            }
            ClientEvent::ListFailed { request_id, error } => {
                if request_id == self.latest_list_request {
                    self.notifications.error(format!("Load failed: {}", error));
                }
            }
            ClientEvent::Loaded { snippet } => self.cache.select_loaded(snippet),
            ClientEvent::Created { snippet } => {
                if self.form_in_flight
                    && matches!(self.form.as_ref().map(SnippetForm::mode), Some(FormMode::Create))
                {
                    self.close_form();
                }
                self.notifications
                    .info(format!("Created \"{}\"", snippet.title));
                self.cache.apply_created(snippet);
            }
            ClientEvent::Updated { snippet } => {
                let editing_this = matches!(
                    self.form.as_ref().map(SnippetForm::mode),
                    Some(FormMode::Edit { id }) if *id == snippet.id
                );
                if self.form_in_flight && editing_this {
                    self.close_form();
                }
                self.notifications
                    .info(format!("Saved \"{}\"", snippet.title));
                self.cache.apply_updated(snippet);
            }
            ClientEvent::FavoriteToggled { snippet } => self.cache.apply_favorite_toggled(snippet),
            ClientEvent::Deleted { id } => {
                self.cache.apply_deleted(&id);
                self.notifications.info("Snippet deleted");
            }
            ClientEvent::Failed { op, error } => {
                if matches!(op, ClientOp::Create | ClientOp::Update) {
                    self.form_in_flight = false;
                }
                self.report_failure(op, &error);
            }
        }
    }
}
