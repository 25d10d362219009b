//! Background worker thread for service calls.

use super::{ClientCmd, ClientEvent, ClientOp};
use crate::api::{ApiError, SnippetApi};
use codekeep_core::models::snippet::Snippet;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::thread;
use tracing::{debug, warn};

/// Handle for sending commands to, and receiving events from, the backend worker.
pub struct BackendHandle {
    pub cmd_tx: Sender<ClientCmd>,
    pub evt_rx: Receiver<ClientEvent>,
}

fn reply<F>(evt_tx: &Sender<ClientEvent>, op: ClientOp, result: Result<Snippet, ApiError>, ok: F)
where
    F: FnOnce(Snippet) -> ClientEvent,
{
    let event = match result {
        Ok(snippet) => ok(snippet),
        Err(error) => {
            warn!("{} failed: {}", op, error);
            ClientEvent::Failed { op, error }
        }
    };
    let _ = evt_tx.send(event);
}

fn handle_command<A: SnippetApi>(api: &A, evt_tx: &Sender<ClientEvent>, cmd: ClientCmd) {
    match cmd {
        ClientCmd::List { request_id, search } => {
            let event = match api.list(search.as_deref()) {
                Ok(items) => {
                    debug!("list #{} returned {} snippet(s)", request_id, items.len());
                    ClientEvent::Listed { request_id, items }
                }
                Err(error) => {
                    warn!("list #{} failed: {}", request_id, error);
                    ClientEvent::ListFailed { request_id, error }
                }
            };
            let _ = evt_tx.send(event);
        }
        ClientCmd::Get { id } => reply(evt_tx, ClientOp::Load, api.get(&id), |snippet| {
            ClientEvent::Loaded { snippet }
        }),
        ClientCmd::Create { request } => {
            reply(evt_tx, ClientOp::Create, api.create(&request), |snippet| {
                ClientEvent::Created { snippet }
            })
        }
        ClientCmd::Update { id, request } => reply(
            evt_tx,
            ClientOp::Update,
            api.update(&id, &request),
            |snippet| ClientEvent::Updated { snippet },
        ),
        ClientCmd::ToggleFavorite { id } => reply(
            evt_tx,
            ClientOp::ToggleFavorite,
            api.toggle_favorite(&id),
            |snippet| ClientEvent::FavoriteToggled { snippet },
        ),
        ClientCmd::Delete { id } => {
            let event = match api.delete(&id) {
                Ok(()) => ClientEvent::Deleted { id },
                Err(error) => {
                    warn!("delete {} failed: {}", id, error);
                    ClientEvent::Failed {
                        op: ClientOp::Delete,
                        error,
                    }
                }
            };
            let _ = evt_tx.send(event);
        }
    }
}

/// Spawn the worker thread that performs blocking service calls.
///
/// Commands run one at a time in submission order; the worker exits when the
/// command sender is dropped.
///
/// # Errors
/// Returns an error if the worker thread cannot be spawned.
pub fn spawn_backend<A>(api: A) -> std::io::Result<BackendHandle>
where
    A: SnippetApi + Send + 'static,
{
    let (cmd_tx, cmd_rx) = unbounded();
    let (evt_tx, evt_rx) = unbounded();

    thread::Builder::new()
        .name("codekeep-client-backend".to_string())
        .spawn(move || {
            for cmd in cmd_rx.iter() {
                handle_command(&api, &evt_tx, cmd);
            }
            debug!("client backend stopped");
        })?;

    Ok(BackendHandle { cmd_tx, evt_rx })
}
