//! Run the API on a background thread inside another process.
//!
//! Used by the end-to-end tests and by tools that want a private server
//! without spawning the `codekeep` binary.

use crate::{resolve_bind_address, serve_router, AppError, AppState};
use std::{
    net::SocketAddr,
    sync::mpsc,
    thread::{self, JoinHandle},
};
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Handle to an embedded API server; dropping it shuts the server down.
pub struct EmbeddedServer {
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
    addr: SocketAddr,
    used_fallback: bool,
}

type BindOutcome = Result<(tokio::net::TcpListener, bool), String>;

async fn bind_listener(bind_addr: SocketAddr) -> BindOutcome {
    match tokio::net::TcpListener::bind(bind_addr).await {
        Ok(listener) => Ok((listener, false)),
        Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
            warn!(
                "API bind address {} is in use; falling back to an auto port",
                bind_addr
            );
            tokio::net::TcpListener::bind(SocketAddr::new(bind_addr.ip(), 0))
                .await
                .map(|listener| (listener, true))
                .map_err(|err| format!("failed to bind server socket: {}", err))
        }
        Err(err) => Err(format!("failed to bind server socket: {}", err)),
    }
}

impl EmbeddedServer {
    /// Start the API server on a background thread.
    ///
    /// The server binds to `BIND` or `127.0.0.1:PORT` from the state's config.
    /// Port `0` picks a free port; an in-use port falls back to an auto port.
    ///
    /// # Errors
    /// Returns [`AppError::Storage`] if the runtime, thread, or socket cannot be
    /// created.
    pub fn start(state: AppState, allow_public: bool) -> Result<Self, AppError> {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(SocketAddr, bool), String>>();

        let thread = thread::Builder::new()
            .name("codekeep-embedded-server".into())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(err) => {
                        let _ = ready_tx.send(Err(format!("failed to start runtime: {}", err)));
                        return;
                    }
                };

                let bind_addr = resolve_bind_address(&state.config, allow_public);
                let (listener, used_fallback) = match rt.block_on(bind_listener(bind_addr)) {
                    Ok(bound) => bound,
                    Err(message) => {
                        let _ = ready_tx.send(Err(message));
                        return;
                    }
                };

                let actual_addr = listener.local_addr().unwrap_or(bind_addr);
                info!("API listening on http://{}", actual_addr);
                let _ = ready_tx.send(Ok((actual_addr, used_fallback)));

                let shutdown = async {
                    let _ = shutdown_rx.await;
                };
                if let Err(err) = rt.block_on(serve_router(listener, state, allow_public, shutdown))
                {
                    warn!("server error: {}", err);
                }
            })
            .map_err(|err| AppError::Storage(format!("failed to spawn server: {}", err)))?;

        match ready_rx.recv() {
            Ok(Ok((addr, used_fallback))) => Ok(Self {
                shutdown: Some(shutdown_tx),
                thread: Some(thread),
                addr,
                used_fallback,
            }),
            Ok(Err(message)) => {
                let _ = thread.join();
                Err(AppError::Storage(message))
            }
            Err(_) => {
                let _ = thread.join();
                Err(AppError::Storage(
                    "embedded server exited before reporting readiness".to_string(),
                ))
            }
        }
    }

    /// Address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL for HTTP clients, e.g. `http://127.0.0.1:40123`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Whether the requested port was busy and an auto-assigned one was used.
    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }
}

impl Drop for EmbeddedServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}
