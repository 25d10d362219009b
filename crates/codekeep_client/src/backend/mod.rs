//! Backend worker wiring for the client.
//!
//! This module exposes the command/event protocol plus the worker spawn helper
//! used by [`crate::app::ClientApp`].

mod protocol;
mod worker;

pub use protocol::{ClientCmd, ClientEvent, ClientOp};
pub use worker::{spawn_backend, BackendHandle};
