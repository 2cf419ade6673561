//! BLEComm Protocol - Session Facade
//!
//! Composes the protocol state machines behind a single send/receive API,
//! backed by a [`crate::core::Transport`] collaborator. All protocol state
//! lives inside one actor task; the [`Session`] handle and the transport's
//! callbacks just post commands to it, so there is never parallel mutation
//! of handshake, reassembly, or send-queue state.

mod event;
#[allow(clippy::module_inception)]
mod session;

pub use event::SessionEvent;
pub use session::{Session, SessionConfig, SessionError, SessionEvents};
