//! # BLEComm Protocol
//!
//! BLEComm turns a transport that can only do small, fire-and-forget writes
//! (a BLE characteristic notify/write pair, or anything shaped like one) into
//! reliable, in-order delivery of arbitrarily large application messages.
//!
//! It provides:
//!
//! - **Framing**: one command byte, raw payload, fixed two-byte trailer
//! - **Chunking**: oversized messages sliced into START/MIDDLE/END frames and
//!   reassembled on the far side
//! - **Handshake**: probe/ack exchange until both endpoints are in sync
//! - **Pacing**: outbound frames spaced out so the link buffer is never overrun
//!
//! Discovery, advertising, connection establishment and MTU negotiation stay
//! with the transport collaborator; this crate only speaks the byte protocol
//! on an already-connected link.
//!
//! ## Feature Flags
//!
//! - `session` (default): tokio-backed [`session::Session`] actor composing
//!   the protocol state machines behind a send/receive API
//!
//! ## Modules
//!
//! - [`core`]: Constants, error types, and the [`core::Transport`] trait
//! - [`protocol`]: Pure, sans-IO protocol state machines (always included)
//! - [`session`]: Session facade (requires `session` feature)
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use blecomm_protocol::prelude::*;
//!
//! let config = SessionConfig::initiator();
//! let (session, mut events) = Session::spawn(config, Arc::new(my_transport))?;
//!
//! // Feed link lifecycle and inbound bytes from the transport:
//! session.on_connected();
//! // session.on_data(&raw_write) for every inbound write boundary
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         SessionEvent::Established => session.send(b"hello".to_vec())?,
//!         SessionEvent::MessageReceived(msg) => println!("got {} bytes", msg.len()),
//!         _ => {}
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core module (always included)
pub mod core;

// Pure protocol state machines (always included)
pub mod protocol;

// Session facade (feature-gated)
#[cfg(feature = "session")]
#[cfg_attr(docsrs, doc(cfg(feature = "session")))]
pub mod session;

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types and the transport seam
    pub use crate::core::{ConfigError, FrameError, ReassemblyError, Transport};

    // Protocol state machines
    pub use crate::protocol::{
        Command, DelayedSender, Frame, Handshake, HandshakeReply, ReassemblyBuffer, Role,
        SenderPoll,
    };

    // Session facade (when enabled)
    #[cfg(feature = "session")]
    pub use crate::session::{Session, SessionConfig, SessionError, SessionEvent, SessionEvents};
}

// Re-export commonly used items at crate root
pub use self::core::{FrameError, Transport};
pub use protocol::{Command, Frame, Role};

#[cfg(feature = "session")]
pub use session::{Session, SessionConfig, SessionEvent};
