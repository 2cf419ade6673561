//! BLEComm Protocol - Protocol State Machines
//!
//! Pure, sans-IO building blocks composed by the session facade:
//!
//! - **Frame codec**: [`encode`]/[`decode`] between `(command, payload)` and
//!   the wire form `[command] ++ payload ++ [trailer]`
//! - **Reassembly**: [`ReassemblyBuffer`] rebuilding chunked messages
//! - **Handshake**: [`Handshake`] probe/ack sync machine, [`Role`]-selected
//! - **Pacing**: [`DelayedSender`] slicing and throttling outbound messages
//!
//! Nothing in this module performs IO, spawns tasks, reads clocks, or logs.
//! Time-dependent components take explicit [`std::time::Instant`] arguments
//! so their behavior is deterministic under test.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          Application                    │
//! ├─────────────────────────────────────────┤
//! │          Session Facade                 │
//! ├─────────────────────────────────────────┤
//! │          Protocol Layer                 │  ← This module
//! │   codec, reassembly, handshake, pacing  │
//! ├─────────────────────────────────────────┤
//! │          Transport collaborator         │
//! │   (BLE link, write boundaries, order)   │
//! └─────────────────────────────────────────┘
//! ```

mod frame;
mod handshake;
mod pacing;
mod reassembly;

pub use frame::{decode, encode, Command, Frame};
pub use handshake::{Handshake, HandshakeReply, Role};
pub use pacing::{DelayedSender, SenderPoll};
pub use reassembly::ReassemblyBuffer;
