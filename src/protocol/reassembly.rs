//! Chunked message reassembly.
//!
//! Accumulates START/MIDDLE/END chunk payloads back into one logical message.
//! The protocol never interleaves two messages' chunks on one connection, so
//! a single optional buffer is the whole state.

use crate::core::error::ReassemblyError;

/// Receive-side buffer for one in-flight chunked message.
#[derive(Debug, Default)]
pub struct ReassemblyBuffer {
    buffer: Option<Vec<u8>>,
}

impl ReassemblyBuffer {
    /// Create an empty reassembly buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a reassembly is currently in flight.
    pub fn is_active(&self) -> bool {
        self.buffer.is_some()
    }

    /// Begin a new reassembly with the START chunk's payload.
    ///
    /// A START arriving over an unfinished reassembly abandons the old
    /// partial message; returns `true` when that happened so the caller can
    /// log it. The application never sees the dropped partial.
    pub fn on_start(&mut self, payload: &[u8]) -> bool {
        let discarded = self.buffer.is_some();
        self.buffer = Some(payload.to_vec());
        discarded
    }

    /// Append a MIDDLE chunk's payload.
    pub fn on_middle(&mut self, payload: &[u8]) -> Result<(), ReassemblyError> {
        match self.buffer.as_mut() {
            Some(buffer) => {
                buffer.extend_from_slice(payload);
                Ok(())
            }
            None => Err(ReassemblyError::NoActiveReassembly),
        }
    }

    /// Append the END chunk's payload and return the complete message.
    ///
    /// The buffer is cleared; the next chunk sequence starts fresh.
    pub fn on_end(&mut self, payload: &[u8]) -> Result<Vec<u8>, ReassemblyError> {
        match self.buffer.take() {
            Some(mut buffer) => {
                buffer.extend_from_slice(payload);
                Ok(buffer)
            }
            None => Err(ReassemblyError::NoActiveReassembly),
        }
    }

    /// Discard any in-flight reassembly (connection teardown).
    pub fn reset(&mut self) {
        self.buffer = None;
    }
}
