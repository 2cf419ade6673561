//! Error types for the BLEComm protocol.
//!
//! Every protocol-level error here is recoverable and connection-local: the
//! session logs it, drops the offending input, and the connection lives on.

use thiserror::Error;

/// Errors from decoding a raw transport write into a frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Buffer is smaller than the minimum frame (command byte + trailer).
    #[error("frame too short: {len} bytes")]
    TooShort {
        /// Number of bytes received.
        len: usize,
    },

    /// Last two bytes are not the trailer sentinel pair.
    #[error("bad frame trailer")]
    BadTrailer,
}

/// Errors from the chunk reassembly buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReassemblyError {
    /// A MIDDLE or END chunk arrived with no START in flight.
    #[error("no active reassembly")]
    NoActiveReassembly,
}

/// Errors from validating a session configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_chunk_size` must be at least one byte.
    #[error("max_chunk_size must be greater than zero")]
    ZeroChunkSize,

    /// `probe_interval` must be non-zero or the probe loop would spin.
    #[error("probe_interval must be greater than zero")]
    ZeroProbeInterval,
}
