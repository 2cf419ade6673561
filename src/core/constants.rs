//! Protocol constants.
//!
//! The command and trailer byte values are fixed by the deployed wire
//! protocol and MUST NOT be changed.

use std::time::Duration;

// =============================================================================
// COMMAND BYTES
// =============================================================================

/// Handshake probe ("are you there?").
pub const CMD_PING_PROBE: u8 = 0xCC;

/// Handshake acknowledgement.
pub const CMD_PING_ACK: u8 = 0xDD;

/// Single-frame application message.
pub const CMD_DATA: u8 = 0xEE;

/// First slice of a chunked message.
pub const CMD_CHUNK_START: u8 = 0xEB;

/// Intermediate slice of a chunked message.
pub const CMD_CHUNK_MIDDLE: u8 = 0xEC;

/// Final slice of a chunked message.
pub const CMD_CHUNK_END: u8 = 0xED;

// =============================================================================
// TRAILER
// =============================================================================

/// First trailer sentinel byte.
pub const TRAILER_FIRST: u8 = 0xFE;

/// Second trailer sentinel byte.
pub const TRAILER_SECOND: u8 = 0xFF;

/// The end-of-frame trailer appended to every frame.
pub const TRAILER: [u8; 2] = [TRAILER_FIRST, TRAILER_SECOND];

// =============================================================================
// FRAME SIZES
// =============================================================================

/// Bytes added to a payload by framing (command byte + trailer).
pub const FRAME_OVERHEAD: usize = 3;

/// Smallest valid wire frame (command byte + empty payload + trailer).
pub const MIN_FRAME_SIZE: usize = 3;

// =============================================================================
// CONFIGURATION DEFAULTS
// =============================================================================

/// Default maximum application payload bytes per frame.
///
/// Conservative for 23-byte-ATT-MTU links that negotiate upward; the
/// transport's negotiated write size should override this.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 100;

/// Default minimum delay between consecutive outbound frames.
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(50);

/// Default interval between unanswered handshake probes.
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_millis(1000);
