//! Frame encoding and decoding.
//!
//! Wire form of every frame: `[command] ++ payload ++ [0xFE, 0xFF]`. There is
//! no length field: the transport delivers exactly one write's bytes per
//! inbound callback, so the frame boundary is the write boundary. Payload
//! bytes are not escaped: a payload that happens to contain the trailer pair
//! goes out as-is, and stays parseable only because the write boundary, not
//! the trailer, delimits the frame. Wire compatibility with deployed peers
//! forbids adding escaping or a length prefix here.

use crate::core::constants::{
    CMD_CHUNK_END, CMD_CHUNK_MIDDLE, CMD_CHUNK_START, CMD_DATA, CMD_PING_ACK, CMD_PING_PROBE,
    MIN_FRAME_SIZE, TRAILER,
};
use crate::core::error::FrameError;

/// The one-byte command tag leading every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Handshake probe.
    PingProbe,
    /// Handshake acknowledgement.
    PingAck,
    /// Complete application message in a single frame.
    Data,
    /// First slice of a chunked message.
    ChunkStart,
    /// Intermediate slice of a chunked message.
    ChunkMiddle,
    /// Final slice of a chunked message.
    ChunkEnd,
}

impl Command {
    /// Wire byte value of this command.
    pub const fn to_byte(self) -> u8 {
        match self {
            Command::PingProbe => CMD_PING_PROBE,
            Command::PingAck => CMD_PING_ACK,
            Command::Data => CMD_DATA,
            Command::ChunkStart => CMD_CHUNK_START,
            Command::ChunkMiddle => CMD_CHUNK_MIDDLE,
            Command::ChunkEnd => CMD_CHUNK_END,
        }
    }

    /// Parse a wire byte into a known command.
    ///
    /// Returns `None` for unrecognized values; the caller decides the drop
    /// policy, not the codec.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_PING_PROBE => Some(Command::PingProbe),
            CMD_PING_ACK => Some(Command::PingAck),
            CMD_DATA => Some(Command::Data),
            CMD_CHUNK_START => Some(Command::ChunkStart),
            CMD_CHUNK_MIDDLE => Some(Command::ChunkMiddle),
            CMD_CHUNK_END => Some(Command::ChunkEnd),
            _ => None,
        }
    }
}

/// A decoded frame.
///
/// The command is kept as the raw wire byte so that frames with unknown
/// commands still decode; [`Frame::parse_command`] resolves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw command byte from the wire.
    pub command: u8,
    /// Payload bytes between the command byte and the trailer.
    pub payload: Vec<u8>,
}

impl Frame {
    /// Resolve the raw command byte into a known [`Command`].
    pub const fn parse_command(&self) -> Option<Command> {
        Command::from_byte(self.command)
    }
}

/// Encode a command and payload into its wire form.
pub fn encode(command: Command, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(payload.len() + TRAILER.len() + 1);
    buf.push(command.to_byte());
    buf.extend_from_slice(payload);
    buf.extend_from_slice(&TRAILER);
    buf
}

/// Decode one transport write into a frame.
///
/// Validates only the structural invariants (minimum size, trailer
/// sentinels). Unknown command bytes pass through.
pub fn decode(bytes: &[u8]) -> Result<Frame, FrameError> {
    if bytes.len() < MIN_FRAME_SIZE {
        return Err(FrameError::TooShort { len: bytes.len() });
    }
    if bytes[bytes.len() - 2..] != TRAILER {
        return Err(FrameError::BadTrailer);
    }
    Ok(Frame {
        command: bytes[0],
        payload: bytes[1..bytes.len() - 2].to_vec(),
    })
}
