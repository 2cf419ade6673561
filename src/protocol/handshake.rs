//! Handshake synchronization state machine.
//!
//! After the link comes up, neither endpoint knows whether the peer's
//! protocol stack is listening yet. The Initiator sends `PING_PROBE` every
//! probe interval until a `PING_ACK` arrives; the Responder is purely
//! reactive and acks every probe. Once synced, a connection never reverts;
//! the state is discarded wholesale on disconnect and rebuilt on reconnect.
//!
//! There is deliberately no retry bound or handshake timeout: a peer that
//! never acks simply never produces the established transition, and probing
//! continues for the life of the connection.

use super::frame::Command;

/// Which side of the handshake this endpoint plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Actively probes until acknowledged (central/client side, or any
    /// endpoint that must drive re-synchronization).
    Initiator,
    /// Reacts to probes with acks; runs no timer of its own.
    Responder,
}

/// Control frames to send and state transition from one inbound frame.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HandshakeReply {
    /// Control frames to transmit, in order, each with an empty payload.
    pub send: Vec<Command>,
    /// True exactly when this frame moved the endpoint to synced.
    pub established: bool,
}

/// Per-connection handshake state.
#[derive(Debug)]
pub struct Handshake {
    role: Role,
    synced: bool,
}

impl Handshake {
    /// Create fresh, unsynced handshake state for a new connection.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            synced: false,
        }
    }

    /// This endpoint's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the handshake has completed.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Whether a probe should be sent on the next timer tick.
    ///
    /// True only for an unsynced Initiator; once synced the timer chain
    /// naturally stops.
    pub fn wants_probe(&self) -> bool {
        self.role == Role::Initiator && !self.synced
    }

    /// Handle an inbound `PING_PROBE`.
    pub fn on_ping_probe(&mut self) -> HandshakeReply {
        match self.role {
            Role::Responder => {
                let established = !self.synced;
                self.synced = true;
                HandshakeReply {
                    send: vec![Command::PingAck],
                    established,
                }
            }
            // A probing peer hasn't seen our ack yet: ack it, then probe
            // right back so both sides keep the loop alive until each has
            // observed an ack.
            Role::Initiator => HandshakeReply {
                send: vec![Command::PingAck, Command::PingProbe],
                established: false,
            },
        }
    }

    /// Handle an inbound `PING_ACK`.
    pub fn on_ping_ack(&mut self) -> HandshakeReply {
        match self.role {
            Role::Initiator => {
                let established = !self.synced;
                self.synced = true;
                HandshakeReply {
                    send: Vec::new(),
                    established,
                }
            }
            // Rarely seen in this role; harmless no-op.
            Role::Responder => HandshakeReply::default(),
        }
    }
}
