//! The session actor: one task owning all protocol state for a connection.
//!
//! Three external events mutate protocol state (transport data arriving, a
//! timer firing, the application requesting a send) and all three are
//! funneled through one mpsc channel into a single task, processed in
//! arrival order. Nothing blocks: timers are the only suspension, and each
//! wakeup does bounded work (one frame emission, one probe) and returns to
//! the select loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::core::constants::{
    DEFAULT_MAX_CHUNK_SIZE, DEFAULT_PACING_DELAY, DEFAULT_PROBE_INTERVAL,
};
use crate::core::error::ConfigError;
use crate::core::traits::Transport;
use crate::protocol::{
    decode, encode, Command, DelayedSender, Handshake, HandshakeReply, ReassemblyBuffer, Role,
    SenderPoll,
};

use super::event::SessionEvent;

/// Per-session configuration, fixed at spawn time.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Which side of the handshake this endpoint plays.
    pub role: Role,

    /// Maximum application payload bytes per frame. Feed the transport's
    /// negotiated write size in here.
    pub max_chunk_size: usize,

    /// Minimum delay between consecutive outbound frames.
    pub pacing_delay: Duration,

    /// Interval between unanswered handshake probes (Initiator only).
    pub probe_interval: Duration,
}

impl SessionConfig {
    /// Create a configuration with protocol defaults for the given role.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            pacing_delay: DEFAULT_PACING_DELAY,
            probe_interval: DEFAULT_PROBE_INTERVAL,
        }
    }

    /// Default configuration for the probing side.
    pub fn initiator() -> Self {
        Self::new(Role::Initiator)
    }

    /// Default configuration for the reactive side.
    pub fn responder() -> Self {
        Self::new(Role::Responder)
    }

    /// Validate the configuration surface.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.probe_interval.is_zero() {
            return Err(ConfigError::ZeroProbeInterval);
        }
        Ok(())
    }
}

/// Errors from the session handle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session actor has shut down.
    #[error("session closed")]
    Closed,
}

/// Commands posted to the session actor.
#[derive(Debug)]
enum SessionCommand {
    Send(Vec<u8>),
    TransportData(Vec<u8>),
    Connected,
    Disconnected,
    Shutdown,
}

/// Handle to a running session.
///
/// Cloneable; the transport's callbacks and the application can each hold
/// one. The actor runs until [`Session::shutdown`] is called or every handle
/// is dropped.
#[derive(Debug, Clone)]
pub struct Session {
    commands: mpsc::UnboundedSender<SessionCommand>,
}

/// Receiver for [`SessionEvent`]s emitted by a session.
#[derive(Debug)]
pub struct SessionEvents {
    rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl SessionEvents {
    /// Receive the next session event.
    ///
    /// Returns `None` once the session actor has shut down.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }
}

impl Session {
    /// Validate the configuration and spawn the session actor.
    ///
    /// Returns the session handle and the event stream the application
    /// subscribes to.
    pub fn spawn<T: Transport>(
        config: SessionConfig,
        transport: Arc<T>,
    ) -> Result<(Self, SessionEvents), ConfigError> {
        config.validate()?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let actor = SessionActor {
            role: config.role,
            probe_interval: config.probe_interval,
            transport,
            handshake: Handshake::new(config.role),
            reassembly: ReassemblyBuffer::new(),
            sender: DelayedSender::new(config.max_chunk_size, config.pacing_delay),
            events: event_tx,
            next_probe_at: None,
            link_up: false,
        };
        tokio::spawn(actor.run(command_rx));

        Ok((
            Self {
                commands: command_tx,
            },
            SessionEvents { rx: event_rx },
        ))
    }

    /// Queue an application message for sending.
    ///
    /// Non-blocking: the payload enters the pacing queue and goes out as one
    /// `DATA` frame, or a chunk sequence if it exceeds `max_chunk_size`.
    /// Single-frame messages ride the same queue, so a send can never cut
    /// into the middle of another message's chunk train.
    pub fn send(&self, payload: Vec<u8>) -> Result<(), SessionError> {
        self.commands
            .send(SessionCommand::Send(payload))
            .map_err(|_| SessionError::Closed)
    }

    /// Transport callback: one inbound write's bytes (exactly one frame).
    pub fn on_data(&self, bytes: &[u8]) {
        let _ = self
            .commands
            .send(SessionCommand::TransportData(bytes.to_vec()));
    }

    /// Transport callback: the link came up.
    pub fn on_connected(&self) {
        let _ = self.commands.send(SessionCommand::Connected);
    }

    /// Transport callback: the link went down.
    pub fn on_disconnected(&self) {
        let _ = self.commands.send(SessionCommand::Disconnected);
    }

    /// Stop the session actor.
    pub fn shutdown(&self) {
        let _ = self.commands.send(SessionCommand::Shutdown);
    }
}

/// The actor owning all per-connection protocol state.
struct SessionActor<T: Transport> {
    role: Role,
    probe_interval: Duration,
    transport: Arc<T>,
    handshake: Handshake,
    reassembly: ReassemblyBuffer,
    sender: DelayedSender,
    events: mpsc::UnboundedSender<SessionEvent>,
    /// Next probe deadline; `None` while no probe timer runs.
    next_probe_at: Option<Instant>,
    link_up: bool,
}

impl<T: Transport> SessionActor<T> {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<SessionCommand>) {
        loop {
            // Outbound frames only flow while the link is up; before that
            // the queue just accumulates.
            let pacing_wait = if self.link_up {
                self.sender.time_until_ready()
            } else {
                None
            };
            let probe_wait = self
                .next_probe_at
                .map(|at| at.saturating_duration_since(Instant::now()));

            tokio::select! {
                command = commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                () = sleep(pacing_wait.unwrap_or(Duration::ZERO)), if pacing_wait.is_some() => {
                    self.drain_one_frame();
                }
                () = sleep(probe_wait.unwrap_or(Duration::ZERO)), if probe_wait.is_some() => {
                    self.probe_tick();
                }
            }
        }
    }

    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Send(payload) => {
                if !self.handshake.is_synced() {
                    tracing::debug!(len = payload.len(), "queueing message before handshake sync");
                }
                self.sender.enqueue(payload);
            }
            SessionCommand::TransportData(bytes) => self.handle_transport_data(&bytes),
            SessionCommand::Connected => self.handle_connected(),
            SessionCommand::Disconnected => self.handle_disconnected(),
            // Intercepted by the run loop.
            SessionCommand::Shutdown => {}
        }
    }

    fn handle_transport_data(&mut self, bytes: &[u8]) {
        let frame = match decode(bytes) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!(len = bytes.len(), "dropping malformed frame: {err}");
                return;
            }
        };
        let Some(command) = frame.parse_command() else {
            tracing::warn!(command = frame.command, "dropping frame with unknown command {:#04x}", frame.command);
            return;
        };

        match command {
            Command::PingProbe => {
                let reply = self.handshake.on_ping_probe();
                self.apply_handshake_reply(reply);
            }
            Command::PingAck => {
                let reply = self.handshake.on_ping_ack();
                self.apply_handshake_reply(reply);
            }
            Command::Data => self.deliver(frame.payload),
            Command::ChunkStart => {
                if self.reassembly.on_start(&frame.payload) {
                    tracing::debug!("chunk start discarded an incomplete reassembly");
                }
            }
            Command::ChunkMiddle => {
                if let Err(err) = self.reassembly.on_middle(&frame.payload) {
                    tracing::warn!("dropping chunk: {err}");
                }
            }
            Command::ChunkEnd => match self.reassembly.on_end(&frame.payload) {
                Ok(message) => self.deliver(message),
                Err(err) => tracing::warn!("dropping chunk: {err}"),
            },
        }
    }

    /// Write handshake replies and surface the established transition.
    ///
    /// Control frames are tiny and latency-sensitive; they bypass the pacing
    /// queue and go straight to the transport.
    fn apply_handshake_reply(&mut self, reply: HandshakeReply) {
        for command in reply.send {
            self.transport.write(&encode(command, &[]));
        }
        if reply.established {
            self.next_probe_at = None;
            self.emit(SessionEvent::Established);
        }
    }

    fn handle_connected(&mut self) {
        self.link_up = true;
        self.handshake = Handshake::new(self.role);
        self.reassembly.reset();
        // First probe goes out one interval after link-up, not immediately.
        if self.handshake.wants_probe() {
            self.next_probe_at = Some(Instant::now() + self.probe_interval);
        }
        self.emit(SessionEvent::Connected);
    }

    fn handle_disconnected(&mut self) {
        self.link_up = false;
        self.sender.clear();
        self.reassembly.reset();
        self.handshake = Handshake::new(self.role);
        self.next_probe_at = None;
        self.emit(SessionEvent::Disconnected);
    }

    fn drain_one_frame(&mut self) {
        if let SenderPoll::Emit(frame) = self.sender.poll() {
            self.transport.write(&frame);
        }
    }

    fn probe_tick(&mut self) {
        if self.handshake.wants_probe() {
            if self.transport.is_connected() {
                tracing::trace!("handshake not synced, probing");
                self.transport.write(&encode(Command::PingProbe, &[]));
            }
            self.next_probe_at = Some(Instant::now() + self.probe_interval);
        } else {
            self.next_probe_at = None;
        }
    }

    fn deliver(&mut self, message: Vec<u8>) {
        self.emit(SessionEvent::MessageReceived(message));
    }

    fn emit(&mut self, event: SessionEvent) {
        // The application may have dropped its receiver; that only mutes
        // notifications, it does not stop the protocol.
        let _ = self.events.send(event);
    }
}
