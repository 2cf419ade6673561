//! End-to-end tests: two live sessions wired back-to-back over an in-memory
//! transport that honors the collaborator contract (one write boundary per
//! `on_data` call, in-order delivery).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use blecomm_protocol::core::Transport;
use blecomm_protocol::protocol::{encode, Command};
use blecomm_protocol::session::{Session, SessionConfig, SessionEvent, SessionEvents};

const EVENT_TIMEOUT: Duration = Duration::from_secs(2);
const QUIET_PERIOD: Duration = Duration::from_millis(100);

/// One direction of an in-memory link.
struct PipeTransport {
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    connected: AtomicBool,
}

impl PipeTransport {
    fn new(outbound: mpsc::UnboundedSender<Vec<u8>>) -> Self {
        Self {
            outbound,
            connected: AtomicBool::new(false),
        }
    }

    fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

impl Transport for PipeTransport {
    fn write(&self, frame: &[u8]) {
        // A dead link swallows writes, as BLE does.
        if self.is_connected() {
            let _ = self.outbound.send(frame.to_vec());
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

struct Endpoint {
    session: Session,
    events: SessionEvents,
    transport: Arc<PipeTransport>,
}

/// Build an initiator/responder pair with both directions pumped by tasks.
fn linked_pair(initiator_config: SessionConfig, responder_config: SessionConfig) -> (Endpoint, Endpoint) {
    let (to_responder_tx, to_responder_rx) = mpsc::unbounded_channel();
    let (to_initiator_tx, to_initiator_rx) = mpsc::unbounded_channel();

    let initiator_transport = Arc::new(PipeTransport::new(to_responder_tx));
    let responder_transport = Arc::new(PipeTransport::new(to_initiator_tx));

    let (initiator, initiator_events) =
        Session::spawn(initiator_config, initiator_transport.clone()).unwrap();
    let (responder, responder_events) =
        Session::spawn(responder_config, responder_transport.clone()).unwrap();

    pump(to_responder_rx, responder.clone());
    pump(to_initiator_rx, initiator.clone());

    (
        Endpoint {
            session: initiator,
            events: initiator_events,
            transport: initiator_transport,
        },
        Endpoint {
            session: responder,
            events: responder_events,
            transport: responder_transport,
        },
    )
}

/// Deliver each written frame to the peer as one `on_data` boundary.
fn pump(mut rx: mpsc::UnboundedReceiver<Vec<u8>>, peer: Session) {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            peer.on_data(&frame);
        }
    });
}

fn fast_config(role_config: SessionConfig) -> SessionConfig {
    let mut config = role_config;
    config.pacing_delay = Duration::from_millis(1);
    config.probe_interval = Duration::from_millis(10);
    config
}

async fn expect_event(events: &mut SessionEvents, expected: SessionEvent) {
    let event = timeout(EVENT_TIMEOUT, events.recv())
        .await
        .expect("timed out waiting for session event")
        .expect("session actor stopped");
    assert_eq!(event, expected);
}

async fn expect_quiet(events: &mut SessionEvents) {
    assert!(
        timeout(QUIET_PERIOD, events.recv()).await.is_err(),
        "expected no further session events"
    );
}

/// Bring the link up on both endpoints and drive the handshake to synced.
async fn establish(initiator: &mut Endpoint, responder: &mut Endpoint) {
    initiator.transport.set_connected(true);
    responder.transport.set_connected(true);
    initiator.session.on_connected();
    responder.session.on_connected();

    expect_event(&mut initiator.events, SessionEvent::Connected).await;
    expect_event(&mut responder.events, SessionEvent::Connected).await;
    expect_event(&mut responder.events, SessionEvent::Established).await;
    expect_event(&mut initiator.events, SessionEvent::Established).await;
}

#[tokio::test]
async fn handshake_converges_and_establishes_once() {
    let (mut initiator, mut responder) =
        linked_pair(fast_config(SessionConfig::initiator()), fast_config(SessionConfig::responder()));

    establish(&mut initiator, &mut responder).await;

    // Several probe intervals of silence: no duplicate Established.
    expect_quiet(&mut initiator.events).await;
    expect_quiet(&mut responder.events).await;
}

#[tokio::test]
async fn single_frame_message_roundtrip() {
    let (mut initiator, mut responder) =
        linked_pair(fast_config(SessionConfig::initiator()), fast_config(SessionConfig::responder()));
    establish(&mut initiator, &mut responder).await;

    initiator.session.send(b"hello".to_vec()).unwrap();
    expect_event(
        &mut responder.events,
        SessionEvent::MessageReceived(b"hello".to_vec()),
    )
    .await;

    // And the other direction.
    responder.session.send(b"world".to_vec()).unwrap();
    expect_event(
        &mut initiator.events,
        SessionEvent::MessageReceived(b"world".to_vec()),
    )
    .await;
}

#[tokio::test]
async fn chunked_message_reassembles() {
    let (mut initiator, mut responder) =
        linked_pair(fast_config(SessionConfig::initiator()), fast_config(SessionConfig::responder()));
    establish(&mut initiator, &mut responder).await;

    // 250 bytes over 100-byte chunks: START + MIDDLE + END on the wire.
    let payload: Vec<u8> = (0..250u32).map(|i| i as u8).collect();
    initiator.session.send(payload.clone()).unwrap();

    expect_event(
        &mut responder.events,
        SessionEvent::MessageReceived(payload),
    )
    .await;
}

#[tokio::test]
async fn queued_messages_arrive_in_order() {
    let (mut initiator, mut responder) =
        linked_pair(fast_config(SessionConfig::initiator()), fast_config(SessionConfig::responder()));
    establish(&mut initiator, &mut responder).await;

    let first = vec![b'a'; 250];
    let second = vec![b'b'; 10];
    let third = vec![b'c'; 150];
    initiator.session.send(first.clone()).unwrap();
    initiator.session.send(second.clone()).unwrap();
    initiator.session.send(third.clone()).unwrap();

    expect_event(&mut responder.events, SessionEvent::MessageReceived(first)).await;
    expect_event(&mut responder.events, SessionEvent::MessageReceived(second)).await;
    expect_event(&mut responder.events, SessionEvent::MessageReceived(third)).await;
}

#[tokio::test]
async fn malformed_frames_are_dropped_without_delivery() {
    let (mut initiator, mut responder) =
        linked_pair(fast_config(SessionConfig::initiator()), fast_config(SessionConfig::responder()));
    establish(&mut initiator, &mut responder).await;

    // DATA command byte but no trailer.
    responder.session.on_data(&[0xEE, 0x01, 0x02]);
    // Too short to be a frame at all.
    responder.session.on_data(&[0xFF]);
    // Unknown command with a valid trailer.
    responder.session.on_data(&[0x42, 0xAB, 0xFE, 0xFF]);

    expect_quiet(&mut responder.events).await;

    // The connection survives: a valid frame still gets through.
    initiator.session.send(b"still alive".to_vec()).unwrap();
    expect_event(
        &mut responder.events,
        SessionEvent::MessageReceived(b"still alive".to_vec()),
    )
    .await;
}

#[tokio::test]
async fn stray_middle_chunk_is_ignored() {
    let (mut initiator, mut responder) =
        linked_pair(fast_config(SessionConfig::initiator()), fast_config(SessionConfig::responder()));
    establish(&mut initiator, &mut responder).await;

    // MIDDLE with no preceding START: dropped, no crash, no delivery.
    responder.session.on_data(&encode(Command::ChunkMiddle, b"orphan"));
    responder.session.on_data(&encode(Command::ChunkEnd, b"orphan"));
    expect_quiet(&mut responder.events).await;

    // A well-formed chunk sequence afterwards is unaffected.
    let payload = vec![0x5A; 150];
    initiator.session.send(payload.clone()).unwrap();
    expect_event(
        &mut responder.events,
        SessionEvent::MessageReceived(payload),
    )
    .await;
}

#[tokio::test]
async fn disconnect_tears_down_and_reconnect_resyncs() {
    let (mut initiator, mut responder) =
        linked_pair(fast_config(SessionConfig::initiator()), fast_config(SessionConfig::responder()));
    establish(&mut initiator, &mut responder).await;

    // Drop the link from both sides.
    initiator.transport.set_connected(false);
    responder.transport.set_connected(false);
    initiator.session.on_disconnected();
    responder.session.on_disconnected();
    expect_event(&mut initiator.events, SessionEvent::Disconnected).await;
    expect_event(&mut responder.events, SessionEvent::Disconnected).await;

    // Reconnect: a fresh handshake runs and Established fires again,
    // exactly once for the new connection.
    establish(&mut initiator, &mut responder).await;

    initiator.session.send(b"after reconnect".to_vec()).unwrap();
    expect_event(
        &mut responder.events,
        SessionEvent::MessageReceived(b"after reconnect".to_vec()),
    )
    .await;
}

#[tokio::test]
async fn responder_never_probes() {
    let (initiator, mut responder) =
        linked_pair(fast_config(SessionConfig::initiator()), fast_config(SessionConfig::responder()));

    // Bring up only the responder; with no initiator probes in flight it
    // must stay quiet past many probe intervals.
    responder.transport.set_connected(true);
    responder.session.on_connected();
    expect_event(&mut responder.events, SessionEvent::Connected).await;
    expect_quiet(&mut responder.events).await;

    drop(initiator);
}
