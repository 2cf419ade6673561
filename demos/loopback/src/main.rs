//! BLEComm loopback demo.
//!
//! Wires an Initiator and a Responder session together over an in-memory
//! link, runs the handshake, and exchanges one small and one chunked
//! message in each direction. No radio required; this is the protocol
//! conversation a BLE central/peripheral pair would have.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use blecomm_protocol::core::Transport;
use blecomm_protocol::session::{Session, SessionConfig, SessionEvent, SessionEvents};

/// One direction of the in-memory link.
struct PipeTransport {
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    connected: AtomicBool,
}

impl Transport for PipeTransport {
    fn write(&self, frame: &[u8]) {
        if self.is_connected() {
            let _ = self.outbound.send(frame.to_vec());
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

fn spawn_endpoint(
    name: &'static str,
    config: SessionConfig,
    outbound: mpsc::UnboundedSender<Vec<u8>>,
) -> (Session, SessionEvents, Arc<PipeTransport>) {
    let transport = Arc::new(PipeTransport {
        outbound,
        connected: AtomicBool::new(true),
    });
    let (session, events) =
        Session::spawn(config, transport.clone()).unwrap_or_else(|err| panic!("{name}: {err}"));
    (session, events, transport)
}

async fn log_events(name: &'static str, mut events: SessionEvents, echo: Option<Session>) {
    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Connected => println!("[{name}] link up"),
            SessionEvent::Established => println!("[{name}] handshake synced"),
            SessionEvent::MessageReceived(msg) => {
                println!(
                    "[{name}] received {} bytes: {:?}",
                    msg.len(),
                    String::from_utf8_lossy(&msg[..msg.len().min(40)])
                );
                if let Some(peer) = &echo {
                    let mut reply = b"echo: ".to_vec();
                    reply.extend_from_slice(&msg);
                    let _ = peer.send(reply);
                }
            }
            SessionEvent::Disconnected => println!("[{name}] link down"),
        }
    }
}

#[tokio::main]
async fn main() {
    let (to_responder_tx, mut to_responder_rx) = mpsc::unbounded_channel();
    let (to_initiator_tx, mut to_initiator_rx) = mpsc::unbounded_channel();

    let mut initiator_config = SessionConfig::initiator();
    initiator_config.probe_interval = Duration::from_millis(200);
    let responder_config = SessionConfig::responder();

    let (initiator, initiator_events, _initiator_transport) =
        spawn_endpoint("initiator", initiator_config, to_responder_tx);
    let (responder, responder_events, _responder_transport) =
        spawn_endpoint("responder", responder_config, to_initiator_tx);

    // Pump each direction, one write boundary per on_data call.
    {
        let responder = responder.clone();
        tokio::spawn(async move {
            while let Some(frame) = to_responder_rx.recv().await {
                responder.on_data(&frame);
            }
        });
    }
    {
        let initiator = initiator.clone();
        tokio::spawn(async move {
            while let Some(frame) = to_initiator_rx.recv().await {
                initiator.on_data(&frame);
            }
        });
    }

    tokio::spawn(log_events("responder", responder_events, Some(responder.clone())));
    let initiator_log = tokio::spawn(log_events("initiator", initiator_events, None));

    initiator.on_connected();
    responder.on_connected();

    // Give the handshake a couple of probe intervals.
    tokio::time::sleep(Duration::from_millis(500)).await;

    println!("[main] sending a short message");
    initiator.send(b"Welcome Message".to_vec()).unwrap();

    println!("[main] sending a 350-byte message (chunked over 100-byte frames)");
    let big: Vec<u8> = b"0123456789"
        .iter()
        .cycle()
        .take(350)
        .copied()
        .collect();
    initiator.send(big).unwrap();

    // Let the paced frames and echoes drain.
    tokio::time::sleep(Duration::from_secs(2)).await;

    initiator.shutdown();
    responder.shutdown();
    let _ = initiator_log.await;
    println!("[main] done");
}
