//! Typed events emitted by a session.

/// Notifications surfaced to the application layer.
///
/// One subscribable stream instead of per-concern callback slots; drop the
/// receiver and the protocol keeps running, just unobserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The transport accepted a link-level connection. The handshake has not
    /// completed yet; data sent now sits behind the sync.
    Connected,

    /// The handshake reached synced. Fires exactly once per connection; this
    /// is the signal that the peer's protocol stack is listening.
    Established,

    /// A complete application message arrived (single-frame or reassembled).
    MessageReceived(Vec<u8>),

    /// The transport lost the link. All protocol state has been discarded;
    /// a reconnect starts a fresh handshake.
    Disconnected,
}
