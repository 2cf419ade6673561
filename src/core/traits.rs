//! The transport collaborator seam.
//!
//! BLEComm deliberately knows nothing about BLE itself. Discovery,
//! advertising, service/characteristic setup, connection management and MTU
//! negotiation all live behind this trait; the protocol layer only ever asks
//! for two things: "write these bytes" and "are we still connected".

/// A connected link capable of small, fire-and-forget writes.
///
/// Implementations wrap whatever performs the physical write (a BLE notify
/// callback, a characteristic write-without-response, an in-memory pipe in
/// tests). The transport must deliver each inbound write as exactly one
/// `Session::on_data` call, preserving order within the connection; the
/// protocol carries no length prefix or sequence numbers and relies on the
/// link's write boundaries.
pub trait Transport: Send + Sync + 'static {
    /// Write one encoded frame to the link.
    ///
    /// Fire-and-forget: no delivery confirmation is surfaced to the protocol
    /// layer. A failed write shows up later as a disconnect, if at all.
    fn write(&self, frame: &[u8]);

    /// Whether the link is currently connected.
    fn is_connected(&self) -> bool;
}
