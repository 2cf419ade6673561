//! Outbound pacing and chunking.
//!
//! BLE links stall or silently drop notifies when written faster than the
//! peripheral's buffer drains, so outbound frames are emitted at a bounded
//! rate. The [`DelayedSender`] owns the send queue: it slices each queued
//! payload into frames of at most `max_chunk_size` payload bytes, emits them
//! at least `pacing_delay` apart, and fully drains one payload before
//! touching the next, so chunks of two messages never interleave.
//!
//! The sender is sans-IO: it hands back encoded frames and deadlines, and
//! the caller (the session actor, or a test) supplies the clock and performs
//! the writes.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::frame::{self, Command};

/// A queued outbound payload and the cursor of how much has been sliced.
#[derive(Debug)]
struct PendingMessage {
    payload: Vec<u8>,
    offset: usize,
}

/// What the sender wants the caller to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenderPoll {
    /// Write this encoded frame to the transport now.
    Emit(Vec<u8>),
    /// Pending frames exist, but the pacing delay has not elapsed.
    WaitUntil(Instant),
    /// Queue is empty.
    Idle,
}

/// Paced, chunking send queue.
#[derive(Debug)]
pub struct DelayedSender {
    max_chunk_size: usize,
    pacing_delay: Duration,
    queue: VecDeque<PendingMessage>,
    last_emit: Option<Instant>,
}

impl DelayedSender {
    /// Create a sender.
    ///
    /// `max_chunk_size` is the transport's negotiated per-write payload
    /// limit and must be non-zero (validated by the session config).
    pub fn new(max_chunk_size: usize, pacing_delay: Duration) -> Self {
        Self {
            max_chunk_size,
            pacing_delay,
            queue: VecDeque::new(),
            last_emit: None,
        }
    }

    /// Append a payload to the send queue (FIFO).
    pub fn enqueue(&mut self, payload: Vec<u8>) {
        self.queue.push_back(PendingMessage { payload, offset: 0 });
    }

    /// Whether any payload is fully or partially unsent.
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Number of payloads still queued (including the one being sliced).
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Poll using the real clock.
    pub fn poll(&mut self) -> SenderPoll {
        self.poll_at(Instant::now())
    }

    /// Poll at an explicit time: emit the next frame, report the next
    /// deadline, or report idle.
    pub fn poll_at(&mut self, now: Instant) -> SenderPoll {
        if self.queue.is_empty() {
            return SenderPoll::Idle;
        }

        if let Some(last) = self.last_emit {
            let ready_at = last + self.pacing_delay;
            if now < ready_at {
                return SenderPoll::WaitUntil(ready_at);
            }
        }

        SenderPoll::Emit(self.emit_slice(now))
    }

    /// Time until the next frame may be emitted; `None` when idle.
    pub fn time_until_ready(&self) -> Option<Duration> {
        self.time_until_ready_at(Instant::now())
    }

    /// Time until the next frame may be emitted, at an explicit time.
    pub fn time_until_ready_at(&self, now: Instant) -> Option<Duration> {
        if self.queue.is_empty() {
            return None;
        }
        Some(self.last_emit.map_or(Duration::ZERO, |last| {
            (last + self.pacing_delay).saturating_duration_since(now)
        }))
    }

    /// Discard the queue and pacing state (connection teardown).
    pub fn clear(&mut self) {
        self.queue.clear();
        self.last_emit = None;
    }

    /// Slice and encode the next frame off the head payload.
    ///
    /// Caller has already checked the queue is non-empty and pacing allows.
    fn emit_slice(&mut self, now: Instant) -> Vec<u8> {
        // Queue checked non-empty by both callers of this function.
        let head = match self.queue.front_mut() {
            Some(head) => head,
            None => return Vec::new(),
        };

        let len = head.payload.len();
        let end = usize::min(head.offset + self.max_chunk_size, len);
        let command = if len <= self.max_chunk_size {
            Command::Data
        } else if head.offset == 0 {
            Command::ChunkStart
        } else if end == len {
            // A payload that divides evenly still ends with a full-sized
            // END slice, never an empty one.
            Command::ChunkEnd
        } else {
            Command::ChunkMiddle
        };

        let wire = frame::encode(command, &head.payload[head.offset..end]);
        head.offset = end;
        if end == len {
            self.queue.pop_front();
        }
        self.last_emit = Some(now);
        wire
    }
}
