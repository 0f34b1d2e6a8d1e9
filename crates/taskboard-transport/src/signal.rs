//! Process-wide "session invalidated" signal.
//!
//! A broadcast channel with a single topic. [`RequestTransport`] emits on
//! every `401`; whoever composes the session gate with routing subscribes
//! and forces the unauthenticated state. Emitting never blocks, and a
//! signal with no subscribers is simply dropped.
//!
//! [`RequestTransport`]: crate::RequestTransport

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

/// Payload of a session-invalidated signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionInvalidated {
    /// Endpoint whose response revealed the lost session.
    pub endpoint: String,
}

/// Cloneable handle to the session-invalidated channel.
#[derive(Clone, Debug)]
pub struct SessionSignals {
    tx: broadcast::Sender<SessionInvalidated>,
    emit_count: Arc<AtomicU64>,
}

impl SessionSignals {
    /// Create a new channel with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new channel with a custom capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            emit_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Broadcast that the session is gone. Returns the number of receivers.
    pub fn invalidate(&self, endpoint: &str) -> usize {
        let _ = self.emit_count.fetch_add(1, Ordering::Relaxed);
        self.tx
            .send(SessionInvalidated {
                endpoint: endpoint.to_string(),
            })
            .unwrap_or(0)
    }

    /// Receive every signal emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionInvalidated> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Total signals emitted since creation.
    pub fn emit_count(&self) -> u64 {
        self.emit_count.load(Ordering::Relaxed)
    }
}

impl Default for SessionSignals {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
