//! Window message bus.
//!
//! Stands in for a window's `message` event: anything posted to the window is
//! seen by every listener registered on it, including the poster's own
//! listener when both live in the same window.

use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::TransportError;

const DEFAULT_CAPACITY: usize = 64;

/// Broadcast channel of raw window messages.
#[derive(Debug, Clone)]
pub struct MessageBus {
    tx: broadcast::Sender<Value>,
}

impl MessageBus {
    /// Create a bus with the default buffer size.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a bus buffering up to `capacity` undelivered messages per listener.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Post a message to every current listener.
    ///
    /// Returns the number of listeners that will see it.
    pub fn post(&self, message: Value) -> Result<usize, TransportError> {
        self.tx.send(message).map_err(|_| TransportError::NoListeners)
    }

    /// Register a listener. It sees messages posted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Value> {
        self.tx.subscribe()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}
