//! Host-side view of the embedded frame.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;

use crate::error::{FrameError, TransportError};

/// Document readiness, mirroring `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    #[default]
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    pub fn is_complete(&self) -> bool {
        matches!(self, ReadyState::Complete)
    }
}

/// Everything the host is allowed to do with the iframe it embeds.
///
/// The host reads the embedded document's readiness, checks for and appends
/// the one injected script element, and posts messages into the frame's
/// window. It never touches any other part of the embedded DOM.
pub trait FrameHandle: Send + Sync {
    /// Current `readyState` of the embedded document.
    fn ready_state(&self) -> Result<ReadyState, FrameError>;

    /// Load-event signal.
    ///
    /// The value is a load counter; every `load` event of the frame bumps it,
    /// so `changed()` on the receiver resolves once per load.
    fn load_signal(&self) -> watch::Receiver<u64>;

    /// Whether an element with this id exists in the embedded document.
    fn has_element(&self, id: &str) -> Result<bool, FrameError>;

    /// Append a `<script id=...>` with the given source to the document body.
    fn inject_script(&self, id: &str, source: &str) -> Result<(), FrameError>;

    /// `contentWindow.postMessage(message, target_origin)`.
    fn post_message(&self, message: &Value, target_origin: &str) -> Result<(), TransportError>;
}
