//! Transport errors.

use thiserror::Error;

/// Failure to post a message across the bridge.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Target window is detached")]
    Detached,

    #[error("No listener registered on target window")]
    NoListeners,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
