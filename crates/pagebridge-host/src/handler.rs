//! Application callback for messages from the embedded document.

use pagebridge_protocol::BridgeMessage;

/// Receives every accepted message from the embedded agent.
///
/// Errors and panics are caught and logged by the host; the listener keeps
/// running either way.
pub trait MessageHandler: Send + Sync {
    fn on_message(&self, message: &BridgeMessage) -> anyhow::Result<()>;
}

impl<F> MessageHandler for F
where
    F: Fn(&BridgeMessage) -> anyhow::Result<()> + Send + Sync,
{
    fn on_message(&self, message: &BridgeMessage) -> anyhow::Result<()> {
        self(message)
    }
}
