//! # PageBridge Host
//!
//! The host half of the editing bridge: [`EditorBridgeHost`] owns edit-mode
//! state, instruments the preview frame with the selector script, and relays
//! the agent's selections to the application through a [`MessageHandler`].

mod handler;
mod host;
mod injection;
mod session;

#[cfg(test)]
mod mock;

pub use handler::MessageHandler;
pub use host::EditorBridgeHost;
pub use injection::{inject_selector_script, InjectionOutcome};
pub use session::EditSessionState;
