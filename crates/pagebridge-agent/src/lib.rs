//! # PageBridge Agent
//!
//! The embedded half of the editing bridge.
//!
//! - [`SelectorAgent`] - hover/select state machine over a [`Document`](pagebridge_dom::Document)
//! - [`element_path`] - structural addressing of the selected element
//! - [`SelectorScript`] - the same agent as an injectable JavaScript payload
//! - [`EmbeddedFrame`] - an in-memory preview iframe that runs injected payloads

pub mod addressing;
pub mod agent;
pub mod describe;
pub mod error;
pub mod frame;
pub mod script;
pub mod style;

pub use addressing::{element_path, id_selector};
pub use agent::{AgentPhase, SelectorAgent, UpstreamSink};
pub use describe::describe;
pub use error::ScriptError;
pub use frame::EmbeddedFrame;
pub use script::{ScriptConfig, SelectorScript};
pub use style::{install_styles, style_element_id, stylesheet};
