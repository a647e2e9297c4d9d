//! In-memory document model for the embedded browsing context.
//!
//! Provides just enough of the DOM for the selector agent: an element/text
//! tree with attributes and class lists, `readyState`, lookup by id,
//! `textContent`, and a registry of document-level capture listeners.
//!
//! Nodes are addressed by [`NodeId`]. Ids are never reused, so an id held
//! after its node was removed simply stops resolving; it never aliases a
//! newer node.

mod document;
mod error;
mod event;
mod node;

pub use document::Document;
pub use error::DomError;
pub use event::{EventOutcome, EventType, PointerEvent};
pub use node::{NodeId, NodeKind};
pub use pagebridge_protocol::ReadyState;
