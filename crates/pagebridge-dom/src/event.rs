//! Pointer events seen by document-level listeners.

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Event types the selector agent listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventType {
    /// Pointer entered an element (`mouseover`).
    PointerEnter,
    /// Pointer left an element (`mouseout`).
    PointerLeave,
    /// Element was clicked.
    Click,
}

impl EventType {
    pub const ALL: [EventType; 3] = [
        EventType::PointerEnter,
        EventType::PointerLeave,
        EventType::Click,
    ];

    /// DOM event name.
    pub fn dom_name(&self) -> &'static str {
        match self {
            EventType::PointerEnter => "mouseover",
            EventType::PointerLeave => "mouseout",
            EventType::Click => "click",
        }
    }
}

/// A pointer event targeted at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: EventType,
    pub target: NodeId,
}

impl PointerEvent {
    pub fn new(kind: EventType, target: NodeId) -> Self {
        Self { kind, target }
    }
}

/// What listeners did to an event during dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// `preventDefault()` was called; the page's default action is skipped.
    pub default_prevented: bool,
    /// `stopPropagation()` was called; the page's own handlers never run.
    pub propagation_stopped: bool,
}

impl EventOutcome {
    /// Outcome of an event nobody intercepted.
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// Outcome of an event fully consumed by a capture listener.
    pub fn consumed() -> Self {
        Self {
            default_prevented: true,
            propagation_stopped: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_names() {
        assert_eq!(EventType::PointerEnter.dom_name(), "mouseover");
        assert_eq!(EventType::PointerLeave.dom_name(), "mouseout");
        assert_eq!(EventType::Click.dom_name(), "click");
    }

    #[test]
    fn test_outcomes() {
        assert!(!EventOutcome::passthrough().default_prevented);
        let consumed = EventOutcome::consumed();
        assert!(consumed.default_prevented && consumed.propagation_stopped);
    }
}
