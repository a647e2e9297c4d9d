//! The selector agent.
//!
//! Runs inside the embedded document. While active it intercepts pointer
//! events at the document level (capture phase), marks the hovered element,
//! and on click marks the element as selected and reports its descriptor to
//! the parent window.

use std::sync::Arc;

use pagebridge_config::SelectorConfig;
use pagebridge_dom::{Document, DomError, EventOutcome, EventType, NodeId, PointerEvent};
use pagebridge_protocol::{
    BridgeMessage, ElementDescriptor, MessageBus, MessageKind, Origin, TransportError,
};
use serde_json::Value;
use tracing::{debug, error, info, trace, warn};

use crate::describe::describe;
use crate::style::install_styles;

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;

/// Where the agent posts its reports: the parent window.
pub trait UpstreamSink: Send + Sync {
    /// `window.parent.postMessage(message, target_origin)`.
    fn send(&self, message: &BridgeMessage, target_origin: &str) -> Result<(), TransportError>;
}

impl UpstreamSink for MessageBus {
    fn send(&self, message: &BridgeMessage, _target_origin: &str) -> Result<(), TransportError> {
        self.post(message.to_value()?)?;
        Ok(())
    }
}

/// Whether the agent is intercepting pointer events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AgentPhase {
    #[default]
    Idle,
    Active,
}

/// Hover/select state machine over one document.
///
/// The agent does not own the document; the browsing context passes it in on
/// every call. Tracked nodes are plain [`NodeId`]s and are re-checked for
/// liveness before each use.
pub struct SelectorAgent {
    config: SelectorConfig,
    phase: AgentPhase,
    hovered: Option<NodeId>,
    selected: Option<NodeId>,
    upstream: Arc<dyn UpstreamSink>,
}

impl SelectorAgent {
    pub fn new(config: SelectorConfig, upstream: Arc<dyn UpstreamSink>) -> Self {
        Self {
            config,
            phase: AgentPhase::Idle,
            hovered: None,
            selected: None,
            upstream,
        }
    }

    /// Install the highlight stylesheet. Safe to call more than once.
    pub fn install(&self, doc: &mut Document, marker_id: &str) -> Result<NodeId, DomError> {
        install_styles(doc, marker_id, &self.config)
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == AgentPhase::Active
    }

    /// The hovered element, if it is still in the document.
    pub fn hovered(&self, doc: &Document) -> Option<NodeId> {
        self.hovered.filter(|&n| doc.is_connected(n))
    }

    /// The selected element, if it is still in the document.
    pub fn selected(&self, doc: &Document) -> Option<NodeId> {
        self.selected.filter(|&n| doc.is_connected(n))
    }

    /// Handle a raw message from the parent window.
    ///
    /// Only well-formed host messages are acted on; anything else the page
    /// receives is none of the agent's business.
    pub fn handle_message(&mut self, doc: &mut Document, raw: &Value) {
        let Some(message) = BridgeMessage::accept_from(raw, Origin::Host) else {
            trace!("Selector ignoring non-host message");
            return;
        };

        debug!("Selector received {}", message.kind.as_str());
        match message.kind {
            MessageKind::EnterEditMode => self.activate(doc),
            MessageKind::ExitEditMode => self.deactivate(doc),
            MessageKind::ClearSelection => self.clear_selection(doc),
            MessageKind::ElementSelected => {
                trace!("Selector ignoring ELEMENT_SELECTED from host");
            }
        }
    }

    /// Start intercepting pointer events. No-op when already active.
    pub fn activate(&mut self, doc: &mut Document) {
        if self.is_active() {
            return;
        }
        self.phase = AgentPhase::Active;
        for kind in EventType::ALL {
            doc.add_event_listener(kind);
        }
        info!("Selector activated");
    }

    /// Stop intercepting and remove every marker. No-op when already idle.
    pub fn deactivate(&mut self, doc: &mut Document) {
        if !self.is_active() {
            return;
        }
        self.phase = AgentPhase::Idle;
        for kind in EventType::ALL {
            doc.remove_event_listener(kind);
        }

        if let Some(node) = self.hovered.take() {
            self.unmark(doc, node, MarkerKind::Hover);
        }
        self.clear_selection(doc);
        info!("Selector deactivated");
    }

    /// Drop the selection marker. Hover is left alone.
    pub fn clear_selection(&mut self, doc: &mut Document) {
        if let Some(node) = self.selected.take() {
            self.unmark(doc, node, MarkerKind::Selected);
            debug!("Selection {} cleared", node);
        }
    }

    /// Run the agent's capture listener for `event`.
    ///
    /// Returns what the listener did to the event. While idle nothing is
    /// intercepted.
    pub fn handle_event(&mut self, doc: &mut Document, event: PointerEvent) -> EventOutcome {
        if !self.is_active() {
            return EventOutcome::passthrough();
        }
        let target = event.target;
        if !doc.is_connected(target) || !doc.is_element(target) {
            trace!("Ignoring {} on non-element {}", event.kind.dom_name(), target);
            return EventOutcome::passthrough();
        }

        match event.kind {
            EventType::PointerEnter => {
                self.pointer_enter(doc, target);
                EventOutcome::passthrough()
            }
            EventType::PointerLeave => {
                self.pointer_leave(doc, target);
                EventOutcome::passthrough()
            }
            EventType::Click => {
                self.click(doc, target);
                EventOutcome::consumed()
            }
        }
    }

    fn pointer_enter(&mut self, doc: &mut Document, target: NodeId) {
        if self.selected(doc) == Some(target) {
            return;
        }
        // A detached hover no longer counts, but its marker still has to go.
        if let Some(previous) = self.hovered.take().filter(|&n| n != target) {
            self.unmark(doc, previous, MarkerKind::Hover);
        }
        self.hovered = Some(target);
        self.mark(doc, target, MarkerKind::Hover);
    }

    fn pointer_leave(&mut self, doc: &mut Document, target: NodeId) {
        if self.hovered(doc) == Some(target) {
            self.unmark(doc, target, MarkerKind::Hover);
            self.hovered = None;
        }
    }

    fn click(&mut self, doc: &mut Document, target: NodeId) {
        self.clear_selection(doc);

        self.unmark(doc, target, MarkerKind::Hover);
        if self.hovered == Some(target) {
            self.hovered = None;
        }

        self.selected = Some(target);
        self.mark(doc, target, MarkerKind::Selected);

        match describe(doc, target, &self.config) {
            Ok(descriptor) => self.report(descriptor),
            Err(e) => error!("Failed to describe selected element {}: {}", target, e),
        }
    }

    fn report(&self, descriptor: ElementDescriptor) {
        debug!("Element selected: {}", descriptor);
        let message = BridgeMessage::element_selected(descriptor);
        if let Err(e) = self.upstream.send(&message, &self.config.target_origin) {
            error!("Failed to report selection to parent: {}", e);
        }
    }

    fn mark(&self, doc: &mut Document, node: NodeId, marker: MarkerKind) {
        if let Err(e) = doc.add_class(node, marker.class(&self.config)) {
            warn!("Failed to mark {}: {}", node, e);
        }
    }

    fn unmark(&self, doc: &mut Document, node: NodeId, marker: MarkerKind) {
        // Freed nodes have nothing left to clean up.
        if doc.is_element(node) {
            if let Err(e) = doc.remove_class(node, marker.class(&self.config)) {
                trace!("Failed to unmark {}: {}", node, e);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MarkerKind {
    Hover,
    Selected,
}

impl MarkerKind {
    fn class(self, config: &SelectorConfig) -> &str {
        match self {
            MarkerKind::Hover => &config.hover_class,
            MarkerKind::Selected => &config.selected_class,
        }
    }
}
