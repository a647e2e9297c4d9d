//! In-memory preview frame.
//!
//! [`EmbeddedFrame`] is a same-origin browsing context with a [`Document`], a
//! load event, and a window that executes injected selector payloads by
//! installing a [`SelectorAgent`]. Messages the agent reports go to the parent
//! window's [`MessageBus`].

use std::sync::Arc;

use pagebridge_dom::{Document, EventOutcome, PointerEvent};
use pagebridge_protocol::{FrameError, FrameHandle, MessageBus, ReadyState, TransportError};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use crate::agent::{AgentPhase, SelectorAgent};
use crate::script::SelectorScript;

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;

struct FrameState {
    document: Document,
    /// The window's selector instance; `Some` doubles as the instance flag.
    agent: Option<SelectorAgent>,
    accessible: bool,
    attached: bool,
}

/// A same-origin iframe and its content window.
///
/// Cloning yields another handle to the same frame.
#[derive(Clone)]
pub struct EmbeddedFrame {
    state: Arc<Mutex<FrameState>>,
    loads: Arc<watch::Sender<u64>>,
    parent: MessageBus,
}

impl EmbeddedFrame {
    /// A frame still loading an empty page, embedded in the window whose
    /// message bus is `parent`.
    pub fn new(parent: MessageBus) -> Self {
        Self::with_document(parent, Document::new())
    }

    pub fn with_document(parent: MessageBus, document: Document) -> Self {
        let (loads, _) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(FrameState {
                document,
                agent: None,
                accessible: true,
                attached: true,
            })),
            loads: Arc::new(loads),
            parent,
        }
    }

    /// Mark the document complete and fire the frame's load event.
    pub fn finish_load(&self) {
        self.state.lock().document.set_ready_state(ReadyState::Complete);
        self.loads.send_modify(|count| *count += 1);
        debug!("Frame load event fired");
    }

    /// Replace the page. The new window starts without a selector instance
    /// and stays loading until [`finish_load`](Self::finish_load).
    pub fn navigate(&self, mut document: Document) {
        document.set_ready_state(ReadyState::Loading);
        let mut state = self.state.lock();
        state.document = document;
        state.agent = None;
        debug!("Frame navigated");
    }

    /// Reload with a fresh empty page and fire the load event.
    pub fn reload(&self) {
        self.navigate(Document::new());
        self.finish_load();
    }

    /// Toggle whether the parent may reach into the document, as when the
    /// frame navigates cross-origin.
    pub fn set_accessible(&self, accessible: bool) {
        self.state.lock().accessible = accessible;
    }

    /// Remove the iframe from the host page.
    pub fn detach(&self) {
        let mut state = self.state.lock();
        state.attached = false;
        state.agent = None;
    }

    /// Run `f` against the current document.
    pub fn with_document_ref<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.state.lock().document)
    }

    /// Run `f` against the current document, e.g. to mutate the page.
    pub fn with_document_mut<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut self.state.lock().document)
    }

    /// Deliver a pointer event to the document.
    ///
    /// Only reaches the selector when it has a capture listener registered
    /// for the event type.
    pub fn dispatch(&self, event: PointerEvent) -> EventOutcome {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if !state.document.has_event_listener(event.kind) {
            return EventOutcome::passthrough();
        }
        match state.agent.as_mut() {
            Some(agent) => agent.handle_event(&mut state.document, event),
            None => EventOutcome::passthrough(),
        }
    }

    /// Whether a selector instance is running in the current window.
    pub fn is_instrumented(&self) -> bool {
        self.state.lock().agent.is_some()
    }

    /// Phase of the running selector instance.
    pub fn agent_phase(&self) -> Option<AgentPhase> {
        self.state.lock().agent.as_ref().map(SelectorAgent::phase)
    }

    /// Number of elements carrying `id`.
    pub fn count_elements_with_id(&self, id: &str) -> usize {
        let state = self.state.lock();
        let doc = &state.document;
        doc.descendants(doc.root())
            .into_iter()
            .filter(|&n| doc.attribute(n, "id") == Some(id))
            .count()
    }

    fn check_reachable(state: &FrameState) -> Result<(), FrameError> {
        if !state.attached {
            return Err(FrameError::Detached);
        }
        if !state.accessible {
            return Err(FrameError::AccessDenied(
                "blocked a frame from accessing a cross-origin frame".to_string(),
            ));
        }
        Ok(())
    }

    /// Execute a just-inserted script the way the window would.
    fn execute(&self, state: &mut FrameState, marker_id: &str, source: &str) {
        let config = match SelectorScript::parse_config(source) {
            Ok(config) => config,
            Err(e) => {
                warn!("Injected script {} is not a selector payload: {}", marker_id, e);
                return;
            }
        };
        if state.agent.is_some() {
            debug!("Selector already running in this window");
            return;
        }

        let agent = SelectorAgent::new(config.selector, Arc::new(self.parent.clone()));
        if let Err(e) = agent.install(&mut state.document, &config.marker_id) {
            warn!("Failed to install highlight styles: {}", e);
        }
        state.agent = Some(agent);
        info!("Selector initialized in frame");
    }
}

impl FrameHandle for EmbeddedFrame {
    fn ready_state(&self) -> Result<ReadyState, FrameError> {
        let state = self.state.lock();
        Self::check_reachable(&state)?;
        Ok(state.document.ready_state())
    }

    fn load_signal(&self) -> watch::Receiver<u64> {
        self.loads.subscribe()
    }

    fn has_element(&self, id: &str) -> Result<bool, FrameError> {
        let state = self.state.lock();
        Self::check_reachable(&state)?;
        Ok(state.document.get_element_by_id(id).is_some())
    }

    fn inject_script(&self, id: &str, source: &str) -> Result<(), FrameError> {
        let mut state = self.state.lock();
        Self::check_reachable(&state)?;
        let body = state.document.body().ok_or(FrameError::BodyMissing)?;

        let doc = &mut state.document;
        let script = doc.create_element("script");
        doc.set_attribute(script, "id", id)
            .and_then(|_| doc.set_text_content(script, source))
            .and_then(|_| doc.append_child(body, script))
            .map_err(|e| {
                warn!("Failed to build script element: {}", e);
                FrameError::DocumentUnavailable
            })?;
        debug!("Script {} appended to frame body", id);

        self.execute(&mut state, id, source);
        Ok(())
    }

    fn post_message(&self, message: &Value, _target_origin: &str) -> Result<(), TransportError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if !state.attached {
            return Err(TransportError::Detached);
        }
        match state.agent.as_mut() {
            Some(agent) => agent.handle_message(&mut state.document, message),
            None => trace!("No listener in frame for posted message"),
        }
        Ok(())
    }
}
