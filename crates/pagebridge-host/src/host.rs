//! The host-side bridge controller.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use pagebridge_agent::{ScriptConfig, ScriptError, SelectorScript};
use pagebridge_config::{BridgeConfig, Config};
use pagebridge_protocol::{
    BridgeMessage, ElementDescriptor, FrameHandle, MessageBus, MessageKind, Origin, ReadyState,
};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::handler::MessageHandler;
use crate::injection::{inject_selector_script, InjectionOutcome};
use crate::session::EditSessionState;

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;

/// Controls visual editing of the document embedded in a preview frame.
///
/// The host injects the selector payload into the frame, switches edit mode
/// on and off, and caches the element the user last selected. It only ever
/// touches the embedded document to add the one script element.
pub struct EditorBridgeHost {
    config: BridgeConfig,
    payload: Arc<str>,
    window: MessageBus,
    shared: Arc<Shared>,
}

struct Shared {
    /// Bumped whenever a session ends; deferred work from older sessions
    /// sees a different value and stops.
    epoch: AtomicU64,
    binding: Mutex<Option<Binding>>,
}

impl Shared {
    fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }
}

/// A bound frame and the tasks serving it.
struct Binding {
    frame: Arc<dyn FrameHandle>,
    session: EditSessionState,
    _listener: TaskGuard,
    _loader: TaskGuard,
}

/// Aborts the task when dropped.
struct TaskGuard(JoinHandle<()>);

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl EditorBridgeHost {
    /// Create a host for the window whose `message` events arrive on `window`.
    pub fn new(config: &Config, window: MessageBus) -> Result<Self, ScriptError> {
        let payload = SelectorScript::render(&ScriptConfig::from_config(config))?;
        Ok(Self::with_payload(config.bridge.clone(), payload, window))
    }

    /// Create a host that injects `payload` verbatim.
    pub fn with_payload(config: BridgeConfig, payload: impl Into<String>, window: MessageBus) -> Self {
        if config.is_wildcard_origin() && !config.wildcard_origin_confirmed {
            warn!(
                "Posting bridge messages with target origin '*'; any document in the frame \
                 will receive them. Set bridge.wildcard_origin_confirmed to silence this."
            );
        }
        Self {
            config,
            payload: Arc::from(payload.into()),
            window,
            shared: Arc::new(Shared {
                epoch: AtomicU64::new(0),
                binding: Mutex::new(None),
            }),
        }
    }

    /// Bind to `frame` and start serving it.
    ///
    /// Injects the selector right away if the frame's document is complete,
    /// otherwise after the next load event plus the settle delay. Every later
    /// load event injects again. Any previous session is torn down first.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn initialize(&self, frame: Arc<dyn FrameHandle>, handler: Arc<dyn MessageHandler>) {
        self.teardown();
        let epoch = self.shared.current_epoch();
        debug!("Initializing bridge session {}", epoch);

        // Subscribe before reading readyState so a load in between is not lost.
        let loads = frame.load_signal();
        let injector = Injector {
            frame: frame.clone(),
            marker_id: self.config.marker_id.clone(),
            payload: self.payload.clone(),
            config: self.config.clone(),
            shared: self.shared.clone(),
            epoch,
        };

        // The binding is in place before either task can look for it.
        {
            let mut binding = self.shared.binding.lock();
            let listener = tokio::spawn(listen(
                self.window.subscribe(),
                self.shared.clone(),
                handler,
                epoch,
            ));
            let loader = tokio::spawn(injector.clone().on_each_load(loads));
            *binding = Some(Binding {
                frame: frame.clone(),
                session: EditSessionState::default(),
                _listener: TaskGuard(listener),
                _loader: TaskGuard(loader),
            });
        }

        match frame.ready_state() {
            Ok(ReadyState::Complete) => {
                debug!("Frame already loaded, injecting immediately");
                injector.attempt();
            }
            Ok(state) => debug!("Frame is {:?}, waiting for load", state),
            Err(e) => warn!("Frame document not reachable yet: {}", e),
        }
    }

    /// Ask the agent to start intercepting pointer events.
    pub fn enter_edit_mode(&self) {
        let frame = {
            let mut binding = self.shared.binding.lock();
            let Some(binding) = binding.as_mut() else {
                warn!("Cannot enter edit mode: no frame bound");
                return;
            };
            binding.session.enter();
            binding.frame.clone()
        };
        self.send(frame.as_ref(), MessageKind::EnterEditMode);
        info!("Entered edit mode");
    }

    /// Ask the agent to stop and drop its markers. Forgets the cached
    /// selection.
    pub fn exit_edit_mode(&self) {
        let frame = {
            let mut binding = self.shared.binding.lock();
            let Some(binding) = binding.as_mut() else {
                warn!("Cannot exit edit mode: no frame bound");
                return;
            };
            binding.session.exit();
            binding.frame.clone()
        };
        self.send(frame.as_ref(), MessageKind::ExitEditMode);
        info!("Exited edit mode");
    }

    /// Ask the agent to drop its selection marker. Edit mode and the cached
    /// selection are unaffected.
    pub fn clear_selection(&self) {
        let Some(frame) = self.bound_frame() else {
            warn!("Cannot clear selection: no frame bound");
            return;
        };
        self.send(frame.as_ref(), MessageKind::ClearSelection);
        debug!("Requested selection clear");
    }

    /// The element most recently reported by the agent.
    pub fn selection(&self) -> Option<ElementDescriptor> {
        self.shared
            .binding
            .lock()
            .as_ref()
            .and_then(|b| b.session.last_selection.clone())
    }

    pub fn is_edit_mode(&self) -> bool {
        self.shared
            .binding
            .lock()
            .as_ref()
            .is_some_and(|b| b.session.edit_mode_active)
    }

    pub fn is_initialized(&self) -> bool {
        self.shared.binding.lock().is_some()
    }

    /// End the session: stop listening, cancel pending injections, release
    /// the frame. Safe to call repeatedly.
    pub fn teardown(&self) {
        self.shared.epoch.fetch_add(1, Ordering::SeqCst);
        let previous = self.shared.binding.lock().take();
        if previous.is_some() {
            debug!("Bridge session torn down");
        }
    }

    fn bound_frame(&self) -> Option<Arc<dyn FrameHandle>> {
        self.shared.binding.lock().as_ref().map(|b| b.frame.clone())
    }

    fn send(&self, frame: &dyn FrameHandle, kind: MessageKind) {
        let message = BridgeMessage::control(kind);
        let result = message
            .to_value()
            .and_then(|value| frame.post_message(&value, &self.config.target_origin));
        match result {
            Ok(()) => trace!("Sent {} to frame", kind.as_str()),
            Err(e) => error!("Failed to send {} to frame: {}", kind.as_str(), e),
        }
    }
}

impl Drop for EditorBridgeHost {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Serve the window's `message` events for one session.
async fn listen(
    mut rx: broadcast::Receiver<Value>,
    shared: Arc<Shared>,
    handler: Arc<dyn MessageHandler>,
    epoch: u64,
) {
    loop {
        let raw = match rx.recv().await {
            Ok(raw) => raw,
            Err(RecvError::Lagged(skipped)) => {
                warn!("Bridge listener lagged, {} message(s) dropped", skipped);
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        let Some(message) = BridgeMessage::accept_from(&raw, Origin::Embedded) else {
            trace!("Ignoring window message not from the embedded agent");
            continue;
        };

        {
            let mut binding = shared.binding.lock();
            if shared.current_epoch() != epoch {
                break;
            }
            if let (Some(binding), MessageKind::ElementSelected, Some(descriptor)) =
                (binding.as_mut(), message.kind, message.payload.as_ref())
            {
                debug!("Selection received: {}", descriptor);
                binding.session.record_selection(descriptor.clone());
            }
        }

        match catch_unwind(AssertUnwindSafe(|| handler.on_message(&message))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Message handler failed: {:#}", e),
            Err(_) => error!("Message handler panicked"),
        }
    }
    debug!("Bridge listener for session {} stopped", epoch);
}

/// Injection work for one session.
#[derive(Clone)]
struct Injector {
    frame: Arc<dyn FrameHandle>,
    marker_id: String,
    payload: Arc<str>,
    config: BridgeConfig,
    shared: Arc<Shared>,
    epoch: u64,
}

impl Injector {
    fn is_current(&self) -> bool {
        self.shared.current_epoch() == self.epoch
    }

    fn inject(&self) {
        let outcome = inject_selector_script(self.frame.as_ref(), &self.marker_id, &self.payload);
        outcome.log(&self.marker_id);
        if matches!(outcome, InjectionOutcome::Injected) {
            self.resume_edit_mode();
        }
    }

    /// A freshly injected agent starts idle. If the session is editing, put
    /// the new agent back into edit mode.
    fn resume_edit_mode(&self) {
        let editing = self.is_current()
            && self
                .shared
                .binding
                .lock()
                .as_ref()
                .is_some_and(|b| b.session.edit_mode_active);
        if !editing {
            return;
        }
        let result = BridgeMessage::control(MessageKind::EnterEditMode)
            .to_value()
            .and_then(|value| self.frame.post_message(&value, &self.config.target_origin));
        match result {
            Ok(()) => info!("Edit mode resumed in reloaded frame"),
            Err(e) => error!("Failed to resume edit mode in frame: {}", e),
        }
    }

    /// Inject now and schedule the one verification pass.
    fn attempt(&self) {
        self.inject();
        tokio::spawn(self.clone().verify());
    }

    async fn verify(self) {
        tokio::time::sleep(self.config.verify_delay()).await;
        if !self.is_current() {
            return;
        }
        match self.frame.has_element(&self.marker_id) {
            Ok(false) => {
                info!("Selector script {} missing, retrying injection", self.marker_id);
                self.inject();
            }
            Ok(true) => debug!("Selector script {} verified", self.marker_id),
            Err(e) => warn!("Could not verify selector script: {}", e),
        }
    }

    async fn on_each_load(self, mut loads: watch::Receiver<u64>) {
        while loads.changed().await.is_ok() {
            debug!("Frame load event, injecting after settle delay");
            tokio::time::sleep(self.config.settle_delay()).await;
            if !self.is_current() {
                return;
            }
            self.attempt();
        }
    }
}
