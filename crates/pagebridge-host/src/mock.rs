//! Scriptable [`FrameHandle`] for unit tests.

use std::collections::HashSet;

use pagebridge_protocol::{FrameError, FrameHandle, ReadyState, TransportError};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::watch;

#[derive(Default)]
struct MockState {
    ready_state: ReadyState,
    elements: HashSet<String>,
    injections: usize,
    posted: Vec<Value>,
    accessible: bool,
    /// Accept injections without the element ever showing up.
    swallow_scripts: bool,
}

pub struct MockFrame {
    state: Mutex<MockState>,
    loads: watch::Sender<u64>,
}

impl MockFrame {
    pub fn new(ready_state: ReadyState) -> Self {
        let (loads, _) = watch::channel(0);
        Self {
            state: Mutex::new(MockState {
                ready_state,
                accessible: true,
                ..Default::default()
            }),
            loads,
        }
    }

    pub fn loaded() -> Self {
        Self::new(ReadyState::Complete)
    }

    pub fn swallowing() -> Self {
        let frame = Self::loaded();
        frame.state.lock().swallow_scripts = true;
        frame
    }

    pub fn with_element(self, id: &str) -> Self {
        self.state.lock().elements.insert(id.to_string());
        self
    }

    /// Fresh document, then the load event.
    pub fn fire_load(&self) {
        {
            let mut state = self.state.lock();
            state.ready_state = ReadyState::Complete;
            state.elements.clear();
        }
        self.loads.send_modify(|n| *n += 1);
    }

    pub fn set_accessible(&self, accessible: bool) {
        self.state.lock().accessible = accessible;
    }

    pub fn injections(&self) -> usize {
        self.state.lock().injections
    }

    pub fn posted_types(&self) -> Vec<String> {
        self.state
            .lock()
            .posted
            .iter()
            .filter_map(|v| v["type"].as_str().map(String::from))
            .collect()
    }

    fn check(&self) -> Result<(), FrameError> {
        if self.state.lock().accessible {
            Ok(())
        } else {
            Err(FrameError::AccessDenied("cross-origin".to_string()))
        }
    }
}

impl FrameHandle for MockFrame {
    fn ready_state(&self) -> Result<ReadyState, FrameError> {
        self.check()?;
        Ok(self.state.lock().ready_state)
    }

    fn load_signal(&self) -> watch::Receiver<u64> {
        self.loads.subscribe()
    }

    fn has_element(&self, id: &str) -> Result<bool, FrameError> {
        self.check()?;
        Ok(self.state.lock().elements.contains(id))
    }

    fn inject_script(&self, id: &str, _source: &str) -> Result<(), FrameError> {
        self.check()?;
        let mut state = self.state.lock();
        state.injections += 1;
        if !state.swallow_scripts {
            state.elements.insert(id.to_string());
        }
        Ok(())
    }

    fn post_message(&self, message: &Value, _target_origin: &str) -> Result<(), TransportError> {
        self.state.lock().posted.push(message.clone());
        Ok(())
    }
}
