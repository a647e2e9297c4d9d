//! Host-side edit session state.

use pagebridge_protocol::ElementDescriptor;

/// What the host knows about the current edit session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSessionState {
    pub edit_mode_active: bool,
    /// Most recent selection reported by the agent.
    pub last_selection: Option<ElementDescriptor>,
}

impl EditSessionState {
    pub fn enter(&mut self) {
        self.edit_mode_active = true;
    }

    /// Leave edit mode. The cached selection goes with it.
    pub fn exit(&mut self) {
        self.edit_mode_active = false;
        self.last_selection = None;
    }

    pub fn record_selection(&mut self, descriptor: ElementDescriptor) {
        self.last_selection = Some(descriptor);
    }
}
