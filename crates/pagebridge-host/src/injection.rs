//! Selector script injection.

use std::fmt;

use pagebridge_protocol::{FrameError, FrameHandle};
use tracing::{debug, error, info};

/// Result of one injection attempt.
#[derive(Debug)]
pub enum InjectionOutcome {
    /// The script element was appended.
    Injected,
    /// The marker element already exists; nothing was done.
    AlreadyPresent,
    /// The document could not be reached or modified.
    Failed(FrameError),
}

impl InjectionOutcome {
    pub fn is_instrumented(&self) -> bool {
        matches!(self, InjectionOutcome::Injected | InjectionOutcome::AlreadyPresent)
    }

    /// Log the outcome at the level it deserves.
    pub fn log(&self, marker_id: &str) {
        match self {
            InjectionOutcome::Injected => info!("Selector script {} injected", marker_id),
            InjectionOutcome::AlreadyPresent => {
                debug!("Selector script {} already present", marker_id)
            }
            InjectionOutcome::Failed(e) => {
                error!("Failed to inject selector script {}: {}", marker_id, e)
            }
        }
    }
}

impl fmt::Display for InjectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectionOutcome::Injected => f.write_str("injected"),
            InjectionOutcome::AlreadyPresent => f.write_str("already present"),
            InjectionOutcome::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}

/// Append the selector payload to the frame's body unless an element with
/// `marker_id` is already there.
pub fn inject_selector_script(
    frame: &dyn FrameHandle,
    marker_id: &str,
    payload: &str,
) -> InjectionOutcome {
    match frame.has_element(marker_id) {
        Ok(true) => return InjectionOutcome::AlreadyPresent,
        Ok(false) => {}
        Err(e) => return InjectionOutcome::Failed(e),
    }

    match frame.inject_script(marker_id, payload) {
        Ok(()) => InjectionOutcome::Injected,
        Err(e) => InjectionOutcome::Failed(e),
    }
}
