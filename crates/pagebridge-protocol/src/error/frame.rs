//! Frame access errors.

use thiserror::Error;

/// Failure to reach into the embedded document.
///
/// All variants are transient from the bridge's point of view: the host logs
/// them and leaves edit mode inert for the current page.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Embedded document is not available yet")]
    DocumentUnavailable,

    #[error("Access to embedded document denied: {0}")]
    AccessDenied(String),

    #[error("Embedded document has no body")]
    BodyMissing,

    #[error("Frame is detached from its browsing context")]
    Detached,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_unavailable_error() {
        let err = FrameError::DocumentUnavailable;
        assert!(err.to_string().contains("not available"));
    }

    #[test]
    fn test_access_denied_error() {
        let err = FrameError::AccessDenied("cross-origin frame".to_string());
        let display = err.to_string();
        assert!(display.contains("denied"));
        assert!(display.contains("cross-origin frame"));
    }

    #[test]
    fn test_body_missing_error() {
        assert!(FrameError::BodyMissing.to_string().contains("no body"));
    }

    #[test]
    fn test_error_debug() {
        let debug = format!("{:?}", FrameError::Detached);
        assert!(debug.contains("Detached"));
    }
}
