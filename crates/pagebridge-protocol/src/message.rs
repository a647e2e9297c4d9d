//! Bridge message definitions.
//!
//! Messages travel between the host window and the embedded preview as plain
//! JSON objects, the same shape the injected selector script posts:
//!
//! ```json
//! { "type": "ELEMENT_SELECTED", "data": { ... }, "source": "preview", "timestamp": 1700000000000 }
//! ```
//!
//! The `source` field is a discriminator used to drop echoes and unrelated
//! traffic. It is not a security boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::descriptor::ElementDescriptor;
use crate::error::{MessageError, TransportError};

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

/// What a message asks for or reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    /// Host asks the agent to start intercepting pointer events.
    EnterEditMode,
    /// Host asks the agent to stop and clear all markers.
    ExitEditMode,
    /// Agent reports a clicked element.
    ElementSelected,
    /// Host asks the agent to drop its selection marker.
    ClearSelection,
}

impl MessageKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::EnterEditMode => "ENTER_EDIT_MODE",
            MessageKind::ExitEditMode => "EXIT_EDIT_MODE",
            MessageKind::ElementSelected => "ELEMENT_SELECTED",
            MessageKind::ClearSelection => "CLEAR_SELECTION",
        }
    }

    /// Whether messages of this kind carry an element descriptor.
    pub fn carries_payload(&self) -> bool {
        matches!(self, MessageKind::ElementSelected)
    }
}

/// Which side of the bridge produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// The host page that owns the iframe.
    #[serde(rename = "main")]
    Host,
    /// The document inside the iframe.
    #[serde(rename = "preview")]
    Embedded,
}

impl Origin {
    /// Wire name of the origin.
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Host => "main",
            Origin::Embedded => "preview",
        }
    }
}

/// A message exchanged over the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Present only for [`MessageKind::ElementSelected`].
    #[serde(rename = "data", default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ElementDescriptor>,
    #[serde(rename = "source")]
    pub origin: Origin,
    /// Milliseconds since the Unix epoch. Advisory only.
    #[serde(rename = "timestamp", default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<i64>,
}

impl BridgeMessage {
    /// Create a host control message stamped with the current time.
    pub fn control(kind: MessageKind) -> Self {
        Self {
            kind,
            payload: None,
            origin: Origin::Host,
            sent_at: Some(chrono::Utc::now().timestamp_millis()),
        }
    }

    /// Create the agent's selection report.
    pub fn element_selected(descriptor: ElementDescriptor) -> Self {
        Self {
            kind: MessageKind::ElementSelected,
            payload: Some(descriptor),
            origin: Origin::Embedded,
            sent_at: Some(chrono::Utc::now().timestamp_millis()),
        }
    }

    /// Parse and validate a raw window message.
    ///
    /// Anything that is not an object, does not deserialize, or has a payload
    /// inconsistent with its kind is rejected.
    pub fn from_value(value: &Value) -> Result<Self, MessageError> {
        if !value.is_object() {
            return Err(MessageError::NotAnObject);
        }
        let message: BridgeMessage = serde_json::from_value(value.clone())
            .map_err(|e| MessageError::Malformed(e.to_string()))?;
        message.validate()?;
        Ok(message)
    }

    /// Parse a raw message and keep it only if it came from `origin`.
    ///
    /// Returns `None` for malformed messages as well as for well-formed ones
    /// from the other side.
    pub fn accept_from(value: &Value, origin: Origin) -> Option<Self> {
        BridgeMessage::from_value(value)
            .ok()
            .filter(|message| message.origin == origin)
    }

    /// Check the payload/kind invariant.
    pub fn validate(&self) -> Result<(), MessageError> {
        match (&self.payload, self.kind.carries_payload()) {
            (None, true) => Err(MessageError::MissingPayload(self.kind.as_str())),
            (Some(_), false) => Err(MessageError::UnexpectedPayload(self.kind.as_str())),
            (Some(descriptor), true) if descriptor.tag_name.is_empty() => {
                Err(MessageError::EmptyTagName)
            }
            _ => Ok(()),
        }
    }

    /// Serialize to the JSON value posted across the bridge.
    pub fn to_value(&self) -> Result<Value, TransportError> {
        Ok(serde_json::to_value(self)?)
    }
}
