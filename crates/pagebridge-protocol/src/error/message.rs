//! Message validation errors.

use thiserror::Error;

/// Why an inbound window message was not accepted as a bridge message.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Message is not an object")]
    NotAnObject,

    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("{0} message is missing its element payload")]
    MissingPayload(&'static str),

    #[error("{0} message must not carry a payload")]
    UnexpectedPayload(&'static str),

    #[error("Element payload has an empty tag name")]
    EmptyTagName,
}
