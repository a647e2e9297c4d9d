//! Error types for the bridge protocol.

mod frame;
mod message;
mod transport;

pub use frame::FrameError;
pub use message::MessageError;
pub use transport::TransportError;
