//! # PageBridge Protocol
//!
//! Shared definitions for the visual editing bridge between a host page and
//! the document embedded in its preview iframe.
//! Contains only types and boundary traits - no DOM or session logic.
//!
//! ## Core Types
//!
//! - [`BridgeMessage`] - The unit exchanged over the cross-document channel
//! - [`ElementDescriptor`] - Snapshot of a selected element
//! - [`FrameHandle`] - What the host may do with the embedded frame
//! - [`MessageBus`] - A window's `message` event stream

pub mod bus;
pub mod descriptor;
pub mod error;
pub mod frame;
pub mod message;

pub use bus::MessageBus;
pub use descriptor::{clip_text, ElementDescriptor, DEFAULT_TEXT_LIMIT};
pub use error::{FrameError, MessageError, TransportError};
pub use frame::{FrameHandle, ReadyState};
pub use message::{BridgeMessage, MessageKind, Origin};
