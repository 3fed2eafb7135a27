//! Gateway events
//!
//! Event kinds on both directions of the socket and the inbound payload decoders.

mod event_types;
mod payloads;

pub use event_types::{InboundEventType, OutboundEventType};
pub use payloads::{TypingChange, UserRef};
