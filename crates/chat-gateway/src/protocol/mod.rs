//! Gateway protocol definitions
//!
//! JSON text frames: clients send `{"event", "data"}`, the server pushes `{"t", "s", "d"}`.

mod messages;
mod payloads;

pub use messages::{ClientEvent, GatewayMessage};
pub use payloads::{ErrorPayload, HelloPayload};
