//! Integration test support
//!
//! Spawns a real server on an ephemeral port and provides HTTP and WebSocket
//! clients to drive it.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
