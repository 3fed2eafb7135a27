//! Event broadcasting
//!
//! Fans presence snapshots and server events out to every live connection.

mod engine;

pub use engine::BroadcastEngine;
