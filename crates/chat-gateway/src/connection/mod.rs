//! Connection management
//!
//! Live WebSocket connections and the registry that fans messages out to them.

mod connection;
mod registry;

pub use connection::{Connection, ConnectionId, DeliveryError};
pub use registry::{BroadcastReport, ConnectionRegistry};
