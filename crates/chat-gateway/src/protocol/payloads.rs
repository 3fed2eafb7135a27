//! Gateway payload structures
//!
//! Server-originated payloads that are not domain records.

use serde::{Deserialize, Serialize};

/// `hello` payload sent immediately after a connection is registered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Identifier of this connection in the registry
    pub connection_id: String,
    /// Interval at which the server pings the client
    pub heartbeat_interval_ms: u64,
}

/// `error` payload sent to the connection whose event was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    /// Event kind that was rejected, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}
