//! Gateway message format
//!
//! Defines the structure of every frame exchanged over the WebSocket.

use super::{ErrorPayload, HelloPayload};
use crate::events::OutboundEventType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server -> client message
///
/// `s` is the per-connection sequence number, assigned when the message is
/// queued for a specific connection. It lets a client check that pushes
/// arrive in the order they were issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Event type
    pub t: String,

    /// Sequence number (set per connection on push)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event data payload
    pub d: Value,
}

impl GatewayMessage {
    /// Create an unsequenced server event
    #[must_use]
    pub fn event(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            t: event_type.into(),
            s: None,
            d: data,
        }
    }

    /// Create the greeting sent right after the upgrade
    #[must_use]
    pub fn hello(payload: &HelloPayload) -> Self {
        Self::event(
            OutboundEventType::Hello.as_str(),
            serde_json::to_value(payload).unwrap_or_default(),
        )
    }

    /// Create an error reply addressed to a single connection
    #[must_use]
    pub fn error(payload: &ErrorPayload) -> Self {
        Self::event(
            OutboundEventType::Error.as_str(),
            serde_json::to_value(payload).unwrap_or_default(),
        )
    }

    /// Copy of this message carrying a connection sequence number
    #[must_use]
    pub fn with_sequence(&self, sequence: u64) -> Self {
        Self {
            t: self.t.clone(),
            s: Some(sequence),
            d: self.d.clone(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.s {
            Some(s) => write!(f, "GatewayMessage(t={}, s={s})", self.t),
            None => write!(f, "GatewayMessage(t={})", self.t),
        }
    }
}

/// Client -> server message: `{"event": "<kind>", "data": <payload>}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientEvent {
    /// Event kind used as the routing key
    pub event: String,

    /// Opaque payload, decoded by the handler for `event`
    #[serde(default)]
    pub data: Value,
}

impl ClientEvent {
    #[must_use]
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
