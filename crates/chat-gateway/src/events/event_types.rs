//! Gateway event types
//!
//! Inbound kinds are the routing keys of client events; outbound kinds go in
//! the `t` field of server pushes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Client event kinds the dispatcher knows how to route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InboundEventType {
    /// Participant status change, recorded but never broadcast
    StatusChange,
    /// Typing indicator toggle
    TypingChange,
}

impl InboundEventType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StatusChange => "statusChange",
            Self::TypingChange => "typingChange",
        }
    }

    /// Resolve a wire event kind; `typing` is accepted as an alias of `typingChange`
    #[must_use]
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "statusChange" => Some(Self::StatusChange),
            "typingChange" | "typing" => Some(Self::TypingChange),
            _ => None,
        }
    }
}

impl fmt::Display for InboundEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server push kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutboundEventType {
    /// Greeting sent after the upgrade
    Hello,
    /// Ordered list of users currently typing
    Typing,
    /// Chat message created through the REST surface
    Message,
    /// Rejected client event, sent to the sender only
    Error,
}

impl OutboundEventType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hello => "hello",
            Self::Typing => "typing",
            Self::Message => "message",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for OutboundEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<OutboundEventType> for String {
    fn from(event: OutboundEventType) -> Self {
        event.as_str().to_string()
    }
}
