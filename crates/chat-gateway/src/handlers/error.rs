//! Handler error types

use crate::protocol::ErrorPayload;
use chat_core::{DomainError, UserId};
use thiserror::Error;

/// Rejection of an inbound event
///
/// When a handler returns one of these, nothing was mutated and nothing was broadcast.
#[derive(Debug, Error)]
pub enum EventError {
    /// Missing fields or wrong value types
    #[error("Malformed `{event}` event: {reason}")]
    Malformed { event: String, reason: String },

    /// Typing event for a user the directory does not know
    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    /// Event names a different user than the one bound to the connection
    #[error("Connection is bound to user {bound}, event names {claimed}")]
    UserMismatch { bound: UserId, claimed: UserId },

    /// Collaborator failure
    #[error("Repository error: {0}")]
    Repository(#[from] DomainError),
}

impl EventError {
    pub fn malformed(event: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            event: event.into(),
            reason: reason.into(),
        }
    }

    /// Machine-readable code sent in `error` replies
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "MALFORMED_EVENT",
            Self::UnknownUser(_) => "UNKNOWN_USER",
            Self::UserMismatch { .. } => "USER_MISMATCH",
            Self::Repository(e) => e.code(),
        }
    }

    /// Whether the client caused the rejection
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Repository(e) if !e.is_validation())
    }

    /// Payload of the `error` reply for this rejection
    pub fn to_payload(&self, event: Option<&str>) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            event: event.map(str::to_string),
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, EventError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let uid = UserId::parse("a").unwrap();
        assert_eq!(EventError::malformed("typingChange", "x").code(), "MALFORMED_EVENT");
        assert_eq!(EventError::UnknownUser(uid.clone()).code(), "UNKNOWN_USER");
        assert_eq!(
            EventError::Repository(DomainError::StorageError("down".into())).code(),
            "STORAGE_ERROR"
        );

        let err = EventError::UserMismatch {
            bound: uid,
            claimed: UserId::parse("b").unwrap(),
        };
        assert_eq!(err.code(), "USER_MISMATCH");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_payload() {
        let payload = EventError::malformed("statusChange", "missing `id`").to_payload(Some("statusChange"));
        assert_eq!(payload.code, "MALFORMED_EVENT");
        assert_eq!(payload.message, "Malformed `statusChange` event: missing `id`");
        assert_eq!(payload.event.as_deref(), Some("statusChange"));

        assert!(!EventError::Repository(DomainError::StorageError("down".into())).is_client_error());
    }
}
