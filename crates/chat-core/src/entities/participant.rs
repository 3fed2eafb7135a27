//! Participant status - an opaque status payload recorded for a user

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record::object_record;
use crate::error::DomainError;
use crate::value_objects::UserId;

/// A `statusChange` payload, stored exactly as the client sent it
///
/// The only structural requirement is an `id` naming the user; everything else
/// (`status`, custom fields) is opaque. The log is append-only, so the current
/// status of a user is the most recently appended record carrying their id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ParticipantStatus {
    user_id: UserId,
    payload: Map<String, Value>,
}

impl ParticipantStatus {
    /// Validate a raw payload
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        Self::try_from(object_record(value, "participant status")?)
    }

    /// User this status belongs to
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The `status` field, if present
    pub fn status(&self) -> Option<&Value> {
        self.payload.get("status")
    }

    /// The payload exactly as received
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }
}

impl TryFrom<Map<String, Value>> for ParticipantStatus {
    type Error = DomainError;

    fn try_from(payload: Map<String, Value>) -> Result<Self, Self::Error> {
        let raw_id = payload.get("id").ok_or_else(|| {
            DomainError::ValidationError("participant status is missing `id`".to_string())
        })?;
        let user_id = UserId::from_json(raw_id)
            .map_err(|e| DomainError::ValidationError(format!("invalid participant id: {e}")))?;

        Ok(Self { user_id, payload })
    }
}

impl From<ParticipantStatus> for Map<String, Value> {
    fn from(status: ParticipantStatus) -> Self {
        status.payload
    }
}

impl From<ParticipantStatus> for Value {
    fn from(status: ParticipantStatus) -> Self {
        Value::Object(status.payload)
    }
}
