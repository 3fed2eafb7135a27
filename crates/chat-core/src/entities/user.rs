//! User identity - an entry of the user directory

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record::check_reserved;
use crate::error::DomainError;
use crate::value_objects::UserId;

/// A directory user: identifier plus display attributes opaque to the presence engine
///
/// Serializes flat: `{"id": "alice", "name": "Alice", "avatar": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl UserIdentity {
    /// Create an identity with no display attributes
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            attributes: Map::new(),
        }
    }

    /// Builder-style display attribute
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Parse an identity from a JSON object with an `id` field
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        let Value::Object(mut map) = value else {
            return Err(DomainError::ValidationError(
                "user must be a JSON object".to_string(),
            ));
        };
        check_reserved(&map, "user")?;

        let raw_id = map
            .remove("id")
            .ok_or_else(|| DomainError::ValidationError("user is missing `id`".to_string()))?;
        let id = UserId::from_json(&raw_id)
            .map_err(|e| DomainError::ValidationError(format!("invalid user id: {e}")))?;

        Ok(Self { id, attributes: map })
    }

    /// Display name, if the directory provides one
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(Value::as_str)
    }
}
