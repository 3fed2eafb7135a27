//! Stored record - a collaborator record together with its assigned identifier

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DomainError;
use crate::value_objects::RecordId;

/// JSON field carrying the identifier a collection assigns on append
pub const RECORD_ID_FIELD: &str = "_id";

/// A record as returned by a collection: the appended value plus its `_id`
///
/// Serializes flat, so a stored participant status looks like
/// `{"_id": 3, "id": "alice", "status": "away"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Stored<T> {
    pub fn new(id: RecordId, record: T) -> Self {
        Self { id, record }
    }

    /// Discard the identifier and keep the record
    pub fn into_record(self) -> T {
        self.record
    }
}

/// Records are JSON objects that must not claim the collection-assigned field
pub(crate) fn object_record(value: Value, kind: &str) -> Result<Map<String, Value>, DomainError> {
    let Value::Object(map) = value else {
        return Err(DomainError::ValidationError(format!("{kind} must be a JSON object")));
    };
    check_reserved(&map, kind)?;
    Ok(map)
}

pub(crate) fn check_reserved(map: &Map<String, Value>, kind: &str) -> Result<(), DomainError> {
    if map.contains_key(RECORD_ID_FIELD) {
        return Err(DomainError::ValidationError(format!(
            "{kind} must not set `{RECORD_ID_FIELD}`, it is assigned on append"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_record_rejects_non_objects() {
        assert!(object_record(json!([1, 2]), "record").is_err());
        assert!(object_record(json!("text"), "record").is_err());
        assert!(object_record(json!({"a": 1}), "record").is_ok());
    }

    #[test]
    fn test_object_record_rejects_reserved_field() {
        let err = object_record(json!({"_id": 1}), "chat message").unwrap_err();
        assert!(err.is_validation());
    }
}
