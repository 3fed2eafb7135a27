//! Chat message - an entry of the chat log

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record::object_record;
use crate::error::DomainError;

/// A chat log entry; its fields are opaque to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatMessage(Map<String, Value>);

impl ChatMessage {
    /// Validate a raw payload (non-empty JSON object)
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        let map = object_record(value, "chat message")?;
        if map.is_empty() {
            return Err(DomainError::ValidationError(
                "chat message must not be empty".to_string(),
            ));
        }
        Ok(Self(map))
    }

    /// The `text` field, if present
    pub fn text(&self) -> Option<&str> {
        self.0.get("text").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        let msg = ChatMessage::from_value(json!({"text": "hi", "user": "alice"})).unwrap();
        assert_eq!(msg.text(), Some("hi"));
        assert_eq!(msg.fields().len(), 2);
    }

    #[test]
    fn test_rejects_empty_and_non_objects() {
        assert!(ChatMessage::from_value(json!({})).is_err());
        assert!(ChatMessage::from_value(json!("hi")).is_err());
        assert!(ChatMessage::from_value(json!({"_id": 4, "text": "x"})).is_err());
    }
}
