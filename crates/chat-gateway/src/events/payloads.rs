//! Inbound event payloads
//!
//! Payloads arrive as untyped JSON and are decoded with serde, so a rejection
//! carries serde's field-level message.

use chat_core::{UserId, UserIdentity};
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// User reference carried by a typing event
#[derive(Debug, Clone, PartialEq)]
pub enum UserRef {
    /// Full identity object as sent by the client
    Identity(UserIdentity),
    /// Bare identifier
    Id(UserId),
}

impl UserRef {
    #[must_use]
    pub fn id(&self) -> &UserId {
        match self {
            Self::Identity(identity) => &identity.id,
            Self::Id(id) => id,
        }
    }

    /// Identity to store when the directory has no entry for this user
    #[must_use]
    pub fn into_identity(self) -> UserIdentity {
        match self {
            Self::Identity(identity) => identity,
            Self::Id(id) => UserIdentity::new(id),
        }
    }
}

impl<'de> Deserialize<'de> for UserRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_object() {
            UserIdentity::from_value(value)
                .map(Self::Identity)
                .map_err(|e| de::Error::custom(format!("invalid `user`: {e}")))
        } else {
            UserId::from_json(&value)
                .map(Self::Id)
                .map_err(|e| de::Error::custom(format!("invalid `user`: {e}")))
        }
    }
}

/// `typingChange` payload: `{"user": <identity or id>?, "typing": bool}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypingChange {
    /// `None` means the connection's bound user
    #[serde(default)]
    pub user: Option<UserRef>,
    pub typing: bool,
}

impl TypingChange {
    /// Decode and validate a typing payload
    pub fn from_value(data: &Value) -> Result<Self, String> {
        Self::deserialize(data).map_err(|e| e.to_string())
    }
}
