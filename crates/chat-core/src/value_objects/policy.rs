//! Policy for typing events that reference users missing from the directory

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the presence engine does with a typing event for an unknown user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownUserPolicy {
    /// Reject the event with an unknown-user error
    #[default]
    Reject,
    /// Accept the identity as sent by the client and create a presence entry for it
    AutoRegister,
}

impl UnknownUserPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::AutoRegister => "auto_register",
        }
    }
}

impl fmt::Display for UnknownUserPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UnknownUserPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "auto_register" | "auto-register" => Ok(Self::AutoRegister),
            other => Err(format!("unknown policy `{other}` (expected reject or auto_register)")),
        }
    }
}
