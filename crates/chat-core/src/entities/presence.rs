//! Presence state - the ephemeral typing flag of one user

use serde::{Deserialize, Serialize};

use super::UserIdentity;

/// Latest known typing state of a user
///
/// Entries are overwritten, never deleted: an idle user is `typing == false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceState {
    pub user: UserIdentity,
    pub typing: bool,
}

impl PresenceState {
    pub fn new(user: UserIdentity, typing: bool) -> Self {
        Self { user, typing }
    }
}
