//! In-memory implementation of UserRepository

use async_trait::async_trait;
use tracing::instrument;

use chat_core::{Collection, DomainError, RecordId, RepoResult, Stored, UserId, UserIdentity, UserRepository};

use super::MemoryCollection;

/// User directory held in memory
///
/// User ids are unique; appending a second user with the same id is a conflict.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: MemoryCollection<UserIdentity>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl Collection<UserIdentity> for MemoryUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn append(&self, user: UserIdentity) -> RepoResult<Stored<UserIdentity>> {
        let user_id = user.id.clone();
        let stored = self.users.append_checked(user, |existing| {
            if existing.iter().any(|s| s.record.id == user_id) {
                Err(DomainError::UserAlreadyExists(user_id.clone()))
            } else {
                Ok(())
            }
        })?;

        tracing::debug!(record_id = %stored.id, "User added to directory");
        Ok(stored)
    }

    async fn list(&self) -> RepoResult<Vec<Stored<UserIdentity>>> {
        Ok(self.users.list())
    }

    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Stored<UserIdentity>>> {
        Ok(self.users.get(id))
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_user_id(&self, user_id: &UserId) -> RepoResult<Option<UserIdentity>> {
        Ok(self
            .users
            .find_first(|user| &user.id == user_id)
            .map(Stored::into_record))
    }
}
