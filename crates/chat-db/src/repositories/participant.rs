//! In-memory implementation of ParticipantRepository

use async_trait::async_trait;
use tracing::instrument;

use chat_core::{Collection, ParticipantRepository, ParticipantStatus, RecordId, RepoResult, Stored, UserId};

use super::MemoryCollection;

/// Append-only participant status log
///
/// Every status change is a new record; nothing is updated in place.
#[derive(Debug, Default)]
pub struct MemoryParticipantRepository {
    statuses: MemoryCollection<ParticipantStatus>,
}

impl MemoryParticipantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

#[async_trait]
impl Collection<ParticipantStatus> for MemoryParticipantRepository {
    #[instrument(skip(self, status), fields(user_id = %status.user_id()))]
    async fn append(&self, status: ParticipantStatus) -> RepoResult<Stored<ParticipantStatus>> {
        let stored = self.statuses.append(status);
        tracing::debug!(record_id = %stored.id, "Participant status recorded");
        Ok(stored)
    }

    async fn list(&self) -> RepoResult<Vec<Stored<ParticipantStatus>>> {
        Ok(self.statuses.list())
    }

    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Stored<ParticipantStatus>>> {
        Ok(self.statuses.get(id))
    }
}

#[async_trait]
impl ParticipantRepository for MemoryParticipantRepository {
    async fn current_status(
        &self,
        user_id: &UserId,
    ) -> RepoResult<Option<Stored<ParticipantStatus>>> {
        Ok(self.statuses.find_last(|status| status.user_id() == user_id))
    }
}
