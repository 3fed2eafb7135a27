//! Repository traits (ports) - define the interface for the record collaborators
//!
//! The chat log, the user directory and the participant status log are plain
//! append/list collections. The domain layer defines what it needs, and the
//! infrastructure layer provides the implementation.

use async_trait::async_trait;

use crate::entities::{ChatMessage, ParticipantStatus, Stored, UserIdentity};
use crate::error::DomainError;
use crate::value_objects::{RecordId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Generic collection
// ============================================================================

#[async_trait]
pub trait Collection<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Assign an identifier, store the record and return its stored form
    async fn append(&self, record: T) -> RepoResult<Stored<T>>;

    /// All records in append order
    async fn list(&self) -> RepoResult<Vec<Stored<T>>>;

    /// Find a record by its assigned identifier
    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Stored<T>>>;
}

// ============================================================================
// User Directory
// ============================================================================

#[async_trait]
pub trait UserRepository: Collection<UserIdentity> {
    /// Find a user by user id (not record id)
    async fn find_by_user_id(&self, user_id: &UserId) -> RepoResult<Option<UserIdentity>>;
}

// ============================================================================
// Participant Status Log
// ============================================================================

#[async_trait]
pub trait ParticipantRepository: Collection<ParticipantStatus> {
    /// Most recently appended status record for a user
    async fn current_status(
        &self,
        user_id: &UserId,
    ) -> RepoResult<Option<Stored<ParticipantStatus>>>;
}

// ============================================================================
// Chat Log
// ============================================================================

pub trait MessageRepository: Collection<ChatMessage> {}
