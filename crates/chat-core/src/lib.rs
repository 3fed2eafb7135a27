//! # chat-core
//!
//! Domain layer containing user identities, presence state, stored records and the
//! collaborator traits the presence engine talks to.
//! This crate has zero dependencies on infrastructure (storage, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{ChatMessage, ParticipantStatus, PresenceState, Stored, UserIdentity, RECORD_ID_FIELD};
pub use error::DomainError;
pub use traits::{
    Collection, EventPublisher, MessageRepository, ParticipantRepository, RepoResult,
    UserRepository,
};
pub use value_objects::{RecordId, UnknownUserPolicy, UserId, UserIdParseError};
