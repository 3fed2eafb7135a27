//! Traits (ports) implemented outside the domain layer

mod publisher;
mod repositories;

pub use publisher::EventPublisher;
pub use repositories::{
    Collection, MessageRepository, ParticipantRepository, RepoResult, UserRepository,
};
