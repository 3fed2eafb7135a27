//! In-memory repository implementations

mod memory;
mod message;
mod participant;
mod user;

pub use memory::MemoryCollection;
pub use message::MemoryMessageRepository;
pub use participant::MemoryParticipantRepository;
pub use user::MemoryUserRepository;
