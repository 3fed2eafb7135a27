//! Domain entities - identities, presence entries, and collaborator records

mod message;
mod participant;
mod presence;
mod record;
mod user;

pub use message::ChatMessage;
pub use participant::ParticipantStatus;
pub use presence::PresenceState;
pub use record::{Stored, RECORD_ID_FIELD};
pub use user::UserIdentity;
