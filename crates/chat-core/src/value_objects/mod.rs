//! Value objects - immutable types that represent domain concepts

mod policy;
mod record_id;
mod user_id;

pub use policy::UnknownUserPolicy;
pub use record_id::RecordId;
pub use user_id::{UserId, UserIdParseError};
