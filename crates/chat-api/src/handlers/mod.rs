//! Route handlers
//!
//! One module per collection.

pub mod health;
pub mod messages;
pub mod participants;
pub mod users;
