//! # chat-db
//!
//! Storage layer implementing the collaborator traits of `chat-core` in memory.
//!
//! ## Overview
//!
//! The chat log, the user directory and the participant status log are plain
//! append/list collections that live for the lifetime of the process. This crate
//! provides:
//!
//! - A generic append-only [`MemoryCollection`]
//! - Repository implementations for users, participants and chat messages
//! - Loading of the user directory from a JSON fixture
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chat_db::{fixtures, MemoryUserRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let users = MemoryUserRepository::new();
//!     let loaded = fixtures::load_users("fixtures/users.json", &users).await?;
//!     println!("{loaded} users");
//!     Ok(())
//! }
//! ```

pub mod fixtures;
pub mod repositories;

// Re-export commonly used types
pub use fixtures::{load_users, FixtureError};
pub use repositories::{
    MemoryCollection, MemoryMessageRepository, MemoryParticipantRepository, MemoryUserRepository,
};
