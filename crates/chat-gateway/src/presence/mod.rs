//! Ephemeral presence state

mod store;

pub use store::PresenceStore;
