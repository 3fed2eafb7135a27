//! # chat-gateway
//!
//! Real-time presence engine and its WebSocket transport.
//!
//! Clients connect over WebSocket and send `statusChange` and `typingChange`
//! events. Typing changes update the in-memory presence store and push the
//! full list of active typers to every connection; status changes are only
//! appended to the participant log.

pub mod broadcast;
pub mod connection;
pub mod events;
pub mod handlers;
pub mod hub;
pub mod presence;
pub mod protocol;
pub mod server;

pub use broadcast::BroadcastEngine;
pub use connection::{BroadcastReport, Connection, ConnectionId, ConnectionRegistry};
pub use handlers::{DispatchOutcome, EventDispatcher, EventError};
pub use hub::{ChatHub, HubConfig};
pub use presence::PresenceStore;
pub use server::{create_app, run, run_server, Application};
