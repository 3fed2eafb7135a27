//! Event handlers
//!
//! Routes inbound client events to their handler by event kind.

mod error;
mod status;
mod typing;

pub use error::{EventError, HandlerResult};
pub use status::StatusHandler;
pub use typing::TypingHandler;

use crate::broadcast::BroadcastEngine;
use crate::connection::{BroadcastReport, Connection};
use crate::events::InboundEventType;
use crate::presence::PresenceStore;
use chat_core::{ParticipantRepository, RecordId, UnknownUserPolicy, UserRepository};
use serde_json::Value;
use std::sync::Arc;

/// What a dispatched event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Status appended to the participant log
    StatusRecorded(RecordId),
    /// Presence updated and the typer list pushed to every connection
    TypingBroadcast(BroadcastReport),
    /// Event kind has no route
    Ignored,
}

/// Routes client events to the presence engine and the participant log
pub struct EventDispatcher {
    store: Arc<PresenceStore>,
    engine: Arc<BroadcastEngine>,
    users: Arc<dyn UserRepository>,
    participants: Arc<dyn ParticipantRepository>,
    policy: UnknownUserPolicy,
}

impl EventDispatcher {
    pub fn new(
        store: Arc<PresenceStore>,
        engine: Arc<BroadcastEngine>,
        users: Arc<dyn UserRepository>,
        participants: Arc<dyn ParticipantRepository>,
        policy: UnknownUserPolicy,
    ) -> Self {
        Self {
            store,
            engine,
            users,
            participants,
            policy,
        }
    }

    /// Handle one inbound event from `connection`
    ///
    /// On error nothing was mutated and nothing was broadcast.
    pub async fn dispatch(
        &self,
        connection: &Connection,
        kind: &str,
        data: Value,
    ) -> HandlerResult<DispatchOutcome> {
        match InboundEventType::from_kind(kind) {
            Some(InboundEventType::StatusChange) => StatusHandler::handle(self, connection, data).await,
            Some(InboundEventType::TypingChange) => TypingHandler::handle(self, connection, &data).await,
            None => {
                tracing::debug!(
                    connection_id = %connection.id(),
                    event = %kind,
                    "Ignoring unrouted event"
                );
                Ok(DispatchOutcome::Ignored)
            }
        }
    }

    pub fn store(&self) -> &PresenceStore {
        &self.store
    }

    pub fn engine(&self) -> &BroadcastEngine {
        &self.engine
    }

    pub fn users(&self) -> &dyn UserRepository {
        self.users.as_ref()
    }

    pub fn participants(&self) -> &dyn ParticipantRepository {
        self.participants.as_ref()
    }

    pub fn policy(&self) -> UnknownUserPolicy {
        self.policy
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
