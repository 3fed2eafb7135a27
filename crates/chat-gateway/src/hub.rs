//! Chat hub
//!
//! The per-process service object that owns the presence engine. It is built
//! once at startup and shared as `Arc<ChatHub>` with every connection task.

use crate::broadcast::BroadcastEngine;
use crate::connection::{Connection, ConnectionId, ConnectionRegistry};
use crate::handlers::{DispatchOutcome, EventDispatcher, EventError, HandlerResult};
use crate::presence::PresenceStore;
use crate::protocol::{ClientEvent, GatewayMessage};
use chat_core::{EventPublisher, ParticipantRepository, UnknownUserPolicy, UserRepository};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Default outbound queue capacity per connection
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

/// Hub settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubConfig {
    /// How typing events for users missing from the directory are handled
    pub unknown_user_policy: UnknownUserPolicy,
    /// Capacity of each connection's outbound queue
    pub outbound_buffer: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            unknown_user_policy: UnknownUserPolicy::default(),
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}

/// Presence store, connection registry, broadcast engine and dispatcher
pub struct ChatHub {
    config: HubConfig,
    store: Arc<PresenceStore>,
    registry: Arc<ConnectionRegistry>,
    engine: Arc<BroadcastEngine>,
    dispatcher: EventDispatcher,
}

impl ChatHub {
    pub fn new(
        config: HubConfig,
        users: Arc<dyn UserRepository>,
        participants: Arc<dyn ParticipantRepository>,
    ) -> Self {
        let store = Arc::new(PresenceStore::new());
        let registry = ConnectionRegistry::new_shared();
        let engine = Arc::new(BroadcastEngine::new(Arc::clone(&store), Arc::clone(&registry)));
        let dispatcher = EventDispatcher::new(
            Arc::clone(&store),
            Arc::clone(&engine),
            users,
            participants,
            config.unknown_user_policy,
        );

        Self {
            config,
            store,
            registry,
            engine,
            dispatcher,
        }
    }

    #[must_use]
    pub fn new_shared(
        config: HubConfig,
        users: Arc<dyn UserRepository>,
        participants: Arc<dyn ParticipantRepository>,
    ) -> Arc<Self> {
        Arc::new(Self::new(config, users, participants))
    }

    /// Register a new connection and hand back the receiving end of its queue
    pub fn connect(&self) -> (Arc<Connection>, mpsc::Receiver<GatewayMessage>) {
        let (tx, rx) = mpsc::channel(self.config.outbound_buffer.max(1));
        let connection = self.registry.register(tx);
        self.log_connected(&connection);
        (connection, rx)
    }

    /// Like [`connect`](Self::connect), but queue `greeting` before the
    /// connection can receive any broadcast, so it always carries sequence 1
    pub fn connect_with_greeting<F>(
        &self,
        greeting: F,
    ) -> (Arc<Connection>, mpsc::Receiver<GatewayMessage>)
    where
        F: FnOnce(ConnectionId) -> GatewayMessage,
    {
        let (tx, rx) = mpsc::channel(self.config.outbound_buffer.max(1));
        let connection = Connection::new(tx);

        let message = greeting(connection.id());
        if let Err(e) = connection.push(&message) {
            tracing::warn!(
                connection_id = %connection.id(),
                error = %e,
                event = %message.t,
                "Failed to queue greeting"
            );
        }

        let connection = self.registry.insert(connection);
        self.log_connected(&connection);
        (connection, rx)
    }

    fn log_connected(&self, connection: &Connection) {
        tracing::info!(
            connection_id = %connection.id(),
            connections = self.registry.connection_count(),
            "Client connected"
        );
    }

    /// Unregister a connection and release its user's presence
    ///
    /// The connection may already be gone from the registry (evicted after a
    /// failed delivery, or swept); presence is released regardless. Returns
    /// whether this call removed it from the registry.
    pub fn disconnect(&self, connection: &Connection) -> bool {
        let removed = self.registry.unregister(&connection.id()).is_some();

        tracing::info!(
            connection_id = %connection.id(),
            user_id = ?connection.user(),
            evicted = connection.is_evicted(),
            connections = self.registry.connection_count(),
            "Client disconnected"
        );

        self.release_presence(connection);
        removed
    }

    /// Remove connections whose writer has gone away and release their presence
    pub fn sweep_closed_connections(&self) -> usize {
        let closed = self.registry.drain_closed_connections();
        for connection in &closed {
            self.release_presence(connection);
        }
        closed.len()
    }

    /// If the connection's user has no other live connection and was typing,
    /// set them to not typing and broadcast the typer list
    fn release_presence(&self, connection: &Connection) -> bool {
        let Some(user) = connection.user() else {
            return false;
        };

        let has_other_connection = !self.registry.connections_for_user(&user).is_empty();
        if has_other_connection || !self.store.clear_typing(&user) {
            return false;
        }

        tracing::debug!(user_id = %user, "Cleared typing state of departed user");
        self.engine.on_presence_changed();
        true
    }

    /// Route one decoded event
    pub async fn dispatch(
        &self,
        connection: &Connection,
        kind: &str,
        data: Value,
    ) -> HandlerResult<DispatchOutcome> {
        self.dispatcher.dispatch(connection, kind, data).await
    }

    /// Decode a text frame and dispatch it
    ///
    /// A rejected event is answered with an `error` message to `connection` only.
    pub async fn handle_text(
        &self,
        connection: &Connection,
        text: &str,
    ) -> HandlerResult<DispatchOutcome> {
        let (kind, result) = match ClientEvent::from_json(text) {
            Ok(event) => {
                let result = self.dispatch(connection, &event.event, event.data).await;
                (Some(event.event), result)
            }
            Err(e) => (None, Err(EventError::malformed("envelope", e.to_string()))),
        };

        if let Err(error) = &result {
            tracing::warn!(
                connection_id = %connection.id(),
                event = ?kind,
                code = error.code(),
                error = %error,
                "Rejected client event"
            );

            let reply = GatewayMessage::error(&error.to_payload(kind.as_deref()));
            if let Err(e) = connection.push(&reply) {
                tracing::debug!(
                    connection_id = %connection.id(),
                    error = %e,
                    "Could not queue error reply"
                );
            }
        }

        result
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn store(&self) -> &PresenceStore {
        &self.store
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &BroadcastEngine {
        &self.engine
    }

    pub fn connection_count(&self) -> usize {
        self.registry.connection_count()
    }
}

impl EventPublisher for ChatHub {
    fn publish(&self, event: &str, data: Value) -> usize {
        self.engine.publish(event, data).delivered
    }
}

impl std::fmt::Debug for ChatHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatHub")
            .field("config", &self.config)
            .field("connections", &self.registry.connection_count())
            .field("presence_entries", &self.store.len())
            .finish()
    }
}
