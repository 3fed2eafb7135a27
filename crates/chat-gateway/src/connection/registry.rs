//! Connection registry
//!
//! Tracks live connections in a `DashMap` so connect, disconnect and fan-out
//! never contend on one global lock.

use super::{Connection, ConnectionId, DeliveryError};
use crate::protocol::GatewayMessage;
use chat_core::UserId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outcome of one fan-out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections the message was queued for
    pub delivered: usize,
    /// Connections that failed delivery and were unregistered
    pub failed: Vec<ConnectionId>,
}

impl BroadcastReport {
    /// Total connections the fan-out attempted
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed.len()
    }
}

/// All currently connected clients
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, Arc<Connection>>,
}

impl ConnectionRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Create an empty registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection around its outbound queue
    pub fn register(&self, sender: mpsc::Sender<GatewayMessage>) -> Arc<Connection> {
        self.insert(Connection::new(sender))
    }

    /// Make an already built connection visible to broadcasts
    pub fn insert(&self, connection: Arc<Connection>) -> Arc<Connection> {
        self.connections.insert(connection.id(), Arc::clone(&connection));

        tracing::debug!(connection_id = %connection.id(), "Connection registered");

        connection
    }

    /// Remove a connection; unknown or already removed ids are a no-op
    pub fn unregister(&self, id: &ConnectionId) -> Option<Arc<Connection>> {
        let removed = self.connections.remove(id).map(|(_, connection)| connection);

        if removed.is_some() {
            tracing::debug!(connection_id = %id, "Connection unregistered");
        }

        removed
    }

    pub fn get(&self, id: &ConnectionId) -> Option<Arc<Connection>> {
        self.connections.get(id).map(|r| Arc::clone(r.value()))
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    /// Get the total number of registered connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Registered connections bound to `user`
    pub fn connections_for_user(&self, user: &UserId) -> Vec<Arc<Connection>> {
        self.connections
            .iter()
            .filter(|r| r.user().as_ref() == Some(user))
            .map(|r| Arc::clone(r.value()))
            .collect()
    }

    /// Queue `message` on every registered connection
    ///
    /// Pushes never wait. A connection whose queue is full or closed is
    /// unregistered and evicted; the others still receive the message.
    pub fn broadcast_all(&self, message: &GatewayMessage) -> BroadcastReport {
        // Snapshot first so no shard lock is held while pushing
        let targets: Vec<Arc<Connection>> = self
            .connections
            .iter()
            .map(|r| Arc::clone(r.value()))
            .collect();

        let mut report = BroadcastReport::default();

        for connection in targets {
            match connection.push(message) {
                Ok(_) => report.delivered += 1,
                Err(error) => {
                    log_delivery_failure(&connection, error);
                    report.failed.push(connection.id());
                }
            }
        }

        for id in &report.failed {
            if let Some(connection) = self.unregister(id) {
                connection.evict();
            }
        }

        tracing::trace!(
            event = %message.t,
            delivered = report.delivered,
            failed = report.failed.len(),
            "Broadcast to all connections"
        );

        report
    }

    /// Drop connections whose writer has gone away
    pub fn cleanup_closed_connections(&self) -> usize {
        self.drain_closed_connections().len()
    }

    /// Unregister and evict every connection whose writer has gone away,
    /// returning the removed connections
    pub fn drain_closed_connections(&self) -> Vec<Arc<Connection>> {
        let closed: Vec<ConnectionId> = self
            .connections
            .iter()
            .filter(|r| r.is_closed())
            .map(|r| *r.key())
            .collect();

        let removed: Vec<Arc<Connection>> = closed
            .iter()
            .filter_map(|id| self.unregister(id))
            .inspect(|connection| connection.evict())
            .collect();

        if !removed.is_empty() {
            tracing::info!(count = removed.len(), "Cleaned up closed connections");
        }

        removed
    }
}

fn log_delivery_failure(connection: &Connection, error: DeliveryError) {
    tracing::warn!(
        connection_id = %connection.id(),
        user_id = ?connection.user(),
        error = %error,
        "Dropping connection after failed delivery"
    );
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("connections", &self.connections.len())
            .finish()
    }
}
