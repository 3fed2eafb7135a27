//! Broadcast engine
//!
//! Turns presence changes and server events into fan-outs over the registry.

use crate::connection::{BroadcastReport, ConnectionRegistry};
use crate::events::OutboundEventType;
use crate::presence::PresenceStore;
use crate::protocol::GatewayMessage;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Fans presence snapshots and server events out to every connection
///
/// Snapshot and fan-out run under one gate, so broadcasts are totally ordered
/// and the last `typing` push a connection receives reflects the latest state.
pub struct BroadcastEngine {
    store: Arc<PresenceStore>,
    registry: Arc<ConnectionRegistry>,
    gate: Mutex<()>,
}

impl BroadcastEngine {
    pub fn new(store: Arc<PresenceStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            store,
            registry,
            gate: Mutex::new(()),
        }
    }

    /// Push the full list of active typers to every connection
    pub fn on_presence_changed(&self) -> BroadcastReport {
        let _gate = self.gate.lock();

        let typers = self.store.active_typers();
        let count = typers.len();
        let data = serde_json::to_value(typers).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to encode typing snapshot");
            Value::Array(Vec::new())
        });

        let report = self
            .registry
            .broadcast_all(&GatewayMessage::event(OutboundEventType::Typing, data));

        tracing::debug!(
            typers = count,
            delivered = report.delivered,
            failed = report.failed.len(),
            "Typing state broadcast"
        );

        report
    }

    /// Push an arbitrary server event to every connection
    pub fn publish(&self, event: impl Into<String>, data: Value) -> BroadcastReport {
        let _gate = self.gate.lock();
        self.registry.broadcast_all(&GatewayMessage::event(event, data))
    }
}

impl std::fmt::Debug for BroadcastEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastEngine")
            .field("typers", &self.store.active_typers().len())
            .field("connections", &self.registry.connection_count())
            .finish()
    }
}
