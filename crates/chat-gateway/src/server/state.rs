//! Gateway state
//!
//! Application state for the WebSocket route.

use crate::hub::ChatHub;
use std::sync::Arc;
use std::time::Duration;

/// Transport liveness settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatConfig {
    /// How often the server pings each client
    pub interval: Duration,
    /// Silence after which a connection is dropped
    pub timeout: Duration,
}

impl HeartbeatConfig {
    #[must_use]
    pub fn from_millis(interval_ms: u64, timeout_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms.max(1)),
            timeout: Duration::from_millis(timeout_ms.max(1)),
        }
    }
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self::from_millis(30_000, 90_000)
    }
}

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    hub: Arc<ChatHub>,
    heartbeat: HeartbeatConfig,
}

impl GatewayState {
    pub fn new(hub: Arc<ChatHub>, heartbeat: HeartbeatConfig) -> Self {
        Self { hub, heartbeat }
    }

    pub fn hub(&self) -> &Arc<ChatHub> {
        &self.hub
    }

    pub fn heartbeat(&self) -> HeartbeatConfig {
        self.heartbeat
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("hub", &self.hub)
            .field("heartbeat", &self.heartbeat)
            .finish()
    }
}
