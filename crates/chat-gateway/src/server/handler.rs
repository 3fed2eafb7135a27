//! WebSocket handler
//!
//! Runs one connection: a reader feeding the hub, a writer draining the
//! outbound queue, and a watchdog for liveness and eviction.

use crate::connection::Connection;
use crate::protocol::{GatewayMessage, HelloPayload};
use crate::server::{GatewayState, HeartbeatConfig};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

/// Why a connection ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// Client sent a close frame or ended the stream
    ClientClosed,
    /// Client sent a binary frame
    UnsupportedFrame,
    /// Read or write on the socket failed
    TransportError,
    /// Nothing received within the heartbeat timeout
    HeartbeatTimeout,
    /// Removed by the registry after a failed delivery
    Evicted,
    /// A connection task panicked or was cancelled
    TaskFailed,
}

impl DisconnectReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClientClosed => "client_closed",
            Self::UnsupportedFrame => "unsupported_frame",
            Self::TransportError => "transport_error",
            Self::HeartbeatTimeout => "heartbeat_timeout",
            Self::Evicted => "evicted",
            Self::TaskFailed => "task_failed",
        }
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let hub = Arc::clone(state.hub());
    let heartbeat = state.heartbeat();

    let heartbeat_interval_ms = u64::try_from(heartbeat.interval.as_millis()).unwrap_or(u64::MAX);
    let (connection, rx) = hub.connect_with_greeting(|id| {
        GatewayMessage::hello(&HelloPayload {
            connection_id: id.to_string(),
            heartbeat_interval_ms,
        })
    });
    let connection_id = connection.id();

    let (ws_sink, ws_stream) = socket.split();

    let mut recv_task = tokio::spawn({
        let hub = Arc::clone(&hub);
        let connection = Arc::clone(&connection);
        async move { read_loop(&hub, &connection, ws_stream).await }
    });
    let mut send_task = tokio::spawn(write_loop(ws_sink, rx, heartbeat));
    let mut watchdog_task = tokio::spawn({
        let connection = Arc::clone(&connection);
        async move { watchdog(&connection, heartbeat).await }
    });

    let (reason, reader_done) = tokio::select! {
        result = &mut recv_task => (result.unwrap_or(DisconnectReason::TaskFailed), true),
        result = &mut send_task => (result.unwrap_or(DisconnectReason::TaskFailed), false),
        result = &mut watchdog_task => (result.unwrap_or(DisconnectReason::TaskFailed), false),
    };

    recv_task.abort();
    send_task.abort();
    watchdog_task.abort();

    // The reader may still be dispatching on another worker; presence is
    // released only once it has stopped
    if !reader_done {
        let _ = recv_task.await;
    }

    hub.disconnect(&connection);

    tracing::info!(
        connection_id = %connection_id,
        user_id = ?connection.user(),
        reason = %reason,
        age_ms = u64::try_from(connection.age().as_millis()).unwrap_or(u64::MAX),
        "WebSocket connection closed"
    );
}

/// Feed inbound frames to the hub until the client goes away
async fn read_loop(
    hub: &crate::ChatHub,
    connection: &Connection,
    mut ws_stream: SplitStream<WebSocket>,
) -> DisconnectReason {
    while let Some(msg) = ws_stream.next().await {
        connection.touch();

        match msg {
            Ok(Message::Text(text)) => {
                // Rejections are answered and logged by the hub
                let _ = hub.handle_text(connection, &text).await;
            }
            Ok(Message::Binary(_)) => {
                tracing::debug!(
                    connection_id = %connection.id(),
                    "Binary messages not supported"
                );
                return DisconnectReason::UnsupportedFrame;
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                // Pong replies are sent automatically
                tracing::trace!(connection_id = %connection.id(), "Ping/Pong received");
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(connection_id = %connection.id(), "Client closed connection");
                return DisconnectReason::ClientClosed;
            }
            Err(e) => {
                tracing::warn!(
                    connection_id = %connection.id(),
                    error = %e,
                    "WebSocket error"
                );
                return DisconnectReason::TransportError;
            }
        }
    }

    DisconnectReason::ClientClosed
}

/// Drain the outbound queue onto the socket and ping on every heartbeat tick
async fn write_loop(
    mut ws_sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<GatewayMessage>,
    heartbeat: HeartbeatConfig,
) -> DisconnectReason {
    let mut ping = interval(heartbeat.interval);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ping.tick().await;

    let reason = loop {
        tokio::select! {
            msg = rx.recv() => {
                let Some(msg) = msg else {
                    break DisconnectReason::Evicted;
                };
                match msg.to_json() {
                    Ok(json) => {
                        if ws_sink.send(Message::Text(json)).await.is_err() {
                            break DisconnectReason::TransportError;
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, event = %msg.t, "Failed to encode message");
                    }
                }
            }
            _ = ping.tick() => {
                if ws_sink.send(Message::Ping(Vec::new())).await.is_err() {
                    break DisconnectReason::TransportError;
                }
            }
        }
    };

    let _ = ws_sink.close().await;
    reason
}

/// Resolve when the connection is evicted or stays silent past the timeout
async fn watchdog(connection: &Connection, heartbeat: HeartbeatConfig) -> DisconnectReason {
    let period = heartbeat
        .interval
        .min(heartbeat.timeout / 2)
        .max(Duration::from_millis(1));
    let mut check = interval(period);
    check.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = connection.evicted() => {
                tracing::debug!(connection_id = %connection.id(), "Connection evicted");
                return DisconnectReason::Evicted;
            }
            _ = check.tick() => {
                let silent = connection.since_last_seen();
                if silent > heartbeat.timeout {
                    tracing::warn!(
                        connection_id = %connection.id(),
                        silent_ms = u64::try_from(silent.as_millis()).unwrap_or(u64::MAX),
                        "Connection timed out (no inbound frames)"
                    );
                    return DisconnectReason::HeartbeatTimeout;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnect_reason_display() {
        assert_eq!(DisconnectReason::HeartbeatTimeout.to_string(), "heartbeat_timeout");
        assert_eq!(DisconnectReason::Evicted.as_str(), "evicted");
    }

    #[tokio::test]
    async fn test_watchdog_observes_eviction() {
        let (tx, _rx) = mpsc::channel(1);
        let connection = Connection::new(tx);
        connection.evict();

        let reason = watchdog(&connection, HeartbeatConfig::default()).await;
        assert_eq!(reason, DisconnectReason::Evicted);
    }

    #[tokio::test]
    async fn test_watchdog_times_out_silent_connection() {
        let (tx, _rx) = mpsc::channel(1);
        let connection = Connection::new(tx);

        let reason = tokio::time::timeout(
            Duration::from_secs(2),
            watchdog(&connection, HeartbeatConfig::from_millis(10, 30)),
        )
        .await
        .expect("watchdog did not fire");
        assert_eq!(reason, DisconnectReason::HeartbeatTimeout);
    }
}
