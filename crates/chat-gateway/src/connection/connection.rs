//! Individual WebSocket connection
//!
//! Represents one live client channel and its outbound queue.

use crate::protocol::GatewayMessage;
use chat_core::UserId;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Notify};
use uuid::Uuid;

/// Registry key of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a push could not be queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("outbound queue is full")]
    QueueFull,

    #[error("connection writer has gone away")]
    Closed,
}

/// A single WebSocket connection
pub struct Connection {
    id: ConnectionId,

    /// User bound on the first attributable event
    user: RwLock<Option<UserId>>,

    /// Outbound queue drained by the socket writer task
    sender: mpsc::Sender<GatewayMessage>,

    /// Last sequence number queued; the lock also orders concurrent pushes
    sequence: Mutex<u64>,

    /// Last inbound frame
    last_seen: Mutex<Instant>,

    evicted: AtomicBool,
    eviction: Notify,

    connected_at: Instant,
}

impl Connection {
    /// Create a new connection around its outbound queue
    pub fn new(sender: mpsc::Sender<GatewayMessage>) -> Arc<Self> {
        let now = Instant::now();
        Arc::new(Self {
            id: ConnectionId::new(),
            user: RwLock::new(None),
            sender,
            sequence: Mutex::new(0),
            last_seen: Mutex::new(now),
            evicted: AtomicBool::new(false),
            eviction: Notify::new(),
            connected_at: now,
        })
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// User bound to this connection, if any
    pub fn user(&self) -> Option<UserId> {
        self.user.read().clone()
    }

    /// Bind the connection to `user`
    ///
    /// Binding is fixed once set. Rebinding the same user is a no-op; a
    /// different user returns the already bound id as the error.
    pub fn bind_user(&self, user: &UserId) -> Result<(), UserId> {
        let mut bound = self.user.write();
        match bound.as_ref() {
            Some(existing) if existing == user => Ok(()),
            Some(existing) => Err(existing.clone()),
            None => {
                *bound = Some(user.clone());
                Ok(())
            }
        }
    }

    /// Queue a message without waiting, stamping it with the next sequence number
    pub fn push(&self, message: &GatewayMessage) -> Result<u64, DeliveryError> {
        let mut sequence = self.sequence.lock();
        let next = *sequence + 1;

        self.sender
            .try_send(message.with_sequence(next))
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => DeliveryError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
            })?;

        *sequence = next;
        Ok(next)
    }

    /// Last sequence number queued
    pub fn current_sequence(&self) -> u64 {
        *self.sequence.lock()
    }

    /// Record inbound activity
    pub fn touch(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    pub fn since_last_seen(&self) -> Duration {
        self.last_seen.lock().elapsed()
    }

    /// Connection age
    pub fn age(&self) -> Duration {
        self.connected_at.elapsed()
    }

    /// Ask the socket tasks to shut down
    pub fn evict(&self) {
        if !self.evicted.swap(true, Ordering::SeqCst) {
            self.eviction.notify_one();
        }
    }

    pub fn is_evicted(&self) -> bool {
        self.evicted.load(Ordering::SeqCst)
    }

    /// Resolves once `evict` has been called
    pub async fn evicted(&self) {
        if self.is_evicted() {
            return;
        }
        self.eviction.notified().await;
    }

    /// Check if the writer side of the queue is gone
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("user", &*self.user.read())
            .field("sequence", &*self.sequence.lock())
            .field("connected_at", &self.connected_at)
            .finish()
    }
}
