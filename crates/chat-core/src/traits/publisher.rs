//! Server push port

use serde_json::Value;

/// Pushes a server event to every live client connection
///
/// Delivery is best-effort and never blocks; the return value is the number
/// of connections the event was handed to.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: &str, data: Value) -> usize;
}
