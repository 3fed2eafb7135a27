//! Application state
//!
//! Holds the collaborators shared by every REST handler.

use std::sync::Arc;

use chat_core::{EventPublisher, MessageRepository, ParticipantRepository, UserRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserRepository>,
    participants: Arc<dyn ParticipantRepository>,
    /// Pushes realtime events to connected clients
    publisher: Arc<dyn EventPublisher>,
}

impl AppState {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        users: Arc<dyn UserRepository>,
        participants: Arc<dyn ParticipantRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            messages,
            users,
            participants,
            publisher,
        }
    }

    /// Chat message log
    pub fn messages(&self) -> &dyn MessageRepository {
        self.messages.as_ref()
    }

    /// User directory
    pub fn users(&self) -> &dyn UserRepository {
        self.users.as_ref()
    }

    /// Participant status log
    pub fn participants(&self) -> &dyn ParticipantRepository {
        self.participants.as_ref()
    }

    pub fn publisher(&self) -> &dyn EventPublisher {
        self.publisher.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
