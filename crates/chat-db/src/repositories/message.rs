//! In-memory implementation of MessageRepository

use async_trait::async_trait;

use chat_core::{ChatMessage, Collection, MessageRepository, RecordId, RepoResult, Stored};

use super::MemoryCollection;

/// Chat log held in memory
#[derive(Debug, Default)]
pub struct MemoryMessageRepository {
    messages: MemoryCollection<ChatMessage>,
}

impl MemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Collection<ChatMessage> for MemoryMessageRepository {
    async fn append(&self, message: ChatMessage) -> RepoResult<Stored<ChatMessage>> {
        let stored = self.messages.append(message);
        tracing::trace!(record_id = %stored.id, "Chat message stored");
        Ok(stored)
    }

    async fn list(&self) -> RepoResult<Vec<Stored<ChatMessage>>> {
        Ok(self.messages.list())
    }

    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Stored<ChatMessage>>> {
        Ok(self.messages.get(id))
    }
}

impl MessageRepository for MemoryMessageRepository {}
