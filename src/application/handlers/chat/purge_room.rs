//! PurgeRoomHandler - Deletes a room's live and archived history.

use std::sync::Arc;

use crate::domain::chat::{ChatError, RoomId};
use crate::ports::{MessageRepository, PurgeCounts};

pub struct PurgeRoomHandler {
    messages: Arc<dyn MessageRepository>,
}

impl PurgeRoomHandler {
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }

    pub async fn handle(&self, room: &str) -> Result<PurgeCounts, ChatError> {
        let room = RoomId::new(room)?;
        let counts = self.messages.purge_room(&room).await?;

        tracing::info!(
            room = %room,
            chats_deleted = counts.chats_deleted,
            archived_chats_deleted = counts.archived_chats_deleted,
            "room history purged"
        );
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryChatStore;
    use crate::domain::chat::{ChatMessage, MessageDraft};

    #[tokio::test]
    async fn reports_counts_from_store() {
        let store = Arc::new(InMemoryChatStore::new());
        let msg = ChatMessage::compose(MessageDraft::new(
            "A",
            "a@x",
            RoomId::new("student-room").unwrap(),
            "bye",
        ))
        .unwrap();
        store.append_chat(&msg).await.unwrap();

        let counts = PurgeRoomHandler::new(store.clone())
            .handle("student-room")
            .await
            .unwrap();

        assert_eq!(counts.chats_deleted, 1);
        assert_eq!(counts.archived_chats_deleted, 0);
        assert_eq!(store.chat_count(), 0);
    }

    #[tokio::test]
    async fn blank_room_is_rejected() {
        let handler = PurgeRoomHandler::new(Arc::new(InMemoryChatStore::new()));
        assert!(matches!(handler.handle("").await, Err(ChatError::Validation { .. })));
    }
}
