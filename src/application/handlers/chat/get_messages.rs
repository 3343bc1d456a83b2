//! RoomMessagesHandler - Retrieval queries over live and archived messages.

use std::sync::Arc;

use crate::domain::chat::{ArchivedChatMessage, ChatError, ChatMessage, GlobalMessage, RoomId};
use crate::domain::foundation::MessageId;
use crate::ports::{MessageReader, PageRequest};

/// Read-side handler for the chat UI.
pub struct RoomMessagesHandler {
    reader: Arc<dyn MessageReader>,
    live_window: u32,
    archive_page_size: u32,
}

impl RoomMessagesHandler {
    pub fn new(reader: Arc<dyn MessageReader>, live_window: u32, archive_page_size: u32) -> Self {
        Self {
            reader,
            live_window,
            archive_page_size,
        }
    }

    /// The live window of private messages, newest first.
    pub async fn latest_chats(&self, room: &str) -> Result<Vec<ChatMessage>, ChatError> {
        let room = RoomId::new(room)?;
        Ok(self.reader.latest_chats(&room, self.live_window).await?)
    }

    /// The live window of global messages, newest first.
    pub async fn latest_global(&self, room: &str) -> Result<Vec<GlobalMessage>, ChatError> {
        let room = RoomId::new(room)?;
        Ok(self.reader.latest_global(&room, self.live_window).await?)
    }

    pub async fn chat_by_id(&self, id: &MessageId) -> Result<ChatMessage, ChatError> {
        self.reader
            .chat_by_id(id)
            .await?
            .ok_or(ChatError::MessageNotFound(*id))
    }

    pub async fn global_by_id(&self, id: &MessageId) -> Result<GlobalMessage, ChatError> {
        self.reader
            .global_by_id(id)
            .await?
            .ok_or(ChatError::MessageNotFound(*id))
    }

    /// One 1-based page of archived messages.
    pub async fn archived(
        &self,
        room: &str,
        page: u32,
    ) -> Result<Vec<ArchivedChatMessage>, ChatError> {
        let room = RoomId::new(room)?;
        let page = PageRequest::new(page, self.archive_page_size)?;
        Ok(self.reader.archived(&room, page).await?)
    }
}
