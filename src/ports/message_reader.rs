//! Message reader port (read side / CQRS queries).
//!
//! Read paths for the chat UI: latest live messages, archived history
//! and the multi-room inbox summary.

use crate::domain::chat::{ArchivedChatMessage, ChatMessage, GlobalMessage, RoomId, RoomSummary};
use crate::domain::foundation::{DomainError, MessageId, ValidationError};
use async_trait::async_trait;

/// Reader port for message queries.
#[async_trait]
pub trait MessageReader: Send + Sync {
    /// Newest private messages in a room, newest first.
    async fn latest_chats(&self, room: &RoomId, limit: u32) -> Result<Vec<ChatMessage>, DomainError>;

    /// Newest global messages in a room, newest first.
    async fn latest_global(
        &self,
        room: &RoomId,
        limit: u32,
    ) -> Result<Vec<GlobalMessage>, DomainError>;

    /// Returns `None` if not found.
    async fn chat_by_id(&self, id: &MessageId) -> Result<Option<ChatMessage>, DomainError>;

    /// Returns `None` if not found.
    async fn global_by_id(&self, id: &MessageId) -> Result<Option<GlobalMessage>, DomainError>;

    /// One page of archived messages, newest first.
    async fn archived(
        &self,
        room: &RoomId,
        page: PageRequest,
    ) -> Result<Vec<ArchivedChatMessage>, DomainError>;

    /// Latest message and unread count for each room.
    ///
    /// Implementations must answer with a bounded number of bulk queries,
    /// independent of the number of rooms. Messages sent by `viewer_email`
    /// never count as unread.
    async fn summarize(&self, rooms: &[RoomId], viewer_email: &str) -> Result<RoomSummary, DomainError>;
}

/// 1-based offset pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::out_of_range("page", 1, i64::from(u32::MAX), 0));
        }
        if page_size == 0 {
            return Err(ValidationError::out_of_range("pageSize", 1, i64::from(u32::MAX), 0));
        }
        Ok(Self { page, page_size })
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}
