//! Message repository port (write side).
//!
//! Covers both message stores: the live private chat store and the global
//! store shared by language, teacher and support rooms. Archived messages
//! are written by an external archival process and only removed here.

use crate::domain::chat::{ChatMessage, GlobalMessage, RoomId};
use crate::domain::foundation::{DomainError, MessageId};
use async_trait::async_trait;
use serde::Serialize;

/// Rows removed by a room purge, per store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeCounts {
    pub chats_deleted: u64,
    pub archived_chats_deleted: u64,
}

/// Repository port for message persistence.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a private chat message.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn append_chat(&self, message: &ChatMessage) -> Result<(), DomainError>;

    /// Append a global or support message.
    async fn append_global(&self, message: &GlobalMessage) -> Result<(), DomainError>;

    /// Delete a private message.
    ///
    /// Returns the room the message belonged to, or `None` if it did not exist.
    async fn delete_chat(&self, id: &MessageId) -> Result<Option<RoomId>, DomainError>;

    /// Delete a global-store message.
    ///
    /// When `room` is given, only a message in that room is deleted.
    /// Returns the message's room, or `None` if nothing matched.
    async fn delete_global(
        &self,
        id: &MessageId,
        room: Option<&RoomId>,
    ) -> Result<Option<RoomId>, DomainError>;

    /// Mark every message in `room` not sent by `reader_email` as read.
    ///
    /// Returns the number of messages changed.
    async fn mark_room_read(&self, room: &RoomId, reader_email: &str) -> Result<u64, DomainError>;

    /// Delete every live and archived private message in `room`.
    async fn purge_room(&self, room: &RoomId) -> Result<PurgeCounts, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn MessageRepository) {}
    }

    #[test]
    fn purge_counts_serialize_camel_case() {
        let json = serde_json::to_value(PurgeCounts {
            chats_deleted: 3,
            archived_chats_deleted: 7,
        })
        .unwrap();
        assert_eq!(json["chatsDeleted"], 3);
        assert_eq!(json["archivedChatsDeleted"], 7);
    }
}
