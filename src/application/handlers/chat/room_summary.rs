//! RoomSummaryHandler - Teacher inbox: last message and unread count per room.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::chat::{ChatError, RoomId, RoomSummary};
use crate::domain::foundation::ValidationError;
use crate::ports::MessageReader;

/// Query for a multi-room summary as seen by `viewer_email`.
#[derive(Debug, Clone)]
pub struct RoomSummaryQuery {
    pub rooms: Vec<String>,
    pub viewer_email: String,
}

pub struct RoomSummaryHandler {
    reader: Arc<dyn MessageReader>,
    max_rooms: usize,
}

impl RoomSummaryHandler {
    pub fn new(reader: Arc<dyn MessageReader>, max_rooms: usize) -> Self {
        Self { reader, max_rooms }
    }

    pub async fn handle(&self, query: RoomSummaryQuery) -> Result<RoomSummary, ChatError> {
        let viewer_email = query.viewer_email.trim();
        if viewer_email.is_empty() {
            return Err(ValidationError::empty_field("email").into());
        }

        let rooms = query
            .rooms
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(RoomId::new)
            .collect::<Result<BTreeSet<_>, _>>()?;

        if rooms.is_empty() {
            return Ok(RoomSummary::default());
        }
        if rooms.len() > self.max_rooms {
            return Err(ValidationError::out_of_range(
                "rooms",
                1,
                self.max_rooms as i64,
                rooms.len() as i64,
            )
            .into());
        }

        let rooms: Vec<RoomId> = rooms.into_iter().collect();
        let summary = self.reader.summarize(&rooms, viewer_email).await?;

        tracing::debug!(
            requested = rooms.len(),
            with_messages = summary.last_messages.len(),
            "room summary computed"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryChatStore;
    use crate::domain::chat::{ChatMessage, MessageDraft};
    use crate::ports::MessageRepository;

    fn query(rooms: &[&str], email: &str) -> RoomSummaryQuery {
        RoomSummaryQuery {
            rooms: rooms.iter().map(|r| r.to_string()).collect(),
            viewer_email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn empty_room_list_returns_empty_summary() {
        let handler = RoomSummaryHandler::new(Arc::new(InMemoryChatStore::new()), 10);
        let summary = handler.handle(query(&[], "t@x")).await.unwrap();
        assert!(summary.is_empty());
    }

    #[tokio::test]
    async fn too_many_rooms_is_rejected() {
        let handler = RoomSummaryHandler::new(Arc::new(InMemoryChatStore::new()), 2);
        let result = handler.handle(query(&["a", "b", "c"], "t@x")).await;
        assert!(matches!(result, Err(ChatError::Validation { ref field, .. }) if field == "rooms"));
    }

    #[tokio::test]
    async fn duplicate_rooms_count_once_toward_limit() {
        let handler = RoomSummaryHandler::new(Arc::new(InMemoryChatStore::new()), 1);
        assert!(handler.handle(query(&["a", "a", " "], "t@x")).await.is_ok());
    }

    #[tokio::test]
    async fn missing_viewer_is_rejected() {
        let handler = RoomSummaryHandler::new(Arc::new(InMemoryChatStore::new()), 10);
        let result = handler.handle(query(&["a"], " ")).await;
        assert!(matches!(result, Err(ChatError::Validation { .. })));
    }

    #[tokio::test]
    async fn rooms_without_messages_are_absent() {
        let store = Arc::new(InMemoryChatStore::new());
        let room_a = RoomId::new("roomA").unwrap();
        let mut first =
            ChatMessage::compose(MessageDraft::new("S", "s@x", room_a.clone(), "t1")).unwrap();
        let mut second =
            ChatMessage::compose(MessageDraft::new("S", "s@x", room_a.clone(), "t2")).unwrap();
        first.timestamp = first.timestamp.plus_secs(-10);
        second.timestamp = second.timestamp.plus_secs(10);
        store.append_chat(&second).await.unwrap();
        store.append_chat(&first).await.unwrap();
        let handler = RoomSummaryHandler::new(store, 10);

        let summary = handler.handle(query(&["roomA", "roomB"], "t@x")).await.unwrap();

        assert_eq!(summary.last_messages.len(), 1);
        assert_eq!(summary.last_messages[&room_a].id, second.id);
        assert_eq!(summary.unread_counts[&room_a], 2);
        assert!(!summary.unread_counts.contains_key(&RoomId::new("roomB").unwrap()));
    }
}
