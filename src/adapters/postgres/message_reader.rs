//! PostgreSQL implementation of MessageReader.
//!
//! Read-side queries over the live, global and archive tables. The
//! multi-room summary is answered with two set-based queries regardless of
//! how many rooms are requested.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::chat::{
    ArchivedChatMessage, ChatMessage, GlobalMessage, LastMessage, RoomId, RoomSummary,
};
use crate::domain::foundation::{DomainError, MessageId, Timestamp};
use crate::ports::{MessageReader, PageRequest};

use super::rows::{
    row_to_archived, row_to_chat, row_to_global, ARCHIVED_COLUMNS, CHAT_COLUMNS, GLOBAL_COLUMNS,
};

/// PostgreSQL implementation of MessageReader.
#[derive(Clone)]
pub struct PostgresMessageReader {
    pool: PgPool,
}

impl PostgresMessageReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageReader for PostgresMessageReader {
    async fn latest_chats(&self, room: &RoomId, limit: u32) -> Result<Vec<ChatMessage>, DomainError> {
        let sql = format!(
            "SELECT {} FROM chats WHERE room = $1 ORDER BY timestamp DESC LIMIT $2",
            CHAT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(room.as_str())
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch chats", e))?;

        rows.into_iter().map(row_to_chat).collect()
    }

    async fn latest_global(
        &self,
        room: &RoomId,
        limit: u32,
    ) -> Result<Vec<GlobalMessage>, DomainError> {
        let sql = format!(
            "SELECT {} FROM global_chats WHERE room = $1 ORDER BY timestamp DESC LIMIT $2",
            GLOBAL_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(room.as_str())
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch global chats", e))?;

        rows.into_iter().map(row_to_global).collect()
    }

    async fn chat_by_id(&self, id: &MessageId) -> Result<Option<ChatMessage>, DomainError> {
        let sql = format!("SELECT {} FROM chats WHERE id = $1", CHAT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch chat", e))?;

        row.map(row_to_chat).transpose()
    }

    async fn global_by_id(&self, id: &MessageId) -> Result<Option<GlobalMessage>, DomainError> {
        let sql = format!("SELECT {} FROM global_chats WHERE id = $1", GLOBAL_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch global chat", e))?;

        row.map(row_to_global).transpose()
    }

    async fn archived(
        &self,
        room: &RoomId,
        page: PageRequest,
    ) -> Result<Vec<ArchivedChatMessage>, DomainError> {
        let sql = format!(
            "SELECT {} FROM archived_chats WHERE room = $1 \
             ORDER BY timestamp DESC LIMIT $2 OFFSET $3",
            ARCHIVED_COLUMNS
        );
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let rows = sqlx::query(&sql)
            .bind(room.as_str())
            .bind(i64::from(page.limit()))
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch archived chats", e))?;

        rows.into_iter().map(row_to_archived).collect()
    }

    async fn summarize(&self, rooms: &[RoomId], viewer_email: &str) -> Result<RoomSummary, DomainError> {
        let mut summary = RoomSummary::default();
        if rooms.is_empty() {
            return Ok(summary);
        }
        let room_keys: Vec<String> = rooms.iter().map(|r| r.as_str().to_string()).collect();

        let latest = sqlx::query(
            r#"
            SELECT DISTINCT ON (room)
                id, room, message, timestamp, username, email, user_url
            FROM chats
            WHERE room = ANY($1)
            ORDER BY room, timestamp DESC
            "#,
        )
        .bind(&room_keys)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch latest messages", e))?;

        for row in latest {
            let (room, last) = row_to_last_message(row)?;
            summary.last_messages.insert(room, last);
        }

        let counts = sqlx::query(
            r#"
            SELECT room, COUNT(*) AS unread
            FROM chats
            WHERE room = ANY($1) AND unread AND email <> $2
            GROUP BY room
            "#,
        )
        .bind(&room_keys)
        .bind(viewer_email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to count unread messages", e))?;

        for row in counts {
            let room: String = row
                .try_get("room")
                .map_err(|e| DomainError::database("Failed to get room", e))?;
            let unread: i64 = row
                .try_get("unread")
                .map_err(|e| DomainError::database("Failed to get unread", e))?;
            if let Ok(room) = RoomId::new(room) {
                summary.unread_counts.insert(room, unread);
            }
        }

        Ok(summary)
    }
}

fn row_to_last_message(row: sqlx::postgres::PgRow) -> Result<(RoomId, LastMessage), DomainError> {
    let field = |name: &str, e: sqlx::Error| DomainError::database(&format!("Failed to get {}", name), e);

    let id: Uuid = row.try_get("id").map_err(|e| field("id", e))?;
    let room: String = row.try_get("room").map_err(|e| field("room", e))?;
    let message: String = row.try_get("message").map_err(|e| field("message", e))?;
    let timestamp: DateTime<Utc> = row.try_get("timestamp").map_err(|e| field("timestamp", e))?;
    let username: String = row.try_get("username").map_err(|e| field("username", e))?;
    let email: String = row.try_get("email").map_err(|e| field("email", e))?;
    let attachment: Option<String> = row.try_get("user_url").map_err(|e| field("user_url", e))?;

    let room = RoomId::new(room).map_err(|e| DomainError::database("Invalid room in storage", e))?;
    Ok((
        room,
        LastMessage {
            id: MessageId::from_uuid(id),
            message,
            timestamp: Timestamp::from_datetime(timestamp),
            username,
            email,
            is_file: attachment.map_or(false, |url| !url.is_empty()),
        },
    ))
}
