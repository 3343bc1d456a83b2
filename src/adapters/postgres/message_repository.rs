//! PostgreSQL implementation of MessageRepository.
//!
//! Writes to the `chats`, `global_chats` and `archived_chats` tables.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::chat::{ChatMessage, GlobalMessage, RoomId};
use crate::domain::foundation::{DomainError, ErrorCode, MessageId};
use crate::ports::{MessageRepository, PurgeCounts};

/// PostgreSQL implementation of MessageRepository.
#[derive(Clone)]
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn append_chat(&self, message: &ChatMessage) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO chats (
                id, username, email, avatar_url, room, message, user_url, unread, timestamp
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(&message.sender_name)
        .bind(&message.sender_email)
        .bind(&message.avatar_url)
        .bind(message.room.as_str())
        .bind(&message.body)
        .bind(&message.attachment_url)
        .bind(message.unread)
        .bind(message.timestamp.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert chat", e))?;

        Ok(())
    }

    async fn append_global(&self, message: &GlobalMessage) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO global_chats (
                id, username, email, avatar_url, room, message, user_url,
                user_role, unread_count, timestamp
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(&message.sender_name)
        .bind(&message.sender_email)
        .bind(&message.avatar_url)
        .bind(message.room.as_str())
        .bind(&message.body)
        .bind(&message.attachment_url)
        .bind(&message.sender_role)
        .bind(message.unread_count)
        .bind(message.timestamp.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert global chat", e))?;

        Ok(())
    }

    async fn delete_chat(&self, id: &MessageId) -> Result<Option<RoomId>, DomainError> {
        let room: Option<String> =
            sqlx::query_scalar("DELETE FROM chats WHERE id = $1 RETURNING room")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to delete chat", e))?;

        room.map(stored_room).transpose()
    }

    async fn delete_global(
        &self,
        id: &MessageId,
        room: Option<&RoomId>,
    ) -> Result<Option<RoomId>, DomainError> {
        let deleted: Option<String> = sqlx::query_scalar(
            r#"
            DELETE FROM global_chats
            WHERE id = $1 AND ($2::text IS NULL OR room = $2)
            RETURNING room
            "#,
        )
        .bind(id.as_uuid())
        .bind(room.map(RoomId::as_str))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to delete global chat", e))?;

        deleted.map(stored_room).transpose()
    }

    async fn mark_room_read(&self, room: &RoomId, reader_email: &str) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE chats SET unread = FALSE WHERE room = $1 AND email <> $2 AND unread",
        )
        .bind(room.as_str())
        .bind(reader_email)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to mark chats read", e))?;

        Ok(result.rows_affected())
    }

    async fn purge_room(&self, room: &RoomId) -> Result<PurgeCounts, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin purge", e))?;

        let chats = sqlx::query("DELETE FROM chats WHERE room = $1")
            .bind(room.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to purge chats", e))?;

        let archived = sqlx::query("DELETE FROM archived_chats WHERE room = $1")
            .bind(room.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to purge archived chats", e))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit purge", e))?;

        Ok(PurgeCounts {
            chats_deleted: chats.rows_affected(),
            archived_chats_deleted: archived.rows_affected(),
        })
    }
}

fn stored_room(raw: String) -> Result<RoomId, DomainError> {
    RoomId::new(raw).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid room in storage: {}", e),
        )
    })
}
