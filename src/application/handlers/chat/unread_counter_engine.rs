//! UnreadCounterEngine - Bulk increments and per-user counter maintenance.

use std::sync::Arc;

use crate::domain::chat::{ChatError, CounterField, Eligibility, RoomId, UnreadCounterRecord};
use crate::domain::foundation::{UserId, ValidationError};
use crate::ports::{UnreadCounterRepository, UserDirectory};

/// Command to zero one user's counter for the category of a room.
#[derive(Debug, Clone)]
pub struct ResetCounterCommand {
    pub user_id: String,
    pub room: String,
}

/// Decides which counters a new message bumps and keeps records in shape.
pub struct UnreadCounterEngine {
    counters: Arc<dyn UnreadCounterRepository>,
    directory: Arc<dyn UserDirectory>,
}

impl UnreadCounterEngine {
    pub fn new(
        counters: Arc<dyn UnreadCounterRepository>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            counters,
            directory,
        }
    }

    /// Counts a freshly stored global-store message against every eligible
    /// user except its sender.
    ///
    /// Unclassified rooms have no eligible users, so nothing is counted.
    pub async fn count_new_message(
        &self,
        room: &RoomId,
        sender_email: &str,
    ) -> Result<u64, ChatError> {
        let Some(category) = room.category() else {
            tracing::debug!(room = %room, "no counter strategy for room, skipping increment");
            return Ok(0);
        };

        self.bulk_increment(category.counter_field(), category.eligibility(), sender_email)
            .await
    }

    /// Adds one to `field` for every eligible user except `excluded_email`
    /// in a single storage operation.
    pub async fn bulk_increment(
        &self,
        field: CounterField,
        eligibility: Eligibility,
        excluded_email: &str,
    ) -> Result<u64, ChatError> {
        let rows = self
            .counters
            .bulk_increment(field, eligibility, excluded_email)
            .await?;

        tracing::debug!(field = %field, rows, "unread counters incremented");
        Ok(rows)
    }

    /// Zeroes the counter field the room maps to; unmapped rooms reset the
    /// catch-all field.
    pub async fn reset_counter(
        &self,
        cmd: ResetCounterCommand,
    ) -> Result<UnreadCounterRecord, ChatError> {
        let user_id = parse_user_id(&cmd.user_id)?;
        if cmd.room.trim().is_empty() {
            return Err(ValidationError::empty_field("room").into());
        }
        let room = RoomId::new(cmd.room)?;
        let field = CounterField::for_room(&room);

        if !self.counters.reset(&user_id, field).await? {
            return Err(ChatError::UserNotFound(user_id));
        }

        tracing::debug!(user_id = %user_id, room = %room, field = %field, "unread counter reset");

        self.counters
            .find(&user_id)
            .await?
            .ok_or(ChatError::UserNotFound(user_id))
    }

    /// Returns the user's full counter record.
    pub async fn get_record(&self, user_id: &str) -> Result<UnreadCounterRecord, ChatError> {
        let user_id = parse_user_id(user_id)?;
        self.counters
            .find(&user_id)
            .await?
            .ok_or(ChatError::UserNotFound(user_id))
    }

    /// Creates an all-zero record for a known user. Idempotent.
    pub async fn create_for_user(&self, user_id: &str) -> Result<UnreadCounterRecord, ChatError> {
        let user_id = parse_user_id(user_id)?;
        if self.directory.find_by_id(&user_id).await?.is_none() {
            return Err(ChatError::UserNotFound(user_id));
        }

        let record = self.counters.create(&user_id).await?;
        tracing::info!(user_id = %user_id, "unread counter record created");
        Ok(record)
    }

    /// Removes a user's record when the account goes away.
    pub async fn delete_for_user(&self, user_id: &str) -> Result<(), ChatError> {
        let user_id = parse_user_id(user_id)?;
        if !self.counters.delete(&user_id).await? {
            return Err(ChatError::UserNotFound(user_id));
        }

        tracing::info!(user_id = %user_id, "unread counter record deleted");
        Ok(())
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, ChatError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::empty_field("userId").into());
    }
    raw.parse()
        .map_err(|_| ValidationError::invalid_format("userId", "must be a UUID").into())
}
