//! MarkRoomReadHandler - Clears the unread flag on a reader's incoming messages.

use std::sync::Arc;

use crate::domain::chat::{ChatError, RoomId};
use crate::domain::foundation::ValidationError;
use crate::ports::MessageRepository;

/// Command to mark a room read on behalf of `email`.
#[derive(Debug, Clone)]
pub struct MarkRoomReadCommand {
    pub room: String,
    pub email: String,
}

pub struct MarkRoomReadHandler {
    messages: Arc<dyn MessageRepository>,
}

impl MarkRoomReadHandler {
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }

    /// Returns how many messages flipped to read. The reader's own messages
    /// are left as they are.
    pub async fn handle(&self, cmd: MarkRoomReadCommand) -> Result<u64, ChatError> {
        if cmd.room.trim().is_empty() {
            return Err(ValidationError::empty_field("room").into());
        }
        let email = cmd.email.trim();
        if email.is_empty() {
            return Err(ValidationError::empty_field("email").into());
        }
        let room = RoomId::new(cmd.room.as_str())?;

        let changed = self.messages.mark_room_read(&room, email).await?;
        tracing::debug!(room = %room, rows = changed, "room marked read");
        Ok(changed)
    }
}
