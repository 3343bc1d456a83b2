//! DeleteMessageHandler - Removes a single message and tells its room.

use std::sync::Arc;

use crate::domain::chat::{ChatError, MessageStream, RoomEvent, RoomId};
use crate::domain::foundation::MessageId;
use crate::ports::{MessageRepository, RoomBroadcaster};

/// Command to delete one message from the store its stream lives in.
#[derive(Debug, Clone)]
pub struct DeleteMessageCommand {
    pub stream: MessageStream,
    pub message_id: MessageId,
}

/// Result of a successful deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteMessageResult {
    pub message_id: MessageId,
    pub room: RoomId,
}

pub struct DeleteMessageHandler {
    messages: Arc<dyn MessageRepository>,
    broadcaster: Arc<dyn RoomBroadcaster>,
}

impl DeleteMessageHandler {
    pub fn new(messages: Arc<dyn MessageRepository>, broadcaster: Arc<dyn RoomBroadcaster>) -> Self {
        Self {
            messages,
            broadcaster,
        }
    }

    pub async fn handle(&self, cmd: DeleteMessageCommand) -> Result<DeleteMessageResult, ChatError> {
        // The store reports the room the message was in; the notice goes there only.
        let deleted = match cmd.stream {
            MessageStream::Private => self.messages.delete_chat(&cmd.message_id).await?,
            MessageStream::Global => self.messages.delete_global(&cmd.message_id, None).await?,
            MessageStream::Support => {
                self.messages
                    .delete_global(&cmd.message_id, Some(&RoomId::support()))
                    .await?
            }
        };

        let room = deleted.ok_or(ChatError::MessageNotFound(cmd.message_id))?;

        tracing::info!(message_id = %cmd.message_id, room = %room, "message deleted");

        self.broadcaster
            .to_room(
                &room,
                RoomEvent::MessageDeleted {
                    stream: cmd.stream,
                    message_id: cmd.message_id,
                },
            )
            .await;

        Ok(DeleteMessageResult {
            message_id: cmd.message_id,
            room,
        })
    }
}
