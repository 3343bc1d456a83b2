//! Events the messaging core fans out to connected clients.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MessageId, UserId};

use super::message::{ChatMessage, GlobalMessage, MessageStream};
use super::room::RoomId;

/// Online state carried by a presence update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Offline,
}

/// Outbound notification produced by the router or presence handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    Chat(ChatMessage),
    NewChat { room: RoomId },
    GlobalChat(GlobalMessage),
    NewUnreadGlobalMessage { room: RoomId },
    SupportChat(GlobalMessage),
    NewUnreadSupportMessage { room: RoomId },
    MessageDeleted { stream: MessageStream, message_id: MessageId },
    UserStatus { id: UserId, online: PresenceStatus, name: String },
}

impl RoomEvent {
    /// Full-payload event for a freshly stored global-store message.
    pub fn global_message(stream: MessageStream, message: GlobalMessage) -> Self {
        match stream {
            MessageStream::Support => RoomEvent::SupportChat(message),
            _ => RoomEvent::GlobalChat(message),
        }
    }

    /// Lightweight "something new in this room" notice.
    pub fn new_message_notice(stream: MessageStream, room: RoomId) -> Self {
        match stream {
            MessageStream::Private => RoomEvent::NewChat { room },
            MessageStream::Global => RoomEvent::NewUnreadGlobalMessage { room },
            MessageStream::Support => RoomEvent::NewUnreadSupportMessage { room },
        }
    }

    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            RoomEvent::Chat(_) => "chat",
            RoomEvent::NewChat { .. } => "newChat",
            RoomEvent::GlobalChat(_) => "globalChat",
            RoomEvent::NewUnreadGlobalMessage { .. } => "newUnreadGlobalMessage",
            RoomEvent::SupportChat(_) => "supportChat",
            RoomEvent::NewUnreadSupportMessage { .. } => "newUnreadSupportMessage",
            RoomEvent::MessageDeleted { stream, .. } => match stream {
                MessageStream::Private => "normalChatDeleted",
                MessageStream::Global => "globalChatDeleted",
                MessageStream::Support => "supportChatDeleted",
            },
            RoomEvent::UserStatus { .. } => "userStatus",
        }
    }
}
