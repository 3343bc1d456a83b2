//! WebSocket message types for real-time chat.
//!
//! Every frame in either direction is `{"event": <name>, "data": <payload>}`:
//! - Client → Server: join, signaling relay, chat sends, deletions
//! - Server → Client: ready, relay, full messages, unread notices, deletions, presence

use serde::{Deserialize, Serialize};

use crate::application::handlers::RouterEvent;
use crate::domain::chat::{
    ChatMessage, GlobalMessage, MessageDraft, MessageStream, PresenceStatus, RoomEvent, RoomId,
};
use crate::domain::foundation::{MessageId, UserId, ValidationError};

// ============================================
// Server → Client Messages
// ============================================

/// All events that can be sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A participant joined the recipient's room.
    Ready { username: String },

    /// Signaling payload relayed verbatim.
    Data(serde_json::Value),

    Chat(ChatMessage),

    NewChat { room: RoomId },

    GlobalChat(GlobalMessage),

    NewUnreadGlobalMessage { room: RoomId },

    SupportChat(GlobalMessage),

    NewUnreadSupportMessage { room: RoomId },

    #[serde(rename_all = "camelCase")]
    GlobalChatDeleted { message_id: MessageId },

    #[serde(rename_all = "camelCase")]
    NormalChatDeleted { message_id: MessageId },

    #[serde(rename_all = "camelCase")]
    SupportChatDeleted { message_id: MessageId },

    UserStatus {
        id: UserId,
        online: PresenceStatus,
        name: String,
    },
}

impl ServerEvent {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<RoomEvent> for ServerEvent {
    fn from(event: RoomEvent) -> Self {
        match event {
            RoomEvent::Chat(message) => ServerEvent::Chat(message),
            RoomEvent::NewChat { room } => ServerEvent::NewChat { room },
            RoomEvent::GlobalChat(message) => ServerEvent::GlobalChat(message),
            RoomEvent::NewUnreadGlobalMessage { room } => ServerEvent::NewUnreadGlobalMessage { room },
            RoomEvent::SupportChat(message) => ServerEvent::SupportChat(message),
            RoomEvent::NewUnreadSupportMessage { room } => {
                ServerEvent::NewUnreadSupportMessage { room }
            }
            RoomEvent::MessageDeleted { stream, message_id } => match stream {
                MessageStream::Private => ServerEvent::NormalChatDeleted { message_id },
                MessageStream::Global => ServerEvent::GlobalChatDeleted { message_id },
                MessageStream::Support => ServerEvent::SupportChatDeleted { message_id },
            },
            RoomEvent::UserStatus { id, online, name } => ServerEvent::UserStatus { id, online, name },
        }
    }
}

// ============================================
// Client → Server Messages
// ============================================

/// All events that can be received from client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    Join(JoinPayload),

    /// Signaling passthrough; see [`SignalRoute`].
    Data(serde_json::Value),

    Chat(ChatPayload),

    GlobalChat(ChatPayload),

    SupportChat(SupportChatPayload),

    DeleteGlobalChat(DeletePayload),

    DeleteNormalChat(DeletePayload),

    DeleteSupportChat(DeletePayload),
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinPayload {
    pub username: String,
    pub room: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    pub username: String,
    pub email: String,
    pub room: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_url: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportChatPayload {
    pub username: String,
    pub email: String,
    /// Ignored; support messages always go to the support room.
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_role: Option<String>,
    #[serde(default)]
    pub user_url: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePayload {
    pub message_id: MessageId,
    /// Informational; the notice goes to the room the store reports.
    #[serde(default)]
    pub room: Option<String>,
}

impl ChatPayload {
    fn into_draft(self) -> Result<MessageDraft, ValidationError> {
        let room = RoomId::new(self.room)?;
        Ok(MessageDraft::new(self.username, self.email, room, self.message)
            .with_attachment(self.user_url)
            .with_avatar(self.avatar_url))
    }
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Join(_) => "join",
            ClientEvent::Data(_) => "data",
            ClientEvent::Chat(_) => "chat",
            ClientEvent::GlobalChat(_) => "globalChat",
            ClientEvent::SupportChat(_) => "supportChat",
            ClientEvent::DeleteGlobalChat(_) => "deleteGlobalChat",
            ClientEvent::DeleteNormalChat(_) => "deleteNormalChat",
            ClientEvent::DeleteSupportChat(_) => "deleteSupportChat",
        }
    }

    /// Converts a chat or delete event into its router form.
    ///
    /// Returns `Ok(None)` for `join` and `data`, which the connection
    /// registry handles itself.
    pub fn into_router_event(self) -> Result<Option<RouterEvent>, ValidationError> {
        let event = match self {
            ClientEvent::Join(_) | ClientEvent::Data(_) => return Ok(None),
            ClientEvent::Chat(payload) => RouterEvent::Chat(payload.into_draft()?),
            ClientEvent::GlobalChat(payload) => RouterEvent::GlobalChat(payload.into_draft()?),
            ClientEvent::SupportChat(payload) => {
                let draft = MessageDraft::new(
                    payload.username,
                    payload.email,
                    RoomId::support(),
                    payload.message,
                )
                .with_attachment(payload.user_url)
                .with_avatar(payload.avatar_url);
                RouterEvent::SupportChat {
                    draft,
                    sender_role: payload.user_role,
                }
            }
            ClientEvent::DeleteGlobalChat(payload) => RouterEvent::Delete {
                stream: MessageStream::Global,
                message_id: payload.message_id,
            },
            ClientEvent::DeleteNormalChat(payload) => RouterEvent::Delete {
                stream: MessageStream::Private,
                message_id: payload.message_id,
            },
            ClientEvent::DeleteSupportChat(payload) => RouterEvent::Delete {
                stream: MessageStream::Support,
                message_id: payload.message_id,
            },
        };
        Ok(Some(event))
    }
}

// ============================================
// Signaling
// ============================================

/// Signaling message types that are relayed to other room members.
const SIGNAL_TYPES: [&str; 3] = ["offer", "answer", "candidate"];

/// Routing fields extracted from a `data` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalRoute {
    pub room: RoomId,
}

impl SignalRoute {
    /// Reads `type` and `room` from a signaling payload.
    ///
    /// Returns `None` for unknown types or a missing room; those payloads
    /// are not relayed.
    pub fn from_payload(payload: &serde_json::Value) -> Option<Self> {
        let kind = payload.get("type")?.as_str()?;
        if !SIGNAL_TYPES.contains(&kind) {
            return None;
        }
        let room = RoomId::new(payload.get("room")?.as_str()?).ok()?;
        Some(Self { room })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_join_event() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"join","data":{"username":"ana","room":"r1"}}"#)
                .unwrap();
        match event {
            ClientEvent::Join(payload) => {
                assert_eq!(payload.username, "ana");
                assert_eq!(payload.room, "r1");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn chat_event_becomes_draft_with_attachment() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "chat",
            "data": {
                "username": "ana",
                "email": "ana@x",
                "room": "r1",
                "message": "",
                "userUrl": "https://files/doc.pdf"
            }
        }))
        .unwrap();

        match event.into_router_event().unwrap() {
            Some(RouterEvent::Chat(draft)) => {
                assert_eq!(draft.attachment_url.as_deref(), Some("https://files/doc.pdf"));
                assert!(draft.validate().is_ok());
            }
            other => panic!("unexpected router event: {:?}", other),
        }
    }

    #[test]
    fn support_chat_ignores_caller_room() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "supportChat",
            "data": {
                "username": "ana",
                "email": "ana@x",
                "room": "uuid-english",
                "message": "help",
                "userRole": "user"
            }
        }))
        .unwrap();

        match event.into_router_event().unwrap() {
            Some(RouterEvent::SupportChat { draft, sender_role }) => {
                assert_eq!(draft.room, RoomId::support());
                assert_eq!(sender_role.as_deref(), Some("user"));
            }
            other => panic!("unexpected router event: {:?}", other),
        }
    }

    #[test]
    fn delete_event_carries_message_id() {
        let id = MessageId::new();
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "deleteNormalChat",
            "data": { "messageId": id.to_string() }
        }))
        .unwrap();

        match event.into_router_event().unwrap() {
            Some(RouterEvent::Delete { stream, message_id }) => {
                assert_eq!(stream, MessageStream::Private);
                assert_eq!(message_id, id);
            }
            other => panic!("unexpected router event: {:?}", other),
        }
    }

    #[test]
    fn blank_room_fails_conversion() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "globalChat",
            "data": { "username": "a", "email": "a@x", "room": "", "message": "hi" }
        }))
        .unwrap();
        assert!(event.into_router_event().is_err());
    }

    #[test]
    fn unknown_event_is_rejected() {
        let result = serde_json::from_str::<ClientEvent>(r#"{"event":"shout","data":{}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn server_events_use_event_data_envelope() {
        let json = ServerEvent::Ready {
            username: "ana".to_string(),
        }
        .to_json()
        .unwrap();
        assert_eq!(json, r#"{"event":"ready","data":{"username":"ana"}}"#);
    }

    #[test]
    fn deletion_event_uses_camel_case_id() {
        let id = MessageId::new();
        let event = ServerEvent::from(RoomEvent::MessageDeleted {
            stream: MessageStream::Support,
            message_id: id,
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "supportChatDeleted");
        assert_eq!(value["data"]["messageId"], id.to_string());
    }

    #[test]
    fn user_status_serializes_online_flag() {
        let id = UserId::new();
        let value = serde_json::to_value(ServerEvent::UserStatus {
            id,
            online: PresenceStatus::Online,
            name: "Ana".to_string(),
        })
        .unwrap();
        assert_eq!(value["event"], "userStatus");
        assert_eq!(value["data"]["online"], "online");
        assert_eq!(value["data"]["id"], id.to_string());
    }

    #[test]
    fn signal_route_accepts_known_types_only() {
        let offer = json!({"type": "offer", "room": "r1", "sdp": "v=0"});
        assert_eq!(
            SignalRoute::from_payload(&offer),
            Some(SignalRoute {
                room: RoomId::new("r1").unwrap()
            })
        );
        assert_eq!(SignalRoute::from_payload(&json!({"type": "bye", "room": "r1"})), None);
        assert_eq!(SignalRoute::from_payload(&json!({"type": "answer"})), None);
    }
}
