//! Stored chat messages and the draft they are composed from.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MessageId, Timestamp, ValidationError};

use super::room::RoomId;

const MAX_BODY_LEN: usize = 10_000;

/// Which store and which broadcast events a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageStream {
    /// Room-scoped chat, stored in the live chat store.
    Private,
    /// Language/role room chat, stored in the global store.
    Global,
    /// Support room chat, stored in the global store.
    Support,
}

impl MessageStream {
    /// Wire name of the inbound event that creates messages on this stream.
    pub fn event_name(&self) -> &'static str {
        match self {
            MessageStream::Private => "chat",
            MessageStream::Global => "globalChat",
            MessageStream::Support => "supportChat",
        }
    }
}

/// Validated sender input for a new message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub sender_name: String,
    pub sender_email: String,
    pub avatar_url: Option<String>,
    pub room: RoomId,
    pub body: String,
    pub attachment_url: Option<String>,
}

impl MessageDraft {
    pub fn new(
        sender_name: impl Into<String>,
        sender_email: impl Into<String>,
        room: RoomId,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sender_name: sender_name.into(),
            sender_email: sender_email.into(),
            avatar_url: None,
            room,
            body: body.into(),
            attachment_url: None,
        }
    }

    /// Attaches a file URL; blank URLs are treated as absent.
    pub fn with_attachment(mut self, url: Option<String>) -> Self {
        self.attachment_url = url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn with_avatar(mut self, url: Option<String>) -> Self {
        self.avatar_url = url.filter(|u| !u.trim().is_empty());
        self
    }

    /// Moves the draft to another room (support messages are always
    /// rerouted to the support room).
    pub fn in_room(mut self, room: RoomId) -> Self {
        self.room = room;
        self
    }

    /// Checks sender identity and that there is something to send.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sender_name.trim().is_empty() {
            return Err(ValidationError::empty_field("username"));
        }
        if self.sender_email.trim().is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if self.body.trim().is_empty() && self.attachment_url.is_none() {
            return Err(ValidationError::empty_field("message"));
        }
        if self.body.len() > MAX_BODY_LEN {
            return Err(ValidationError::out_of_range(
                "message",
                0,
                MAX_BODY_LEN as i64,
                self.body.len() as i64,
            ));
        }
        Ok(())
    }
}

/// A private, room-scoped chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    #[serde(rename = "username")]
    pub sender_name: String,
    #[serde(rename = "email")]
    pub sender_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub room: RoomId,
    #[serde(rename = "message")]
    pub body: String,
    #[serde(rename = "userUrl", default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    pub unread: bool,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// Builds an unread message with a server-assigned id and timestamp.
    pub fn compose(draft: MessageDraft) -> Result<Self, ValidationError> {
        draft.validate()?;
        Ok(Self {
            id: MessageId::new(),
            sender_name: draft.sender_name,
            sender_email: draft.sender_email,
            avatar_url: draft.avatar_url,
            room: draft.room,
            body: draft.body,
            attachment_url: draft.attachment_url,
            unread: true,
            timestamp: Timestamp::now(),
        })
    }

    pub fn is_file(&self) -> bool {
        self.attachment_url.is_some()
    }
}

/// A message posted to a global (language, teacher or support) room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalMessage {
    pub id: MessageId,
    #[serde(rename = "username")]
    pub sender_name: String,
    #[serde(rename = "email")]
    pub sender_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub room: RoomId,
    #[serde(rename = "message")]
    pub body: String,
    #[serde(rename = "userUrl", default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    #[serde(rename = "userRole", default, skip_serializing_if = "Option::is_none")]
    pub sender_role: Option<String>,
    /// Informational only; per-user state lives in the counter records.
    pub unread_count: i32,
    pub timestamp: Timestamp,
}

impl GlobalMessage {
    pub fn compose(draft: MessageDraft, sender_role: Option<String>) -> Result<Self, ValidationError> {
        draft.validate()?;
        Ok(Self {
            id: MessageId::new(),
            sender_name: draft.sender_name,
            sender_email: draft.sender_email,
            avatar_url: draft.avatar_url,
            room: draft.room,
            body: draft.body,
            attachment_url: draft.attachment_url,
            sender_role: sender_role.filter(|r| !r.trim().is_empty()),
            unread_count: 0,
            timestamp: Timestamp::now(),
        })
    }
}

/// Write-once historical copy of a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedChatMessage {
    pub id: MessageId,
    #[serde(rename = "username")]
    pub sender_name: String,
    #[serde(rename = "email")]
    pub sender_email: String,
    pub room: RoomId,
    #[serde(rename = "message")]
    pub body: String,
    pub timestamp: Timestamp,
    pub archived_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(body: &str) -> MessageDraft {
        MessageDraft::new("Ana", "ana@example.com", RoomId::new("uuid-english").unwrap(), body)
    }

    #[test]
    fn compose_assigns_id_and_marks_unread() {
        let msg = ChatMessage::compose(draft("hola")).unwrap();
        assert!(msg.unread);
        assert_eq!(msg.body, "hola");
        assert!(!msg.is_file());
    }

    #[test]
    fn blank_body_requires_attachment() {
        assert_eq!(
            ChatMessage::compose(draft("  ")),
            Err(ValidationError::empty_field("message"))
        );

        let with_file = draft("").with_attachment(Some("https://files/x.png".to_string()));
        assert!(ChatMessage::compose(with_file).unwrap().is_file());
    }

    #[test]
    fn blank_attachment_is_dropped() {
        let d = draft("hi").with_attachment(Some(" ".to_string()));
        assert!(d.attachment_url.is_none());
    }

    #[test]
    fn missing_sender_email_is_rejected() {
        let d = MessageDraft::new("Ana", "", RoomId::new("r").unwrap(), "hi");
        assert_eq!(d.validate(), Err(ValidationError::empty_field("email")));
    }

    #[test]
    fn oversized_body_is_rejected() {
        let d = draft(&"a".repeat(MAX_BODY_LEN + 1));
        assert!(matches!(d.validate(), Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn chat_message_uses_wire_field_names() {
        let msg = ChatMessage::compose(
            draft("hi").with_attachment(Some("https://files/a.pdf".to_string())),
        )
        .unwrap();
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["username"], "Ana");
        assert_eq!(json["email"], "ana@example.com");
        assert_eq!(json["message"], "hi");
        assert_eq!(json["userUrl"], "https://files/a.pdf");
        assert_eq!(json["unread"], true);
        assert!(json.get("avatarUrl").is_none());
    }

    #[test]
    fn global_message_carries_role_and_zero_count() {
        let msg = GlobalMessage::compose(draft("hi"), Some("teacher".to_string())).unwrap();
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["userRole"], "teacher");
        assert_eq!(json["unreadCount"], 0);
    }

    #[test]
    fn stream_event_names_match_wire_names() {
        assert_eq!(MessageStream::Support.event_name(), "supportChat");
        assert_eq!(MessageStream::Global.event_name(), "globalChat");
    }
}
