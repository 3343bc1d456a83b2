//! Inbox summary across many rooms.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MessageId, Timestamp};

use super::room::RoomId;

/// The newest message in a room, trimmed for inbox rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub id: MessageId,
    pub message: String,
    pub timestamp: Timestamp,
    pub username: String,
    pub email: String,
    pub is_file: bool,
}

/// Latest message and unread count per room.
///
/// Rooms without messages have no entry in either map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub last_messages: HashMap<RoomId, LastMessage>,
    pub unread_counts: HashMap<RoomId, i64>,
}

impl RoomSummary {
    pub fn is_empty(&self) -> bool {
        self.last_messages.is_empty() && self.unread_counts.is_empty()
    }
}
