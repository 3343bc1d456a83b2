//! HTTP DTOs for chat endpoints.
//!
//! Message payloads reuse the domain types, which already serialize with
//! the wire field names (`username`, `message`, `userUrl`, ...).

use serde::{Deserialize, Serialize};

use crate::domain::chat::{ChatError, PresenceStatus, RoomId};
use crate::domain::foundation::MessageId;
use crate::ports::PurgeCounts;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `PATCH /read-chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkRoomReadRequest {
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub email: String,
}

/// Body of `PATCH /delete-unread-global-messages`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetCounterRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub room: String,
}

/// Query of `GET /archived-messages/:room`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchivedMessagesQuery {
    #[serde(default)]
    pub page: Option<u32>,
}

/// Query of `GET /teacher-summary`; `rooms` is comma-separated.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomSummaryParams {
    #[serde(default)]
    pub rooms: String,
    #[serde(default)]
    pub email: String,
}

impl RoomSummaryParams {
    pub fn room_list(&self) -> Vec<String> {
        self.rooms
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Body of `POST /api/presence`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRequest {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub online: PresenceStatus,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkRoomReadResponse {
    pub message: String,
    pub updated: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageResponse {
    pub message: String,
    pub message_id: MessageId,
    pub room: RoomId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeRoomResponse {
    pub message: String,
    pub chats_deleted: u64,
    pub archived_chats_deleted: u64,
}

impl From<PurgeCounts> for PurgeRoomResponse {
    fn from(counts: PurgeCounts) -> Self {
        Self {
            message: "Chats deleted successfully".to_string(),
            chats_deleted: counts.chats_deleted,
            archived_chats_deleted: counts.archived_chats_deleted,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PresenceResponse {
    pub delivered: usize,
}

/// Error body returned by every chat endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: "SERVICE_UNAVAILABLE".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&ChatError> for ErrorResponse {
    fn from(error: &ChatError) -> Self {
        match error {
            ChatError::Validation { field, .. } => ErrorResponse::bad_request(error.message())
                .with_details(serde_json::json!({ "field": field })),
            ChatError::MessageNotFound(_) | ChatError::UserNotFound(_) => {
                ErrorResponse::not_found(error.message())
            }
            // Storage details stay in the logs
            ChatError::StorageUnavailable(_) => {
                ErrorResponse::unavailable("Chat storage is temporarily unavailable")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_params_split_and_trim_rooms() {
        let params = RoomSummaryParams {
            rooms: " a, b ,,c ".to_string(),
            email: "t@x".to_string(),
        };
        assert_eq!(params.room_list(), vec!["a", "b", "c"]);
    }

    #[test]
    fn storage_errors_hide_driver_detail() {
        let error = ChatError::StorageUnavailable("connection refused on 10.0.0.3".to_string());
        let response = ErrorResponse::from(&error);
        assert_eq!(response.code, "SERVICE_UNAVAILABLE");
        assert!(!response.message.contains("10.0.0.3"));
    }

    #[test]
    fn validation_errors_name_the_field() {
        let response = ErrorResponse::from(&ChatError::validation("room", "Room is required"));
        assert_eq!(response.code, "BAD_REQUEST");
        assert_eq!(response.details, Some(serde_json::json!({"field": "room"})));
    }

    #[test]
    fn reset_request_reads_camel_case_user_id() {
        let req: ResetCounterRequest =
            serde_json::from_str(r#"{"userId":"abc","room":"uuid-english"}"#).unwrap();
        assert_eq!(req.user_id, "abc");
    }
}
