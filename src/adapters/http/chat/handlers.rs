//! HTTP handlers for the chat retrieval API.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::{
    DeleteMessageCommand, DeleteMessageHandler, MarkRoomReadCommand, MarkRoomReadHandler,
    PresenceCommand, PresenceHandler, PurgeRoomHandler, ResetCounterCommand, RoomMessagesHandler,
    RoomSummaryHandler, RoomSummaryQuery, UnreadCounterEngine,
};
use crate::domain::chat::{ChatError, MessageStream};
use crate::domain::foundation::{MessageId, UserId};

use super::dto::{
    ArchivedMessagesQuery, DeleteMessageResponse, ErrorResponse, MarkRoomReadRequest,
    MarkRoomReadResponse, PresenceRequest, PresenceResponse, PurgeRoomResponse,
    ResetCounterRequest, RoomSummaryParams,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChatHandlers {
    messages: Arc<RoomMessagesHandler>,
    delete_handler: Arc<DeleteMessageHandler>,
    mark_read_handler: Arc<MarkRoomReadHandler>,
    counters: Arc<UnreadCounterEngine>,
    purge_handler: Arc<PurgeRoomHandler>,
    summary_handler: Arc<RoomSummaryHandler>,
    presence_handler: Arc<PresenceHandler>,
}

impl ChatHandlers {
    pub fn new(
        messages: Arc<RoomMessagesHandler>,
        delete_handler: Arc<DeleteMessageHandler>,
        mark_read_handler: Arc<MarkRoomReadHandler>,
        counters: Arc<UnreadCounterEngine>,
        purge_handler: Arc<PurgeRoomHandler>,
        summary_handler: Arc<RoomSummaryHandler>,
        presence_handler: Arc<PresenceHandler>,
    ) -> Self {
        Self {
            messages,
            delete_handler,
            mark_read_handler,
            counters,
            purge_handler,
            summary_handler,
            presence_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Messages
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/chat/messages/:room - Latest private messages
pub async fn get_room_messages(
    State(handlers): State<ChatHandlers>,
    Path(room): Path<String>,
) -> Response {
    match handlers.messages.latest_chats(&room).await {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(e) => handle_chat_error(e),
    }
}

/// GET /api/chat/global-chats/:room - Latest global messages
pub async fn get_global_messages(
    State(handlers): State<ChatHandlers>,
    Path(room): Path<String>,
) -> Response {
    match handlers.messages.latest_global(&room).await {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(e) => handle_chat_error(e),
    }
}

/// GET /api/chat/message/:id - One private message
pub async fn get_chat_message(
    State(handlers): State<ChatHandlers>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_message_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.messages.chat_by_id(&id).await {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(e) => handle_chat_error(e),
    }
}

/// GET /api/chat/global-chat/:id - One global message
pub async fn get_global_message(
    State(handlers): State<ChatHandlers>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_message_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.messages.global_by_id(&id).await {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(e) => handle_chat_error(e),
    }
}

/// DELETE /api/chat/delete-normal-chat/:id - Delete a private message
pub async fn delete_normal_chat(
    State(handlers): State<ChatHandlers>,
    Path(id): Path<String>,
) -> Response {
    delete_message(&handlers, MessageStream::Private, &id).await
}

/// DELETE /api/chat/delete-global-chat/:id - Delete a global message
pub async fn delete_global_chat(
    State(handlers): State<ChatHandlers>,
    Path(id): Path<String>,
) -> Response {
    delete_message(&handlers, MessageStream::Global, &id).await
}

async fn delete_message(handlers: &ChatHandlers, stream: MessageStream, id: &str) -> Response {
    let message_id = match parse_message_id(id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .delete_handler
        .handle(DeleteMessageCommand { stream, message_id })
        .await
    {
        Ok(result) => {
            let response = DeleteMessageResponse {
                message: "Message deleted successfully".to_string(),
                message_id: result.message_id,
                room: result.room,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_chat_error(e),
    }
}

/// PATCH /api/chat/read-chat - Mark a room read for a reader
pub async fn mark_room_read(
    State(handlers): State<ChatHandlers>,
    Json(req): Json<MarkRoomReadRequest>,
) -> Response {
    let cmd = MarkRoomReadCommand {
        room: req.room,
        email: req.email,
    };

    match handlers.mark_read_handler.handle(cmd).await {
        Ok(updated) => {
            let response = MarkRoomReadResponse {
                message: "Chats marked as read".to_string(),
                updated,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_chat_error(e),
    }
}

/// GET /api/chat/archived-messages/:room?page=N - Archived page (1-based)
pub async fn get_archived_messages(
    State(handlers): State<ChatHandlers>,
    Path(room): Path<String>,
    Query(query): Query<ArchivedMessagesQuery>,
) -> Response {
    let page = query.page.unwrap_or(1);

    match handlers.messages.archived(&room, page).await {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(e) => handle_chat_error(e),
    }
}

/// DELETE /api/chat/delete-chats-by-student/:room - Purge a room's history
pub async fn purge_room(
    State(handlers): State<ChatHandlers>,
    Path(room): Path<String>,
) -> Response {
    match handlers.purge_handler.handle(&room).await {
        Ok(counts) => (StatusCode::OK, Json(PurgeRoomResponse::from(counts))).into_response(),
        Err(e) => handle_chat_error(e),
    }
}

/// GET /api/chat/teacher-summary?rooms=a,b&email=e - Multi-room inbox summary
pub async fn get_room_summary(
    State(handlers): State<ChatHandlers>,
    Query(params): Query<RoomSummaryParams>,
) -> Response {
    let query = RoomSummaryQuery {
        rooms: params.room_list(),
        viewer_email: params.email,
    };

    match handlers.summary_handler.handle(query).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => handle_chat_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Unread counters
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/chat/unread-global-messages/:user_id - Full counter record
pub async fn get_unread_counters(
    State(handlers): State<ChatHandlers>,
    Path(user_id): Path<String>,
) -> Response {
    match handlers.counters.get_record(&user_id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => handle_chat_error(e),
    }
}

/// POST /api/chat/unread-global-messages/:user_id - Create a counter record
pub async fn create_unread_counters(
    State(handlers): State<ChatHandlers>,
    Path(user_id): Path<String>,
) -> Response {
    match handlers.counters.create_for_user(&user_id).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => handle_chat_error(e),
    }
}

/// DELETE /api/chat/unread-global-messages/:user_id - Delete a counter record
pub async fn delete_unread_counters(
    State(handlers): State<ChatHandlers>,
    Path(user_id): Path<String>,
) -> Response {
    match handlers.counters.delete_for_user(&user_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_chat_error(e),
    }
}

/// PATCH /api/chat/delete-unread-global-messages - Reset one counter
pub async fn reset_unread_counter(
    State(handlers): State<ChatHandlers>,
    Json(req): Json<ResetCounterRequest>,
) -> Response {
    let cmd = ResetCounterCommand {
        user_id: req.user_id,
        room: req.room,
    };

    match handlers.counters.reset_counter(cmd).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => handle_chat_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Presence
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/presence - Broadcast a user's online state
pub async fn notify_presence(
    State(handlers): State<ChatHandlers>,
    Json(req): Json<PresenceRequest>,
) -> Response {
    let user_id = match req.user_id.parse::<UserId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid user ID")),
            )
                .into_response()
        }
    };

    let cmd = PresenceCommand {
        user_id,
        name: req.name,
        status: req.online,
    };

    match handlers.presence_handler.notify(cmd).await {
        Ok(delivered) => (StatusCode::OK, Json(PresenceResponse { delivered })).into_response(),
        Err(e) => handle_chat_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_message_id(raw: &str) -> Result<MessageId, Response> {
    raw.parse::<MessageId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid message ID")),
        )
            .into_response()
    })
}

fn handle_chat_error(error: ChatError) -> Response {
    let status = match &error {
        ChatError::Validation { .. } => StatusCode::BAD_REQUEST,
        ChatError::MessageNotFound(_) | ChatError::UserNotFound(_) => StatusCode::NOT_FOUND,
        ChatError::StorageUnavailable(detail) => {
            tracing::error!(error = %detail, "chat storage failure");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (status, Json(ErrorResponse::from(&error))).into_response()
}
