//! HTTP routes for chat endpoints.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use super::handlers::{
    create_unread_counters, delete_global_chat, delete_normal_chat, delete_unread_counters,
    get_archived_messages, get_chat_message, get_global_message, get_global_messages,
    get_room_messages, get_room_summary, get_unread_counters, mark_room_read, notify_presence,
    purge_room, reset_unread_counter, ChatHandlers,
};

/// Creates the chat router, mounted under `/api/chat`.
pub fn chat_routes(handlers: ChatHandlers) -> Router {
    Router::new()
        .route("/messages/:room", get(get_room_messages))
        .route("/global-chats/:room", get(get_global_messages))
        .route("/message/:id", get(get_chat_message))
        .route("/global-chat/:id", get(get_global_message))
        .route("/delete-normal-chat/:id", delete(delete_normal_chat))
        .route("/delete-global-chat/:id", delete(delete_global_chat))
        .route("/read-chat", patch(mark_room_read))
        .route(
            "/unread-global-messages/:user_id",
            get(get_unread_counters)
                .post(create_unread_counters)
                .delete(delete_unread_counters),
        )
        .route("/delete-unread-global-messages", patch(reset_unread_counter))
        .route("/archived-messages/:room", get(get_archived_messages))
        .route("/delete-chats-by-student/:room", delete(purge_room))
        .route("/teacher-summary", get(get_room_summary))
        .with_state(handlers)
}

/// Creates the presence router, mounted under `/api`.
pub fn presence_routes(handlers: ChatHandlers) -> Router {
    Router::new()
        .route("/presence", post(notify_presence))
        .with_state(handlers)
}
