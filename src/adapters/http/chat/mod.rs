//! HTTP adapter for chat endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ArchivedMessagesQuery, DeleteMessageResponse, ErrorResponse, MarkRoomReadRequest,
    MarkRoomReadResponse, PresenceRequest, PresenceResponse, PurgeRoomResponse,
    ResetCounterRequest, RoomSummaryParams,
};
pub use handlers::ChatHandlers;
pub use routes::{chat_routes, presence_routes};
