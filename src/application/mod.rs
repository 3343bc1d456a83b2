//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Write paths (routing, deletion, counters) and read paths (retrieval,
//! summary) live in separate handlers.

pub mod handlers;

pub use handlers::{
    DeleteMessageCommand, DeleteMessageHandler, DeleteMessageResult, MarkRoomReadCommand,
    MarkRoomReadHandler, MessageRouter, PresenceCommand, PresenceHandler, PurgeRoomHandler,
    ResetCounterCommand, RoomMessagesHandler, RoomSummaryHandler, RoomSummaryQuery,
    RouteOutcome, RouterEvent, UnreadCounterEngine,
};
