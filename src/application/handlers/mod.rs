//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod chat;

pub use chat::{
    // Commands and queries
    DeleteMessageCommand, MarkRoomReadCommand, PresenceCommand, ResetCounterCommand,
    RoomSummaryQuery, RouterEvent,
    // Handlers
    DeleteMessageHandler, MarkRoomReadHandler, MessageRouter, PresenceHandler, PurgeRoomHandler,
    RoomMessagesHandler, RoomSummaryHandler, UnreadCounterEngine,
    // Results
    DeleteMessageResult, RouteOutcome,
};
