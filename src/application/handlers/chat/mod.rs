//! Chat handlers.
//!
//! - `MessageRouter` - Inbound send/delete events: persist, broadcast, count
//! - `UnreadCounterEngine` - Bulk increments and counter record maintenance
//! - `DeleteMessageHandler` - Single message deletion with a room-scoped notice
//! - `RoomMessagesHandler` - Latest, by-id and archived message queries
//! - `MarkRoomReadHandler` - Clears unread flags for a reader
//! - `PurgeRoomHandler` - Removes a room's live and archived history
//! - `RoomSummaryHandler` - Multi-room inbox summary
//! - `PresenceHandler` - Online/offline announcements

mod delete_message;
mod get_messages;
mod mark_room_read;
mod message_router;
mod presence;
mod purge_room;
mod room_summary;
mod unread_counter_engine;

#[cfg(test)]
pub(crate) mod test_support;

pub use delete_message::{DeleteMessageCommand, DeleteMessageHandler, DeleteMessageResult};
pub use get_messages::RoomMessagesHandler;
pub use mark_room_read::{MarkRoomReadCommand, MarkRoomReadHandler};
pub use message_router::{MessageRouter, RouteOutcome, RouterEvent};
pub use presence::{PresenceCommand, PresenceHandler};
pub use purge_room::PurgeRoomHandler;
pub use room_summary::{RoomSummaryHandler, RoomSummaryQuery};
pub use unread_counter_engine::{ResetCounterCommand, UnreadCounterEngine};
