//! Chat domain - rooms, messages, unread counters and their rules.
//!
//! Room identifiers are classified into a closed set of categories
//! ([`RoomCategory`]); each category names the counter slot it bumps
//! ([`CounterField`]) and which users are affected ([`Eligibility`]).

mod counters;
mod eligibility;
mod errors;
mod events;
mod message;
mod room;
mod summary;

pub use counters::UnreadCounterRecord;
pub use eligibility::{Eligibility, Role, UserProfile};
pub use errors::ChatError;
pub use events::{PresenceStatus, RoomEvent};
pub use message::{ArchivedChatMessage, ChatMessage, GlobalMessage, MessageDraft, MessageStream};
pub use room::{CounterField, Language, RoomCategory, RoomId, SUPPORT_ROOM};
pub use summary::{LastMessage, RoomSummary};
