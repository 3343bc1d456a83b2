//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the messaging core and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `MessageRepository` - Write side of the live, global and archive stores
//! - `MessageReader` - Query side (latest, archived, multi-room summary)
//! - `UnreadCounterRepository` - Per-user unread counters with atomic bulk increments
//!
//! ## Collaborator Ports
//!
//! - `UserDirectory` - User attribute lookup owned by the account service
//! - `RoomBroadcaster` - Fan-out to live connections

mod message_reader;
mod message_repository;
mod room_broadcaster;
mod unread_counter_repository;
mod user_directory;

pub use message_reader::{MessageReader, PageRequest};
pub use message_repository::{MessageRepository, PurgeCounts};
pub use room_broadcaster::RoomBroadcaster;
pub use unread_counter_repository::UnreadCounterRepository;
pub use user_directory::UserDirectory;
