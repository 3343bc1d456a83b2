//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresMessageRepository` - Writes to the live, global and archive tables
//! - `PostgresMessageReader` - Latest, by-id, archived and summary queries
//! - `PostgresUnreadCounterRepository` - Atomic bulk counter updates
//! - `PostgresUserDirectory` - Read-only view of the account service's users

mod message_reader;
mod message_repository;
mod rows;
mod unread_counter_repository;
mod user_directory;

pub use message_reader::PostgresMessageReader;
pub use message_repository::PostgresMessageRepository;
pub use unread_counter_repository::PostgresUnreadCounterRepository;
pub use user_directory::PostgresUserDirectory;
