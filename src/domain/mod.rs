//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `chat` - Rooms, messages, unread counters and classification rules
//!
//! Nothing here performs I/O.

pub mod chat;
pub mod foundation;
