//! Adapters - Implementations of port interfaces.
//!
//! - `postgres` - sqlx-backed persistence
//! - `memory` - in-process persistence for tests and local runs
//! - `websocket` - connection registry and wire protocol
//! - `http` - retrieval API and router assembly

pub mod http;
pub mod memory;
pub mod postgres;
pub mod websocket;

pub use memory::InMemoryChatStore;
pub use websocket::{RoomHub, WebSocketState};
