//! WebSocket adapters for real-time chat.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     ws_handler (per connection)                      │
//! │   - Decodes ClientEvent frames                                       │
//! │   - join/data → RoomHub     chat/deletes → MessageRouter             │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ persist, count, broadcast
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      RoomHub (RoomBroadcaster)                       │
//! │   Room: uuid-english   Room: uuid-support    Room: <user uuid>       │
//! │   ├── conn-a           └── conn-c            └── conn-d              │
//! │   └── conn-b                                                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - Wire protocol (`{"event", "data"}` frames)
//! - [`rooms`] - Connection and room registry
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod handler;
pub mod messages;
pub mod rooms;

pub use handler::{handle_client_text, websocket_router, ws_handler, WebSocketState};
pub use messages::{
    ChatPayload, ClientEvent, DeletePayload, JoinPayload, ServerEvent, SignalRoute,
    SupportChatPayload,
};
pub use rooms::RoomHub;
