//! Connection and room registry for chat fan-out.
//!
//! Every live connection has one outbound queue and is a member of at most
//! one room. Joining a room leaves the previous one in the same write, so
//! broadcasts never see a connection in two rooms.
//!
//! # Architecture
//!
//! ```text
//! connections: conn-a → tx   conn-b → tx   conn-c → tx   conn-d → tx
//!
//! Room: uuid-english    Room: 1b4e28ba-...     (no room)
//! ├── conn-a            └── conn-c             └── conn-d
//! └── conn-b
//! ```
//!
//! Room-scoped events reach only that room's members; notices such as
//! `newChat` and `userStatus` go to every connection.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

use crate::domain::chat::{RoomEvent, RoomId};
use crate::domain::foundation::ConnectionId;
use crate::ports::RoomBroadcaster;

use super::messages::ServerEvent;

#[derive(Default)]
struct HubState {
    /// Outbound queue per live connection.
    connections: HashMap<ConnectionId, mpsc::Sender<ServerEvent>>,

    /// Room → members.
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,

    /// Connection → its single current room, for O(1) leave.
    connection_rooms: HashMap<ConnectionId, RoomId>,
}

impl HubState {
    fn leave_current_room(&mut self, connection: &ConnectionId) -> Option<RoomId> {
        let room = self.connection_rooms.remove(connection)?;
        if let Some(members) = self.rooms.get_mut(&room) {
            members.remove(connection);
            if members.is_empty() {
                self.rooms.remove(&room);
            }
        }
        Some(room)
    }

    fn send_to<'a>(
        &self,
        targets: impl IntoIterator<Item = &'a ConnectionId>,
        event: &ServerEvent,
    ) -> usize {
        let mut delivered = 0;
        for connection in targets {
            let Some(tx) = self.connections.get(connection) else {
                continue;
            };
            match tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(connection_id = %connection, "outbound queue full, event dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(connection_id = %connection, "connection closed before delivery");
                }
            }
        }
        delivered
    }
}

/// Tracks live connections and their room membership.
///
/// # Thread Safety
///
/// A single `RwLock` guards all three maps so membership changes are
/// atomic. Broadcasts take the read lock and never await while holding
/// it; delivery uses `try_send` into per-connection queues.
pub struct RoomHub {
    state: RwLock<HubState>,
    channel_capacity: usize,
}

impl RoomHub {
    /// Create a hub whose connections buffer up to `channel_capacity`
    /// outbound events. Events beyond that are dropped for that connection.
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            state: RwLock::new(HubState::default()),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Create with default capacity (128 events).
    pub fn with_default_capacity() -> Self {
        Self::new(128)
    }

    /// Register a new connection and return its outbound queue.
    pub async fn connect(&self) -> (ConnectionId, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let connection = ConnectionId::new();
        self.state.write().await.connections.insert(connection, tx);
        (connection, rx)
    }

    /// Forget a connection and its room membership.
    pub async fn disconnect(&self, connection: &ConnectionId) {
        let mut state = self.state.write().await;
        state.leave_current_room(connection);
        state.connections.remove(connection);
    }

    /// Move a connection into `room`, leaving whatever room it was in,
    /// then tell the room's other members that `username` is ready.
    ///
    /// Returns how many members were notified.
    pub async fn join(&self, connection: ConnectionId, room: RoomId, username: String) -> usize {
        let mut state = self.state.write().await;
        if !state.connections.contains_key(&connection) {
            tracing::warn!(connection_id = %connection, room = %room, "join from unknown connection");
            return 0;
        }

        let previous = state.leave_current_room(&connection);
        state.rooms.entry(room.clone()).or_default().insert(connection);
        state.connection_rooms.insert(connection, room.clone());

        tracing::debug!(
            connection_id = %connection,
            room = %room,
            previous_room = previous.as_ref().map(|r| r.as_str()),
            "connection joined room"
        );

        let others: Vec<ConnectionId> = state
            .rooms
            .get(&room)
            .map(|members| members.iter().filter(|c| **c != connection).copied().collect())
            .unwrap_or_default();
        state.send_to(&others, &ServerEvent::Ready { username })
    }

    /// Relay a signaling payload to every member of `room` except the sender.
    pub async fn relay_signal(
        &self,
        from: ConnectionId,
        room: &RoomId,
        payload: serde_json::Value,
    ) -> usize {
        self.send_room_except(room, Some(from), ServerEvent::Data(payload))
            .await
    }

    /// The room a connection is currently in.
    pub async fn current_room(&self, connection: &ConnectionId) -> Option<RoomId> {
        self.state.read().await.connection_rooms.get(connection).cloned()
    }

    /// Number of connections in a room (0 if the room doesn't exist).
    pub async fn client_count(&self, room: &RoomId) -> usize {
        self.state
            .read()
            .await
            .rooms
            .get(room)
            .map(HashSet::len)
            .unwrap_or(0)
    }

    /// Total number of live connections, in a room or not.
    pub async fn connection_count(&self) -> usize {
        self.state.read().await.connections.len()
    }

    async fn send_room_except(
        &self,
        room: &RoomId,
        except: Option<ConnectionId>,
        event: ServerEvent,
    ) -> usize {
        let state = self.state.read().await;
        match state.rooms.get(room) {
            Some(members) => {
                state.send_to(members.iter().filter(|c| Some(**c) != except), &event)
            }
            None => 0,
        }
    }
}

impl Default for RoomHub {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[async_trait]
impl RoomBroadcaster for RoomHub {
    async fn to_room(&self, room: &RoomId, event: RoomEvent) -> usize {
        self.send_room_except(room, None, event.into()).await
    }

    async fn to_all_except(&self, except: Option<ConnectionId>, event: RoomEvent) -> usize {
        let event = ServerEvent::from(event);
        let state = self.state.read().await;
        state.send_to(
            state.connections.keys().filter(|c| Some(**c) != except),
            &event,
        )
    }
}
