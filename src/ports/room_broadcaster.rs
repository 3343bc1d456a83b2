//! Room broadcaster port.
//!
//! Delivery is best effort: a connection that has gone away or whose
//! outbound buffer is full simply misses the event. Each method returns
//! how many connections the event was handed to.

use crate::domain::chat::{RoomEvent, RoomId};
use crate::domain::foundation::ConnectionId;
use async_trait::async_trait;

#[async_trait]
pub trait RoomBroadcaster: Send + Sync {
    /// Every connection currently joined to `room`.
    async fn to_room(&self, room: &RoomId, event: RoomEvent) -> usize;

    /// Every connection except `except`, whatever room it is in.
    async fn to_all_except(&self, except: Option<ConnectionId>, event: RoomEvent) -> usize;

    /// Every live connection.
    async fn to_all(&self, event: RoomEvent) -> usize {
        self.to_all_except(None, event).await
    }
}
