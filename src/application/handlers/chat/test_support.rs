//! Shared test doubles for chat handler tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::adapters::memory::InMemoryChatStore;
use crate::domain::chat::{ChatMessage, GlobalMessage, RoomEvent, RoomId};
use crate::domain::foundation::{ConnectionId, DomainError, MessageId};
use crate::ports::{MessageRepository, PurgeCounts, RoomBroadcaster};

/// Where an event was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Room(RoomId, RoomEvent),
    AllExcept(Option<ConnectionId>, RoomEvent),
}

impl Delivery {
    pub fn event(&self) -> &RoomEvent {
        match self {
            Delivery::Room(_, event) | Delivery::AllExcept(_, event) => event,
        }
    }
}

/// Broadcaster that records every call.
pub struct RecordingBroadcaster {
    deliveries: Mutex<Vec<Delivery>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self {
            deliveries: Mutex::new(Vec::new()),
        }
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.deliveries().iter().map(|d| d.event().name()).collect()
    }

    fn record(&self, delivery: Delivery) -> usize {
        self.deliveries.lock().unwrap().push(delivery);
        1
    }
}

#[async_trait]
impl RoomBroadcaster for RecordingBroadcaster {
    async fn to_room(&self, room: &RoomId, event: RoomEvent) -> usize {
        self.record(Delivery::Room(room.clone(), event))
    }

    async fn to_all_except(&self, except: Option<ConnectionId>, event: RoomEvent) -> usize {
        self.record(Delivery::AllExcept(except, event))
    }
}

/// Message store whose appends commit at once but acknowledge late when
/// the body equals `slow_body`, like a driver round-trip that stalls
/// after the commit.
pub struct SlowAckRepository {
    inner: Arc<InMemoryChatStore>,
    slow_body: &'static str,
    delay: Duration,
}

impl SlowAckRepository {
    pub fn new(inner: Arc<InMemoryChatStore>, slow_body: &'static str, delay: Duration) -> Self {
        Self {
            inner,
            slow_body,
            delay,
        }
    }

    async fn stall_if_slow(&self, body: &str) {
        if body == self.slow_body {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl MessageRepository for SlowAckRepository {
    async fn append_chat(&self, message: &ChatMessage) -> Result<(), DomainError> {
        self.inner.append_chat(message).await?;
        self.stall_if_slow(&message.body).await;
        Ok(())
    }

    async fn append_global(&self, message: &GlobalMessage) -> Result<(), DomainError> {
        self.inner.append_global(message).await?;
        self.stall_if_slow(&message.body).await;
        Ok(())
    }

    async fn delete_chat(&self, id: &MessageId) -> Result<Option<RoomId>, DomainError> {
        self.inner.delete_chat(id).await
    }

    async fn delete_global(
        &self,
        id: &MessageId,
        room: Option<&RoomId>,
    ) -> Result<Option<RoomId>, DomainError> {
        self.inner.delete_global(id, room).await
    }

    async fn mark_room_read(&self, room: &RoomId, reader_email: &str) -> Result<u64, DomainError> {
        self.inner.mark_room_read(room, reader_email).await
    }

    async fn purge_room(&self, room: &RoomId) -> Result<PurgeCounts, DomainError> {
        self.inner.purge_room(room).await
    }
}
