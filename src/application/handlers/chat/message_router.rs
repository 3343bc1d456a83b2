//! MessageRouter - Persists inbound chat events and fans them out.
//!
//! Every send follows the same order: validate, persist, room broadcast,
//! count (global store only), notice to everyone else. Persist and room
//! broadcast run under a per-room turn, so members of a room see messages
//! in the order their commits completed. A failed persist stops the event
//! before any side effect. A failed count is logged and changes nothing
//! else, so a counter bump never exists without its message.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::chat::{
    ChatError, ChatMessage, GlobalMessage, MessageDraft, MessageStream, RoomEvent, RoomId,
};
use crate::domain::foundation::{ConnectionId, MessageId};
use crate::ports::{MessageRepository, RoomBroadcaster};

use super::delete_message::{DeleteMessageCommand, DeleteMessageHandler};
use super::unread_counter_engine::UnreadCounterEngine;

/// A routable chat event, already decoded from the transport.
#[derive(Debug, Clone)]
pub enum RouterEvent {
    Chat(MessageDraft),
    GlobalChat(MessageDraft),
    /// Always stored in the support room, whatever room the draft names.
    SupportChat {
        draft: MessageDraft,
        sender_role: Option<String>,
    },
    Delete {
        stream: MessageStream,
        message_id: MessageId,
    },
}

impl RouterEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RouterEvent::Chat(_) => "chat",
            RouterEvent::GlobalChat(_) => "globalChat",
            RouterEvent::SupportChat { .. } => "supportChat",
            RouterEvent::Delete { stream, .. } => match stream {
                MessageStream::Private => "deleteNormalChat",
                MessageStream::Global => "deleteGlobalChat",
                MessageStream::Support => "deleteSupportChat",
            },
        }
    }
}

/// What a dispatched event ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Sent {
        message_id: MessageId,
        room: RoomId,
        counters_incremented: u64,
    },
    Deleted {
        message_id: MessageId,
        room: RoomId,
    },
}

/// Per-room locks that order commit-to-broadcast sections.
///
/// Entries are removed once no send holds or waits on them.
#[derive(Default)]
struct RoomTurns {
    rooms: DashMap<RoomId, Arc<Mutex<()>>>,
}

impl RoomTurns {
    async fn take(&self, room: &RoomId) -> RoomTurn<'_> {
        let lock = self.rooms.entry(room.clone()).or_default().clone();
        RoomTurn {
            turns: self,
            room: room.clone(),
            guard: Some(lock.lock_owned().await),
        }
    }
}

struct RoomTurn<'a> {
    turns: &'a RoomTurns,
    room: RoomId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for RoomTurn<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.turns
            .rooms
            .remove_if(&self.room, |_, lock| Arc::strong_count(lock) == 1);
    }
}

pub struct MessageRouter {
    messages: Arc<dyn MessageRepository>,
    counters: Arc<UnreadCounterEngine>,
    deleter: DeleteMessageHandler,
    broadcaster: Arc<dyn RoomBroadcaster>,
    turns: RoomTurns,
}

impl MessageRouter {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        counters: Arc<UnreadCounterEngine>,
        broadcaster: Arc<dyn RoomBroadcaster>,
    ) -> Self {
        Self {
            deleter: DeleteMessageHandler::new(messages.clone(), broadcaster.clone()),
            messages,
            counters,
            broadcaster,
            turns: RoomTurns::default(),
        }
    }

    /// Routes one event from `origin` (the sending connection, if any).
    pub async fn dispatch(
        &self,
        origin: Option<ConnectionId>,
        event: RouterEvent,
    ) -> Result<RouteOutcome, ChatError> {
        match event {
            RouterEvent::Chat(draft) => self.send_private(origin, draft).await,
            RouterEvent::GlobalChat(draft) => {
                self.send_global(origin, MessageStream::Global, draft, None)
                    .await
            }
            RouterEvent::SupportChat { draft, sender_role } => {
                let draft = draft.in_room(RoomId::support());
                self.send_global(origin, MessageStream::Support, draft, sender_role)
                    .await
            }
            RouterEvent::Delete { stream, message_id } => {
                let deleted = self
                    .deleter
                    .handle(DeleteMessageCommand { stream, message_id })
                    .await?;
                Ok(RouteOutcome::Deleted {
                    message_id: deleted.message_id,
                    room: deleted.room,
                })
            }
        }
    }

    async fn send_private(
        &self,
        origin: Option<ConnectionId>,
        draft: MessageDraft,
    ) -> Result<RouteOutcome, ChatError> {
        let message = ChatMessage::compose(draft)?;
        let room = message.room.clone();
        let message_id = message.id;

        let turn = self.turns.take(&room).await;
        self.messages.append_chat(&message).await?;
        tracing::debug!(message_id = %message_id, room = %room, "chat message stored");
        self.broadcaster.to_room(&room, RoomEvent::Chat(message)).await;
        drop(turn);

        self.broadcaster
            .to_all_except(origin, RoomEvent::new_message_notice(MessageStream::Private, room.clone()))
            .await;

        Ok(RouteOutcome::Sent {
            message_id,
            room,
            counters_incremented: 0,
        })
    }

    async fn send_global(
        &self,
        origin: Option<ConnectionId>,
        stream: MessageStream,
        draft: MessageDraft,
        sender_role: Option<String>,
    ) -> Result<RouteOutcome, ChatError> {
        let message = GlobalMessage::compose(draft, sender_role)?;
        let room = message.room.clone();
        let message_id = message.id;
        let sender_email = message.sender_email.clone();

        let turn = self.turns.take(&room).await;
        self.messages.append_global(&message).await?;
        self.broadcaster
            .to_room(&room, RoomEvent::global_message(stream, message))
            .await;
        drop(turn);

        let counters_incremented = match self
            .counters
            .count_new_message(&room, &sender_email)
            .await
        {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(
                    message_id = %message_id,
                    room = %room,
                    error = %err,
                    "unread counters not updated for stored message"
                );
                0
            }
        };

        tracing::debug!(
            message_id = %message_id,
            room = %room,
            event = stream.event_name(),
            counters_incremented,
            "global message stored"
        );

        self.broadcaster
            .to_all_except(origin, RoomEvent::new_message_notice(stream, room.clone()))
            .await;

        Ok(RouteOutcome::Sent {
            message_id,
            room,
            counters_incremented,
        })
    }
}
