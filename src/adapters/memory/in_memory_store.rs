//! In-memory implementation of every persistence port.
//!
//! Backs the test suite and local runs without PostgreSQL. All state sits
//! behind one lock, so a bulk increment is atomic with respect to every
//! other operation, which is the same guarantee a single `UPDATE` gives.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::chat::{
    ArchivedChatMessage, ChatMessage, CounterField, Eligibility, GlobalMessage, LastMessage,
    RoomId, RoomSummary, UnreadCounterRecord, UserProfile,
};
use crate::domain::foundation::{DomainError, ErrorCode, MessageId, Timestamp, UserId};
use crate::ports::{
    MessageReader, MessageRepository, PageRequest, PurgeCounts, UnreadCounterRepository,
    UserDirectory,
};

#[derive(Default)]
struct StoreState {
    chats: Vec<ChatMessage>,
    global: Vec<GlobalMessage>,
    archived: Vec<ArchivedChatMessage>,
    counters: HashMap<UserId, UnreadCounterRecord>,
    users: HashMap<UserId, UserProfile>,
}

/// Process-local chat store.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(InMemoryChatStore::new());
/// store.add_user(profile);
///
/// let repo: Arc<dyn MessageRepository> = store.clone();
/// let counters: Arc<dyn UnreadCounterRepository> = store.clone();
/// ```
#[derive(Default)]
pub struct InMemoryChatStore {
    state: RwLock<StoreState>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, DomainError> {
        self.state
            .read()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "Chat store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, DomainError> {
        self.state
            .write()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "Chat store lock poisoned"))
    }

    // === Test Helpers ===

    /// Registers a user profile together with an all-zero counter record,
    /// the way account creation does.
    pub fn add_user(&self, profile: UserProfile) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state
            .counters
            .entry(profile.id)
            .or_insert_with(|| UnreadCounterRecord::zeroed(profile.id));
        state.users.insert(profile.id, profile);
    }

    /// Stores an archived message, standing in for the archival job.
    pub fn insert_archived(&self, message: ArchivedChatMessage) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .archived
            .push(message);
    }

    pub fn chat_count(&self) -> usize {
        self.state.read().unwrap_or_else(PoisonError::into_inner).chats.len()
    }

    pub fn global_count(&self) -> usize {
        self.state.read().unwrap_or_else(PoisonError::into_inner).global.len()
    }

    pub fn archived_count(&self) -> usize {
        self.state.read().unwrap_or_else(PoisonError::into_inner).archived.len()
    }
}

/// Newest first; ties keep the most recently inserted first.
fn newest_first<T: Clone>(
    items: &[T],
    room: &RoomId,
    room_of: impl Fn(&T) -> &RoomId,
    ts_of: impl Fn(&T) -> Timestamp,
) -> Vec<T> {
    let mut matching: Vec<T> = items
        .iter()
        .rev()
        .filter(|m| room_of(m) == room)
        .cloned()
        .collect();
    matching.sort_by(|a, b| ts_of(b).cmp(&ts_of(a)));
    matching
}

#[async_trait]
impl MessageRepository for InMemoryChatStore {
    async fn append_chat(&self, message: &ChatMessage) -> Result<(), DomainError> {
        self.write()?.chats.push(message.clone());
        Ok(())
    }

    async fn append_global(&self, message: &GlobalMessage) -> Result<(), DomainError> {
        self.write()?.global.push(message.clone());
        Ok(())
    }

    async fn delete_chat(&self, id: &MessageId) -> Result<Option<RoomId>, DomainError> {
        let mut state = self.write()?;
        let position = state.chats.iter().position(|m| m.id == *id);
        Ok(position.map(|pos| state.chats.remove(pos).room))
    }

    async fn delete_global(
        &self,
        id: &MessageId,
        room: Option<&RoomId>,
    ) -> Result<Option<RoomId>, DomainError> {
        let mut state = self.write()?;
        let position = state
            .global
            .iter()
            .position(|m| m.id == *id && room.map_or(true, |r| m.room == *r));
        Ok(position.map(|pos| state.global.remove(pos).room))
    }

    async fn mark_room_read(&self, room: &RoomId, reader_email: &str) -> Result<u64, DomainError> {
        let mut state = self.write()?;
        let mut changed = 0;
        for message in state
            .chats
            .iter_mut()
            .filter(|m| m.room == *room && m.sender_email != reader_email && m.unread)
        {
            message.unread = false;
            changed += 1;
        }
        Ok(changed)
    }

    async fn purge_room(&self, room: &RoomId) -> Result<PurgeCounts, DomainError> {
        let mut state = self.write()?;

        let chats_before = state.chats.len();
        state.chats.retain(|m| m.room != *room);
        let archived_before = state.archived.len();
        state.archived.retain(|m| m.room != *room);

        Ok(PurgeCounts {
            chats_deleted: (chats_before - state.chats.len()) as u64,
            archived_chats_deleted: (archived_before - state.archived.len()) as u64,
        })
    }
}

#[async_trait]
impl MessageReader for InMemoryChatStore {
    async fn latest_chats(&self, room: &RoomId, limit: u32) -> Result<Vec<ChatMessage>, DomainError> {
        let state = self.read()?;
        let mut messages = newest_first(&state.chats, room, |m| &m.room, |m| m.timestamp);
        messages.truncate(limit as usize);
        Ok(messages)
    }

    async fn latest_global(
        &self,
        room: &RoomId,
        limit: u32,
    ) -> Result<Vec<GlobalMessage>, DomainError> {
        let state = self.read()?;
        let mut messages = newest_first(&state.global, room, |m| &m.room, |m| m.timestamp);
        messages.truncate(limit as usize);
        Ok(messages)
    }

    async fn chat_by_id(&self, id: &MessageId) -> Result<Option<ChatMessage>, DomainError> {
        Ok(self.read()?.chats.iter().find(|m| m.id == *id).cloned())
    }

    async fn global_by_id(&self, id: &MessageId) -> Result<Option<GlobalMessage>, DomainError> {
        Ok(self.read()?.global.iter().find(|m| m.id == *id).cloned())
    }

    async fn archived(
        &self,
        room: &RoomId,
        page: PageRequest,
    ) -> Result<Vec<ArchivedChatMessage>, DomainError> {
        let state = self.read()?;
        Ok(newest_first(&state.archived, room, |m| &m.room, |m| m.timestamp)
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn summarize(&self, rooms: &[RoomId], viewer_email: &str) -> Result<RoomSummary, DomainError> {
        let wanted: HashSet<&RoomId> = rooms.iter().collect();
        let state = self.read()?;
        let mut summary = RoomSummary::default();

        for message in state.chats.iter().filter(|m| wanted.contains(&m.room)) {
            let newer = summary
                .last_messages
                .get(&message.room)
                .map_or(true, |current| message.timestamp >= current.timestamp);
            if newer {
                summary.last_messages.insert(
                    message.room.clone(),
                    LastMessage {
                        id: message.id,
                        message: message.body.clone(),
                        timestamp: message.timestamp,
                        username: message.sender_name.clone(),
                        email: message.sender_email.clone(),
                        is_file: message.is_file(),
                    },
                );
            }
            if message.unread && message.sender_email != viewer_email {
                *summary.unread_counts.entry(message.room.clone()).or_insert(0) += 1;
            }
        }

        Ok(summary)
    }
}

#[async_trait]
impl UnreadCounterRepository for InMemoryChatStore {
    async fn bulk_increment(
        &self,
        field: CounterField,
        eligibility: Eligibility,
        excluded_email: &str,
    ) -> Result<u64, DomainError> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        let mut incremented = 0;

        for (user_id, record) in state.counters.iter_mut() {
            let Some(user) = state.users.get(user_id) else {
                continue;
            };
            if user.email != excluded_email && eligibility.admits(user) {
                record.increment(field);
                incremented += 1;
            }
        }

        Ok(incremented)
    }

    async fn reset(&self, user_id: &UserId, field: CounterField) -> Result<bool, DomainError> {
        let mut state = self.write()?;
        match state.counters.get_mut(user_id) {
            Some(record) => {
                record.reset(field);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find(&self, user_id: &UserId) -> Result<Option<UnreadCounterRecord>, DomainError> {
        Ok(self.read()?.counters.get(user_id).cloned())
    }

    async fn create(&self, user_id: &UserId) -> Result<UnreadCounterRecord, DomainError> {
        let mut state = self.write()?;
        Ok(state
            .counters
            .entry(*user_id)
            .or_insert_with(|| UnreadCounterRecord::zeroed(*user_id))
            .clone())
    }

    async fn delete(&self, user_id: &UserId) -> Result<bool, DomainError> {
        Ok(self.write()?.counters.remove(user_id).is_some())
    }
}

#[async_trait]
impl UserDirectory for InMemoryChatStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.read()?.users.values().find(|u| u.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::{Language, MessageDraft, Role};

    fn room(id: &str) -> RoomId {
        RoomId::new(id).unwrap()
    }

    fn user(email: &str, role: Role, language: Option<Language>) -> UserProfile {
        UserProfile {
            id: UserId::new(),
            email: email.to_string(),
            name: None,
            role,
            language,
            assigned_teacher_id: None,
        }
    }

    fn chat_at(room_id: &str, sender: &str, body: &str, offset_secs: i64) -> ChatMessage {
        let mut msg =
            ChatMessage::compose(MessageDraft::new("Someone", sender, room(room_id), body)).unwrap();
        msg.timestamp = msg.timestamp.plus_secs(offset_secs);
        msg
    }

    fn archived_at(room_id: &str, offset_secs: i64) -> ArchivedChatMessage {
        let ts = Timestamp::now().plus_secs(offset_secs);
        ArchivedChatMessage {
            id: MessageId::new(),
            sender_name: "Old".to_string(),
            sender_email: "old@example.com".to_string(),
            room: room(room_id),
            body: format!("at {}", offset_secs),
            timestamp: ts,
            archived_at: ts,
        }
    }

    #[tokio::test]
    async fn latest_chats_are_newest_first_and_limited() {
        let store = InMemoryChatStore::new();
        for i in 0..5 {
            store.append_chat(&chat_at("r1", "a@x", &format!("m{}", i), i)).await.unwrap();
        }
        store.append_chat(&chat_at("r2", "a@x", "other", 10)).await.unwrap();

        let latest = store.latest_chats(&room("r1"), 3).await.unwrap();
        let bodies: Vec<_> = latest.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["m4", "m3", "m2"]);
    }

    #[tokio::test]
    async fn archived_pages_are_offset_by_page_size() {
        let store = InMemoryChatStore::new();
        for i in 0..5 {
            store.insert_archived(archived_at("r1", i));
        }

        let page_two = store
            .archived(&room("r1"), PageRequest::new(2, 2).unwrap())
            .await
            .unwrap();
        let bodies: Vec<_> = page_two.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["at 2", "at 1"]);
    }

    #[tokio::test]
    async fn mark_room_read_skips_own_messages() {
        let store = InMemoryChatStore::new();
        store.append_chat(&chat_at("r1", "student@x", "q", 0)).await.unwrap();
        store.append_chat(&chat_at("r1", "teacher@x", "a", 1)).await.unwrap();
        store.append_chat(&chat_at("r2", "student@x", "elsewhere", 2)).await.unwrap();

        let changed = store.mark_room_read(&room("r1"), "teacher@x").await.unwrap();
        assert_eq!(changed, 1);

        let r1 = store.latest_chats(&room("r1"), 50).await.unwrap();
        assert!(r1.iter().find(|m| m.sender_email == "teacher@x").unwrap().unread);
        assert!(!r1.iter().find(|m| m.sender_email == "student@x").unwrap().unread);
        assert!(store.latest_chats(&room("r2"), 50).await.unwrap()[0].unread);
    }

    #[tokio::test]
    async fn purge_room_counts_each_store_and_spares_other_rooms() {
        let store = InMemoryChatStore::new();
        store.append_chat(&chat_at("r1", "a@x", "1", 0)).await.unwrap();
        store.append_chat(&chat_at("r1", "a@x", "2", 1)).await.unwrap();
        store.append_chat(&chat_at("r2", "a@x", "3", 2)).await.unwrap();
        store.insert_archived(archived_at("r1", -100));
        store.insert_archived(archived_at("r2", -100));

        let counts = store.purge_room(&room("r1")).await.unwrap();

        assert_eq!(
            counts,
            PurgeCounts {
                chats_deleted: 2,
                archived_chats_deleted: 1
            }
        );
        assert_eq!(store.chat_count(), 1);
        assert_eq!(store.archived_count(), 1);
    }

    #[tokio::test]
    async fn delete_global_respects_room_scope() {
        let store = InMemoryChatStore::new();
        let draft = MessageDraft::new("T", "t@x", room("uuid-english"), "hello");
        let msg = GlobalMessage::compose(draft, None).unwrap();
        store.append_global(&msg).await.unwrap();

        let wrong_room = store.delete_global(&msg.id, Some(&RoomId::support())).await.unwrap();
        assert_eq!(wrong_room, None);

        let deleted = store.delete_global(&msg.id, None).await.unwrap();
        assert_eq!(deleted, Some(room("uuid-english")));
        assert_eq!(store.global_count(), 0);
    }

    #[tokio::test]
    async fn summarize_picks_latest_and_counts_unread_from_others() {
        let store = InMemoryChatStore::new();
        store.append_chat(&chat_at("roomA", "s@x", "first", 1)).await.unwrap();
        store.append_chat(&chat_at("roomA", "s@x", "second", 2)).await.unwrap();
        store.append_chat(&chat_at("roomA", "viewer@x", "mine", 0)).await.unwrap();

        let summary = store
            .summarize(&[room("roomA"), room("roomB")], "viewer@x")
            .await
            .unwrap();

        assert_eq!(summary.last_messages[&room("roomA")].message, "second");
        assert_eq!(summary.unread_counts[&room("roomA")], 2);
        assert!(!summary.last_messages.contains_key(&room("roomB")));
        assert!(!summary.unread_counts.contains_key(&room("roomB")));
    }

    #[tokio::test]
    async fn bulk_increment_skips_sender_and_ineligible_users() {
        let store = InMemoryChatStore::new();
        let teacher = user("t@x", Role::Teacher, Some(Language::English));
        let student = user("s@x", Role::User, Some(Language::English));
        let spanish = user("e@x", Role::User, Some(Language::Spanish));
        store.add_user(teacher.clone());
        store.add_user(student.clone());
        store.add_user(spanish.clone());

        let count = store
            .bulk_increment(
                CounterField::GeneralEnglishRoom,
                Eligibility::LanguageMembers(Language::English),
                "s@x",
            )
            .await
            .unwrap();

        assert_eq!(count, 1);
        for (id, expected) in [(teacher.id, 1), (student.id, 0), (spanish.id, 0)] {
            let record = store.find(&id).await.unwrap().unwrap();
            assert_eq!(record.general_english_room, expected);
        }
    }

    #[tokio::test]
    async fn create_is_idempotent_and_delete_reports_absence() {
        let store = InMemoryChatStore::new();
        let id = UserId::new();

        store.create(&id).await.unwrap();
        store.reset(&id, CounterField::RandomRoom).await.unwrap();
        let again = store.create(&id).await.unwrap();
        assert_eq!(again, UnreadCounterRecord::zeroed(id));

        assert!(store.delete(&id).await.unwrap());
        assert!(!store.delete(&id).await.unwrap());
        assert!(!store.reset(&id, CounterField::RandomRoom).await.unwrap());
    }

    #[tokio::test]
    async fn directory_finds_users_by_email() {
        let store = InMemoryChatStore::new();
        let admin = user("root@x", Role::Admin, None);
        store.add_user(admin.clone());

        assert_eq!(store.find_by_email("root@x").await.unwrap(), Some(admin.clone()));
        assert_eq!(store.find_by_id(&admin.id).await.unwrap(), Some(admin));
        assert_eq!(store.find_by_email("nobody@x").await.unwrap(), None);
    }
}
