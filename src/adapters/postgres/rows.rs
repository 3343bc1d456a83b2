//! Row-to-domain mapping shared by the chat adapters.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::chat::{
    ArchivedChatMessage, ChatMessage, GlobalMessage, Language, Role, RoomId, UnreadCounterRecord,
    UserProfile,
};
use crate::domain::foundation::{DomainError, ErrorCode, MessageId, Timestamp, UserId};

pub(super) const CHAT_COLUMNS: &str =
    "id, username, email, avatar_url, room, message, user_url, unread, timestamp";

pub(super) const GLOBAL_COLUMNS: &str =
    "id, username, email, avatar_url, room, message, user_url, user_role, unread_count, timestamp";

pub(super) const ARCHIVED_COLUMNS: &str = "id, username, email, room, message, timestamp, archived_at";

pub(super) const COUNTER_COLUMNS: &str = "user_id, random_room, general_english_room, \
     teachers_english_room, general_spanish_room, teachers_spanish_room, general_polish_room, \
     teachers_polish_room, support_room";

pub(super) const USER_COLUMNS: &str = "id, email, name, role, language, assigned_teacher_id";

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| DomainError::database(&format!("Failed to get {}", column), e))
}

fn corrupt(column: &str, reason: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} in storage: {}", column, reason),
    )
}

fn room(row: &PgRow) -> Result<RoomId, DomainError> {
    let raw: String = get(row, "room")?;
    RoomId::new(raw).map_err(|e| corrupt("room", e))
}

fn timestamp(row: &PgRow, column: &str) -> Result<Timestamp, DomainError> {
    let at: DateTime<Utc> = get(row, column)?;
    Ok(Timestamp::from_datetime(at))
}

pub(super) fn row_to_chat(row: PgRow) -> Result<ChatMessage, DomainError> {
    let id: Uuid = get(&row, "id")?;
    Ok(ChatMessage {
        id: MessageId::from_uuid(id),
        sender_name: get(&row, "username")?,
        sender_email: get(&row, "email")?,
        avatar_url: get(&row, "avatar_url")?,
        room: room(&row)?,
        body: get(&row, "message")?,
        attachment_url: get(&row, "user_url")?,
        unread: get(&row, "unread")?,
        timestamp: timestamp(&row, "timestamp")?,
    })
}

pub(super) fn row_to_global(row: PgRow) -> Result<GlobalMessage, DomainError> {
    let id: Uuid = get(&row, "id")?;
    Ok(GlobalMessage {
        id: MessageId::from_uuid(id),
        sender_name: get(&row, "username")?,
        sender_email: get(&row, "email")?,
        avatar_url: get(&row, "avatar_url")?,
        room: room(&row)?,
        body: get(&row, "message")?,
        attachment_url: get(&row, "user_url")?,
        sender_role: get(&row, "user_role")?,
        unread_count: get(&row, "unread_count")?,
        timestamp: timestamp(&row, "timestamp")?,
    })
}

pub(super) fn row_to_archived(row: PgRow) -> Result<ArchivedChatMessage, DomainError> {
    let id: Uuid = get(&row, "id")?;
    Ok(ArchivedChatMessage {
        id: MessageId::from_uuid(id),
        sender_name: get(&row, "username")?,
        sender_email: get(&row, "email")?,
        room: room(&row)?,
        body: get(&row, "message")?,
        timestamp: timestamp(&row, "timestamp")?,
        archived_at: timestamp(&row, "archived_at")?,
    })
}

pub(super) fn row_to_counters(row: PgRow) -> Result<UnreadCounterRecord, DomainError> {
    let user_id: Uuid = get(&row, "user_id")?;
    Ok(UnreadCounterRecord {
        user_id: UserId::from_uuid(user_id),
        random_room: get(&row, "random_room")?,
        general_english_room: get(&row, "general_english_room")?,
        teachers_english_room: get(&row, "teachers_english_room")?,
        general_spanish_room: get(&row, "general_spanish_room")?,
        teachers_spanish_room: get(&row, "teachers_spanish_room")?,
        general_polish_room: get(&row, "general_polish_room")?,
        teachers_polish_room: get(&row, "teachers_polish_room")?,
        support_room: get(&row, "support_room")?,
    })
}

pub(super) fn row_to_user(row: PgRow) -> Result<UserProfile, DomainError> {
    let id: Uuid = get(&row, "id")?;
    let role: String = get(&row, "role")?;
    let language: Option<String> = get(&row, "language")?;
    let assigned: Option<Uuid> = get(&row, "assigned_teacher_id")?;

    Ok(UserProfile {
        id: UserId::from_uuid(id),
        email: get(&row, "email")?,
        name: get(&row, "name")?,
        role: role.parse::<Role>().map_err(|e| corrupt("role", e))?,
        // Languages outside the supported set behave as "no language"
        language: language.as_deref().and_then(Language::from_code),
        assigned_teacher_id: assigned.map(UserId::from_uuid),
    })
}
