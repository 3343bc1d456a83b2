//! Room identifiers and their classification into counter categories.
//!
//! A room identifier is either a bare UUID (a direct teacher/student room,
//! addressed by either participant's user id) or a well-known string that
//! encodes a language and optionally a role:
//!
//! ```text
//! uuid-support            → Support
//! uuid-teacher-<lang>     → TeacherLanguage(lang)
//! uuid-<lang>             → GeneralLanguage(lang)
//! 1b4e28ba-2fa1-...       → Direct(uuid)
//! anything else           → unclassified (counts against randomRoom)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{UserId, ValidationError};

use super::eligibility::Eligibility;

/// Identifier of the shared support room.
pub const SUPPORT_ROOM: &str = "uuid-support";

const GLOBAL_ROOM_PREFIX: &str = "uuid-";
const TEACHER_ROOM_PREFIX: &str = "uuid-teacher-";
const MAX_ROOM_LEN: usize = 100;
const HYPHENATED_UUID_LEN: usize = 36;

/// Logical channel identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    /// Creates a room id, rejecting blank or oversized identifiers.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("room"));
        }
        if trimmed.len() > MAX_ROOM_LEN {
            return Err(ValidationError::invalid_format(
                "room",
                format!("must be at most {} characters", MAX_ROOM_LEN),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The shared support room.
    pub fn support() -> Self {
        Self(SUPPORT_ROOM.to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classifies this room; see [`RoomCategory::classify`].
    pub fn category(&self) -> Option<RoomCategory> {
        RoomCategory::classify(self)
    }

    /// Counter slot this room maps to; see [`CounterField::for_room`].
    pub fn counter_field(&self) -> CounterField {
        CounterField::for_room(self)
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RoomId::new(value)
    }
}

impl From<RoomId> for String {
    fn from(room: RoomId) -> Self {
        room.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Languages that have dedicated global rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
    Polish,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Spanish, Language::Polish];

    /// Parses the lowercase language code used in room identifiers and user records.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "english" => Some(Language::English),
            "spanish" => Some(Language::Spanish),
            "polish" => Some(Language::Polish),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Spanish => "spanish",
            Language::Polish => "polish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a room identifier into an eligibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomCategory {
    /// 1:1 room addressed by a participant's user id.
    Direct(UserId),
    /// Language room shared by every speaker of the language.
    GeneralLanguage(Language),
    /// Language room restricted to that language's teachers.
    TeacherLanguage(Language),
    /// The shared support channel.
    Support,
}

impl RoomCategory {
    /// Classifies a room identifier.
    ///
    /// Precedence is most specific first: support, teacher-language,
    /// general-language, then a bare hyphenated UUID. Returns `None` when
    /// nothing matches.
    pub fn classify(room: &RoomId) -> Option<Self> {
        let id = room.as_str();

        if id == SUPPORT_ROOM {
            return Some(RoomCategory::Support);
        }

        if let Some(language) = id
            .strip_prefix(TEACHER_ROOM_PREFIX)
            .and_then(Language::from_code)
        {
            return Some(RoomCategory::TeacherLanguage(language));
        }

        if let Some(language) = id
            .strip_prefix(GLOBAL_ROOM_PREFIX)
            .and_then(Language::from_code)
        {
            return Some(RoomCategory::GeneralLanguage(language));
        }

        if id.len() == HYPHENATED_UUID_LEN {
            if let Ok(uuid) = Uuid::parse_str(id) {
                return Some(RoomCategory::Direct(UserId::from_uuid(uuid)));
            }
        }

        None
    }

    /// Counter slot incremented for messages in rooms of this category.
    pub fn counter_field(&self) -> CounterField {
        match self {
            RoomCategory::Direct(_) => CounterField::RandomRoom,
            RoomCategory::Support => CounterField::SupportRoom,
            RoomCategory::GeneralLanguage(Language::English) => CounterField::GeneralEnglishRoom,
            RoomCategory::GeneralLanguage(Language::Spanish) => CounterField::GeneralSpanishRoom,
            RoomCategory::GeneralLanguage(Language::Polish) => CounterField::GeneralPolishRoom,
            RoomCategory::TeacherLanguage(Language::English) => CounterField::TeachersEnglishRoom,
            RoomCategory::TeacherLanguage(Language::Spanish) => CounterField::TeachersSpanishRoom,
            RoomCategory::TeacherLanguage(Language::Polish) => CounterField::TeachersPolishRoom,
        }
    }

    /// Which users should have their counter bumped for a message here.
    pub fn eligibility(&self) -> Eligibility {
        match self {
            RoomCategory::Support => Eligibility::Staff,
            RoomCategory::TeacherLanguage(language) => Eligibility::LanguageTeachers(*language),
            RoomCategory::GeneralLanguage(language) => Eligibility::LanguageMembers(*language),
            RoomCategory::Direct(room_owner) => Eligibility::DirectParticipants(*room_owner),
        }
    }
}

/// One integer slot on a user's unread-counter record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CounterField {
    RandomRoom,
    GeneralEnglishRoom,
    TeachersEnglishRoom,
    GeneralSpanishRoom,
    TeachersSpanishRoom,
    GeneralPolishRoom,
    TeachersPolishRoom,
    SupportRoom,
}

impl CounterField {
    pub const ALL: [CounterField; 8] = [
        CounterField::RandomRoom,
        CounterField::GeneralEnglishRoom,
        CounterField::TeachersEnglishRoom,
        CounterField::GeneralSpanishRoom,
        CounterField::TeachersSpanishRoom,
        CounterField::GeneralPolishRoom,
        CounterField::TeachersPolishRoom,
        CounterField::SupportRoom,
    ];

    /// Maps any room to its counter slot.
    ///
    /// This is the single mapping shared by the live increment path and the
    /// reset path. Unclassified rooms fall back to `RandomRoom`.
    pub fn for_room(room: &RoomId) -> Self {
        RoomCategory::classify(room)
            .map(|category| category.counter_field())
            .unwrap_or(CounterField::RandomRoom)
    }

    /// Column name in the `unread_counters` table.
    pub fn column(&self) -> &'static str {
        match self {
            CounterField::RandomRoom => "random_room",
            CounterField::GeneralEnglishRoom => "general_english_room",
            CounterField::TeachersEnglishRoom => "teachers_english_room",
            CounterField::GeneralSpanishRoom => "general_spanish_room",
            CounterField::TeachersSpanishRoom => "teachers_spanish_room",
            CounterField::GeneralPolishRoom => "general_polish_room",
            CounterField::TeachersPolishRoom => "teachers_polish_room",
            CounterField::SupportRoom => "support_room",
        }
    }
}

impl fmt::Display for CounterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn room(id: &str) -> RoomId {
        RoomId::new(id).unwrap()
    }

    #[test]
    fn room_id_rejects_blank() {
        assert_eq!(
            RoomId::new("   "),
            Err(ValidationError::empty_field("room"))
        );
    }

    #[test]
    fn room_id_rejects_oversized() {
        assert!(RoomId::new("x".repeat(101)).is_err());
        assert!(RoomId::new("x".repeat(100)).is_ok());
    }

    #[test]
    fn room_id_deserializes_through_validation() {
        let ok: RoomId = serde_json::from_str(r#""uuid-english""#).unwrap();
        assert_eq!(ok.as_str(), "uuid-english");
        assert!(serde_json::from_str::<RoomId>(r#""""#).is_err());
    }

    #[test]
    fn support_room_is_classified_first() {
        assert_eq!(room(SUPPORT_ROOM).category(), Some(RoomCategory::Support));
    }

    #[test]
    fn teacher_rooms_win_over_general_rooms() {
        for language in Language::ALL {
            let id = format!("uuid-teacher-{}", language);
            assert_eq!(
                room(&id).category(),
                Some(RoomCategory::TeacherLanguage(language))
            );
        }
    }

    #[test]
    fn general_language_rooms_classify() {
        assert_eq!(
            room("uuid-spanish").category(),
            Some(RoomCategory::GeneralLanguage(Language::Spanish))
        );
    }

    #[test]
    fn unknown_language_is_unclassified() {
        assert_eq!(room("uuid-german").category(), None);
        assert_eq!(room("uuid-teacher-german").category(), None);
        assert_eq!(room("uuid-English").category(), None);
    }

    #[test]
    fn bare_uuid_is_direct_room_in_any_case() {
        let uuid = Uuid::new_v4();
        let upper = uuid.to_string().to_uppercase();
        assert_eq!(
            room(&upper).category(),
            Some(RoomCategory::Direct(UserId::from_uuid(uuid)))
        );
    }

    #[test]
    fn simple_uuid_form_is_not_a_direct_room() {
        let simple = Uuid::new_v4().simple().to_string();
        assert_eq!(room(&simple).category(), None);
    }

    #[test]
    fn counter_fields_follow_category() {
        assert_eq!(room(SUPPORT_ROOM).counter_field(), CounterField::SupportRoom);
        assert_eq!(
            room("uuid-teacher-polish").counter_field(),
            CounterField::TeachersPolishRoom
        );
        assert_eq!(
            room("uuid-english").counter_field(),
            CounterField::GeneralEnglishRoom
        );
        assert_eq!(
            room(&Uuid::new_v4().to_string()).counter_field(),
            CounterField::RandomRoom
        );
    }

    #[test]
    fn unclassified_rooms_fall_back_to_random_counter() {
        assert_eq!(room("lobby").counter_field(), CounterField::RandomRoom);
    }

    #[test]
    fn counter_field_serializes_camel_case() {
        let json = serde_json::to_string(&CounterField::TeachersSpanishRoom).unwrap();
        assert_eq!(json, r#""teachersSpanishRoom""#);
    }

    #[test]
    fn every_counter_field_has_distinct_column() {
        let mut columns: Vec<_> = CounterField::ALL.iter().map(|f| f.column()).collect();
        columns.sort();
        columns.dedup();
        assert_eq!(columns.len(), CounterField::ALL.len());
    }

    fn any_language() -> impl Strategy<Value = Language> {
        prop_oneof![
            Just(Language::English),
            Just(Language::Spanish),
            Just(Language::Polish),
        ]
    }

    proptest! {
        #[test]
        fn teacher_language_rooms_never_classify_as_general_or_support(language in any_language()) {
            let id = RoomId::new(format!("uuid-teacher-{}", language)).unwrap();
            let category = id.category();
            prop_assert_eq!(category, Some(RoomCategory::TeacherLanguage(language)));
            prop_assert_eq!(
                category.map(|c| c.eligibility()),
                Some(Eligibility::LanguageTeachers(language))
            );
        }

        #[test]
        fn arbitrary_text_never_panics_and_maps_to_some_field(id in "[a-z0-9-]{1,60}") {
            let room = RoomId::new(id).unwrap();
            let field = room.counter_field();
            prop_assert!(CounterField::ALL.contains(&field));
        }
    }
}
