//! Per-user unread counter record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

use super::room::CounterField;

/// One row per user, one counter per room category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCounterRecord {
    pub user_id: UserId,
    pub random_room: i32,
    pub general_english_room: i32,
    pub teachers_english_room: i32,
    pub general_spanish_room: i32,
    pub teachers_spanish_room: i32,
    pub general_polish_room: i32,
    pub teachers_polish_room: i32,
    pub support_room: i32,
}

impl UnreadCounterRecord {
    /// A fresh record with every counter at zero.
    pub fn zeroed(user_id: UserId) -> Self {
        Self {
            user_id,
            random_room: 0,
            general_english_room: 0,
            teachers_english_room: 0,
            general_spanish_room: 0,
            teachers_spanish_room: 0,
            general_polish_room: 0,
            teachers_polish_room: 0,
            support_room: 0,
        }
    }

    pub fn get(&self, field: CounterField) -> i32 {
        match field {
            CounterField::RandomRoom => self.random_room,
            CounterField::GeneralEnglishRoom => self.general_english_room,
            CounterField::TeachersEnglishRoom => self.teachers_english_room,
            CounterField::GeneralSpanishRoom => self.general_spanish_room,
            CounterField::TeachersSpanishRoom => self.teachers_spanish_room,
            CounterField::GeneralPolishRoom => self.general_polish_room,
            CounterField::TeachersPolishRoom => self.teachers_polish_room,
            CounterField::SupportRoom => self.support_room,
        }
    }

    pub fn increment(&mut self, field: CounterField) {
        let slot = self.slot_mut(field);
        *slot = slot.saturating_add(1);
    }

    pub fn reset(&mut self, field: CounterField) {
        *self.slot_mut(field) = 0;
    }

    fn slot_mut(&mut self, field: CounterField) -> &mut i32 {
        match field {
            CounterField::RandomRoom => &mut self.random_room,
            CounterField::GeneralEnglishRoom => &mut self.general_english_room,
            CounterField::TeachersEnglishRoom => &mut self.teachers_english_room,
            CounterField::GeneralSpanishRoom => &mut self.general_spanish_room,
            CounterField::TeachersSpanishRoom => &mut self.teachers_spanish_room,
            CounterField::GeneralPolishRoom => &mut self.general_polish_room,
            CounterField::TeachersPolishRoom => &mut self.teachers_polish_room,
            CounterField::SupportRoom => &mut self.support_room,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_record_has_all_counters_at_zero() {
        let record = UnreadCounterRecord::zeroed(UserId::new());
        for field in CounterField::ALL {
            assert_eq!(record.get(field), 0);
        }
    }

    #[test]
    fn reset_touches_only_the_named_field() {
        let mut record = UnreadCounterRecord::zeroed(UserId::new());
        for field in CounterField::ALL {
            record.increment(field);
            record.increment(field);
        }

        record.reset(CounterField::GeneralSpanishRoom);

        for field in CounterField::ALL {
            let expected = if field == CounterField::GeneralSpanishRoom { 0 } else { 2 };
            assert_eq!(record.get(field), expected, "{}", field);
        }
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let json = serde_json::to_value(UnreadCounterRecord::zeroed(UserId::new())).unwrap();
        assert!(json.get("teachersPolishRoom").is_some());
        assert!(json.get("userId").is_some());
    }
}
