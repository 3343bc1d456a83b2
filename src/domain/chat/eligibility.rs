//! Which users are eligible for an unread-counter bump.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{UserId, ValidationError};

use super::room::Language;

/// Platform role as recorded by the user directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        }
    }

    /// Teachers and admins staff the support room.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Teacher | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// The user attributes eligibility rules look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub language: Option<Language>,
    pub assigned_teacher_id: Option<UserId>,
}

/// Filter selecting the users whose counter is incremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// Teachers and admins.
    Staff,
    /// Teachers of the language, plus every admin.
    LanguageTeachers(Language),
    /// Anyone with the language, plus every admin.
    LanguageMembers(Language),
    /// The user whose id is the room, or whose assigned teacher is.
    DirectParticipants(UserId),
}

impl Eligibility {
    /// Evaluates the filter against a single profile.
    ///
    /// Storage adapters that can express the filter natively (SQL) do so
    /// instead; this is the reference evaluation.
    pub fn admits(&self, user: &UserProfile) -> bool {
        match self {
            Eligibility::Staff => user.role.is_staff(),
            Eligibility::LanguageTeachers(language) => {
                user.role == Role::Admin
                    || (user.role == Role::Teacher && user.language == Some(*language))
            }
            Eligibility::LanguageMembers(language) => {
                user.role == Role::Admin || user.language == Some(*language)
            }
            Eligibility::DirectParticipants(room_owner) => {
                user.id == *room_owner || user.assigned_teacher_id == Some(*room_owner)
            }
        }
    }
}
