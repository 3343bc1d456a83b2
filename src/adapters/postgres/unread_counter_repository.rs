//! PostgreSQL implementation of UnreadCounterRepository.
//!
//! A bulk increment is one `UPDATE ... FROM users`, so every eligible row
//! is bumped atomically and concurrent increments never lose updates.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::chat::{CounterField, Eligibility, UnreadCounterRecord};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::UnreadCounterRepository;

use super::rows::{row_to_counters, COUNTER_COLUMNS};

/// PostgreSQL implementation of UnreadCounterRepository.
#[derive(Clone)]
pub struct PostgresUnreadCounterRepository {
    pool: PgPool,
}

impl PostgresUnreadCounterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// SQL predicate over `users u` for an eligibility filter. Its single
/// parameter, when present, is `$2`.
fn eligibility_predicate(eligibility: &Eligibility) -> &'static str {
    match eligibility {
        Eligibility::Staff => "u.role IN ('teacher', 'admin')",
        Eligibility::LanguageTeachers(_) => {
            "(u.role = 'admin' OR (u.role = 'teacher' AND u.language = $2))"
        }
        Eligibility::LanguageMembers(_) => "(u.role = 'admin' OR u.language = $2)",
        Eligibility::DirectParticipants(_) => "(u.id = $2 OR u.assigned_teacher_id = $2)",
    }
}

#[async_trait]
impl UnreadCounterRepository for PostgresUnreadCounterRepository {
    async fn bulk_increment(
        &self,
        field: CounterField,
        eligibility: Eligibility,
        excluded_email: &str,
    ) -> Result<u64, DomainError> {
        // Column names come from the closed CounterField set, never from input
        let column = field.column();
        let sql = format!(
            "UPDATE unread_counters uc SET {col} = {col} + 1 \
             FROM users u \
             WHERE u.id = uc.user_id AND u.email <> $1 AND {predicate}",
            col = column,
            predicate = eligibility_predicate(&eligibility),
        );

        let query = sqlx::query(&sql).bind(excluded_email);
        let query = match eligibility {
            Eligibility::Staff => query,
            Eligibility::LanguageTeachers(language) | Eligibility::LanguageMembers(language) => {
                query.bind(language.as_str())
            }
            Eligibility::DirectParticipants(owner) => query.bind(*owner.as_uuid()),
        };

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to increment unread counters", e))?;

        Ok(result.rows_affected())
    }

    async fn reset(&self, user_id: &UserId, field: CounterField) -> Result<bool, DomainError> {
        let sql = format!(
            "UPDATE unread_counters SET {} = 0 WHERE user_id = $1",
            field.column()
        );
        let result = sqlx::query(&sql)
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to reset unread counter", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, user_id: &UserId) -> Result<Option<UnreadCounterRecord>, DomainError> {
        let sql = format!(
            "SELECT {} FROM unread_counters WHERE user_id = $1",
            COUNTER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch unread counters", e))?;

        row.map(row_to_counters).transpose()
    }

    async fn create(&self, user_id: &UserId) -> Result<UnreadCounterRecord, DomainError> {
        sqlx::query("INSERT INTO unread_counters (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to create unread counters", e))?;

        self.find(user_id)
            .await?
            .ok_or_else(|| DomainError::database("Unread counters vanished after insert", user_id))
    }

    async fn delete(&self, user_id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM unread_counters WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete unread counters", e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::Language;

    #[test]
    fn staff_predicate_takes_no_parameter() {
        assert!(!eligibility_predicate(&Eligibility::Staff).contains("$2"));
    }

    #[test]
    fn parameterised_predicates_use_second_placeholder() {
        for eligibility in [
            Eligibility::LanguageTeachers(Language::English),
            Eligibility::LanguageMembers(Language::Polish),
            Eligibility::DirectParticipants(UserId::new()),
        ] {
            let predicate = eligibility_predicate(&eligibility);
            assert!(predicate.contains("$2"), "{:?}", eligibility);
            assert!(!predicate.contains("$3"));
        }
    }

    #[test]
    fn language_predicates_admit_admins() {
        assert!(eligibility_predicate(&Eligibility::LanguageMembers(Language::Spanish))
            .contains("u.role = 'admin'"));
        assert!(eligibility_predicate(&Eligibility::LanguageTeachers(Language::Spanish))
            .contains("u.role = 'admin'"));
    }
}
