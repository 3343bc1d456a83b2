//! Unread counter repository port.
//!
//! # Concurrency
//!
//! `bulk_increment` must be a single set-based atomic update in the
//! backing store. Implementations never read-modify-write counters for
//! increments; concurrent increments of the same field must all land.

use crate::domain::chat::{CounterField, Eligibility, UnreadCounterRecord};
use crate::domain::foundation::{DomainError, UserId};
use async_trait::async_trait;

/// Repository port for per-user unread counters.
#[async_trait]
pub trait UnreadCounterRepository: Send + Sync {
    /// Add one to `field` for every user admitted by `eligibility`,
    /// except the user whose email is `excluded_email`.
    ///
    /// Returns the number of records incremented.
    async fn bulk_increment(
        &self,
        field: CounterField,
        eligibility: Eligibility,
        excluded_email: &str,
    ) -> Result<u64, DomainError>;

    /// Set `field` to zero for one user.
    ///
    /// Returns `false` if the user has no counter record.
    async fn reset(&self, user_id: &UserId, field: CounterField) -> Result<bool, DomainError>;

    /// Returns `None` if the user has no counter record.
    async fn find(&self, user_id: &UserId) -> Result<Option<UnreadCounterRecord>, DomainError>;

    /// Create an all-zero record; returns the existing record if present.
    async fn create(&self, user_id: &UserId) -> Result<UnreadCounterRecord, DomainError>;

    /// Returns `false` if there was no record to delete.
    async fn delete(&self, user_id: &UserId) -> Result<bool, DomainError>;
}
