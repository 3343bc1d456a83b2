//! User directory port.
//!
//! Users are owned by the account service; the messaging core only looks
//! up the attributes eligibility rules and presence updates need.

use crate::domain::chat::UserProfile;
use crate::domain::foundation::{DomainError, UserId};
use async_trait::async_trait;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_directory_is_object_safe() {
        fn _accepts_dyn(_directory: &dyn UserDirectory) {}
    }
}
