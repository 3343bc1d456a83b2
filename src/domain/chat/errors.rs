//! Chat-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, MessageId, UserId, ValidationError};

/// Errors surfaced by chat operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    #[error("Unread counters not found for user: {0}")]
    UserNotFound(UserId),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl ChatError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ChatError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ChatError::Validation { .. } => ErrorCode::ValidationFailed,
            ChatError::MessageNotFound(_) => ErrorCode::MessageNotFound,
            ChatError::UserNotFound(_) => ErrorCode::UserNotFound,
            ChatError::StorageUnavailable(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<ValidationError> for ChatError {
    fn from(err: ValidationError) -> Self {
        ChatError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for ChatError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => ChatError::Validation {
                field: err.details.get("field").cloned().unwrap_or_default(),
                message: err.message,
            },
            _ => ChatError::StorageUnavailable(err.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_become_storage_unavailable() {
        let err: ChatError = DomainError::database("Failed to insert chat", "timeout").into();
        assert!(matches!(err, ChatError::StorageUnavailable(_)));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn domain_validation_keeps_field() {
        let err: ChatError = DomainError::validation("room", "Room is required").into();
        assert_eq!(
            err,
            ChatError::Validation {
                field: "room".to_string(),
                message: "Room is required".to_string(),
            }
        );
    }

    #[test]
    fn value_object_errors_become_validation() {
        let err: ChatError = ValidationError::empty_field("userId").into();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert!(err.to_string().contains("userId"));
    }
}
