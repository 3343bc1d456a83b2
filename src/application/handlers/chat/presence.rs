//! PresenceHandler - Announces users going online or offline.

use std::sync::Arc;

use crate::domain::chat::{ChatError, PresenceStatus, RoomEvent};
use crate::domain::foundation::UserId;
use crate::ports::{RoomBroadcaster, UserDirectory};

/// Presence change reported by the authentication flow.
#[derive(Debug, Clone)]
pub struct PresenceCommand {
    pub user_id: UserId,
    /// Display name; looked up in the user directory when absent.
    pub name: Option<String>,
    pub status: PresenceStatus,
}

pub struct PresenceHandler {
    broadcaster: Arc<dyn RoomBroadcaster>,
    directory: Arc<dyn UserDirectory>,
}

impl PresenceHandler {
    pub fn new(broadcaster: Arc<dyn RoomBroadcaster>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            broadcaster,
            directory,
        }
    }

    /// Broadcasts `userStatus` to every connection. Returns how many
    /// connections it was handed to.
    pub async fn notify(&self, cmd: PresenceCommand) -> Result<usize, ChatError> {
        let name = match cmd.name.filter(|n| !n.trim().is_empty()) {
            Some(name) => name,
            None => {
                let profile = self
                    .directory
                    .find_by_id(&cmd.user_id)
                    .await?
                    .ok_or(ChatError::UserNotFound(cmd.user_id))?;
                profile.name.unwrap_or(profile.email)
            }
        };

        let delivered = self
            .broadcaster
            .to_all(RoomEvent::UserStatus {
                id: cmd.user_id,
                online: cmd.status,
                name,
            })
            .await;

        tracing::debug!(user_id = %cmd.user_id, status = ?cmd.status, delivered, "presence broadcast");
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryChatStore;
    use crate::application::handlers::chat::test_support::{Delivery, RecordingBroadcaster};
    use crate::domain::chat::{Role, UserProfile};

    #[tokio::test]
    async fn explicit_name_is_broadcast_to_everyone() {
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let handler = PresenceHandler::new(broadcaster.clone(), Arc::new(InMemoryChatStore::new()));
        let user_id = UserId::new();

        handler
            .notify(PresenceCommand {
                user_id,
                name: Some("Ana".to_string()),
                status: PresenceStatus::Online,
            })
            .await
            .unwrap();

        assert_eq!(
            broadcaster.deliveries(),
            vec![Delivery::AllExcept(
                None,
                RoomEvent::UserStatus {
                    id: user_id,
                    online: PresenceStatus::Online,
                    name: "Ana".to_string(),
                }
            )]
        );
    }

    #[tokio::test]
    async fn missing_name_falls_back_to_directory() {
        let store = Arc::new(InMemoryChatStore::new());
        let profile = UserProfile {
            id: UserId::new(),
            email: "t@x".to_string(),
            name: Some("Teacher Tom".to_string()),
            role: Role::Teacher,
            language: None,
            assigned_teacher_id: None,
        };
        store.add_user(profile.clone());
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let handler = PresenceHandler::new(broadcaster.clone(), store);

        handler
            .notify(PresenceCommand {
                user_id: profile.id,
                name: None,
                status: PresenceStatus::Offline,
            })
            .await
            .unwrap();

        match broadcaster.deliveries()[0].event() {
            RoomEvent::UserStatus { name, online, .. } => {
                assert_eq!(name, "Teacher Tom");
                assert_eq!(*online, PresenceStatus::Offline);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_user_without_name_is_not_found() {
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let handler = PresenceHandler::new(broadcaster.clone(), Arc::new(InMemoryChatStore::new()));
        let user_id = UserId::new();

        let result = handler
            .notify(PresenceCommand {
                user_id,
                name: None,
                status: PresenceStatus::Online,
            })
            .await;

        assert_eq!(result, Err(ChatError::UserNotFound(user_id)));
        assert!(broadcaster.deliveries().is_empty());
    }
}
