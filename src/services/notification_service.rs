use crate::auth::Identity;
use crate::models::NotificationList;
use crate::repositories::{notification_repository::NotificationRepository, RepositoryError};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("No authenticated identity")]
    Unauthenticated,
    #[error("No notifications")]
    Empty,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    /// The caller's notifications, oldest first. An unknown user reads as an empty list.
    pub async fn list_notifications(
        &self,
        identity: Option<&Identity>,
    ) -> Result<NotificationList, NotificationError> {
        let identity = identity.ok_or(NotificationError::Unauthenticated)?;

        let notifications = self
            .repository
            .list_for_external_id(&identity.id)
            .await?
            .unwrap_or_default();

        if notifications.is_empty() {
            return Err(NotificationError::Empty);
        }

        Ok(NotificationList {
            count: notifications.len() as i64,
            notifications,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Notification;
    use crate::repositories::notification_repository::MockNotificationRepository;
    use chrono::Utc;
    use mockall::predicate::*;

    fn identity() -> Identity {
        Identity {
            id: "user_bob".to_string(),
            email: "bob@example.com".to_string(),
            first_name: Some("Bob".to_string()),
            last_name: Some("Stone".to_string()),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_unknown_user_reads_as_empty() {
        let mut mock_repo = MockNotificationRepository::new();
        mock_repo
            .expect_list_for_external_id()
            .with(eq("user_bob"))
            .returning(|_| Box::pin(async { Ok(None) }));

        let service = NotificationService::new(Arc::new(mock_repo));
        let result = service.list_notifications(Some(&identity())).await;

        assert!(matches!(result, Err(NotificationError::Empty)));
    }

    #[tokio::test]
    async fn test_lists_notifications_with_count() {
        let mut mock_repo = MockNotificationRepository::new();
        mock_repo.expect_list_for_external_id().returning(|_| {
            Box::pin(async {
                Ok(Some(vec![Notification {
                    id: "n-1".to_string(),
                    user_id: "u-bob".to_string(),
                    content: "hello".to_string(),
                    created_at: Utc::now(),
                }]))
            })
        });

        let service = NotificationService::new(Arc::new(mock_repo));
        let list = service
            .list_notifications(Some(&identity()))
            .await
            .expect("Expected Ok result");

        assert_eq!(list.count, 1);
        assert_eq!(list.notifications[0].content, "hello");
    }

    #[tokio::test]
    async fn test_requires_identity() {
        let service = NotificationService::new(Arc::new(MockNotificationRepository::new()));
        let result = service.list_notifications(None).await;
        assert!(matches!(result, Err(NotificationError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_repository_fault_is_propagated() {
        let mut mock_repo = MockNotificationRepository::new();
        mock_repo.expect_list_for_external_id().returning(|_| {
            Box::pin(async { Err(RepositoryError::Database(sqlx::Error::PoolTimedOut)) })
        });

        let service = NotificationService::new(Arc::new(mock_repo));
        let result = service.list_notifications(Some(&identity())).await;

        assert!(matches!(
            result,
            Err(NotificationError::RepositoryError(RepositoryError::Database(_)))
        ));
    }
}
