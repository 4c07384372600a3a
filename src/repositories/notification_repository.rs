use super::{RepositoryError, RepositoryResult};
use crate::models::Notification;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait NotificationRepository: Send + Sync {
    /// `None` when no user has this external id.
    async fn list_for_external_id(
        &self,
        external_id: &str,
    ) -> RepositoryResult<Option<Vec<Notification>>>;
    async fn append(&self, user_id: &str, content: &str) -> RepositoryResult<Notification>;
}

pub struct SqliteNotificationRepository {
    pool: SqlitePool,
}

impl SqliteNotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    async fn list_for_external_id(
        &self,
        external_id: &str,
    ) -> RepositoryResult<Option<Vec<Notification>>> {
        let user_id: Option<String> =
            sqlx::query_scalar("SELECT id FROM users WHERE external_id = ?")
                .bind(external_id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(user_id) = user_id else {
            return Ok(None);
        };

        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, content, created_at
            FROM notifications
            WHERE user_id = ?
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(&user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(notifications))
    }

    async fn append(&self, user_id: &str, content: &str) -> RepositoryResult<Notification> {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO notifications (id, user_id, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&notification.id)
        .bind(&notification.user_id)
        .bind(&notification.content)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::classify)?;

        Ok(notification)
    }
}
