use super::{RepositoryError, RepositoryResult};
use crate::models::{Invite, NewInvite};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait InviteRepository: Send + Sync {
    async fn create(&self, invite: NewInvite) -> RepositoryResult<Invite>;
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Invite>>;
    async fn list_for_workspace(&self, workspace_id: &str) -> RepositoryResult<Vec<Invite>>;
}

pub struct SqliteInviteRepository {
    pool: SqlitePool,
}

impl SqliteInviteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InviteRepository for SqliteInviteRepository {
    async fn create(&self, invite: NewInvite) -> RepositoryResult<Invite> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO invites (id, sender_id, receiver_id, workspace_id, content, accepted, created_at)
            VALUES (?, ?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(&id)
        .bind(&invite.sender_id)
        .bind(&invite.receiver_id)
        .bind(&invite.workspace_id)
        .bind(&invite.content)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::classify)?;

        Ok(Invite {
            id,
            sender_id: invite.sender_id,
            receiver_id: invite.receiver_id,
            workspace_id: invite.workspace_id,
            content: invite.content,
            accepted: false,
            created_at,
        })
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Invite>> {
        let invite = sqlx::query_as::<_, Invite>(
            r#"
            SELECT id, sender_id, receiver_id, workspace_id, content, accepted, created_at
            FROM invites
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invite)
    }

    async fn list_for_workspace(&self, workspace_id: &str) -> RepositoryResult<Vec<Invite>> {
        let invites = sqlx::query_as::<_, Invite>(
            r#"
            SELECT id, sender_id, receiver_id, workspace_id, content, accepted, created_at
            FROM invites
            WHERE workspace_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(invites)
    }
}
