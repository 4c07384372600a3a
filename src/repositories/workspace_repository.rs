use super::RepositoryResult;
use crate::models::Workspace;
use async_trait::async_trait;
use sqlx::SqlitePool;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait WorkspaceRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Workspace>>;
    async fn list_for_user(&self, user_id: &str) -> RepositoryResult<Vec<Workspace>>;
}

pub struct SqliteWorkspaceRepository {
    pool: SqlitePool,
}

impl SqliteWorkspaceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkspaceRepository for SqliteWorkspaceRepository {
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Workspace>> {
        let workspace = sqlx::query_as::<_, Workspace>(
            "SELECT id, user_id, name, type, created_at FROM workspaces WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(workspace)
    }

    async fn list_for_user(&self, user_id: &str) -> RepositoryResult<Vec<Workspace>> {
        let workspaces = sqlx::query_as::<_, Workspace>(
            r#"
            SELECT id, user_id, name, type, created_at
            FROM workspaces
            WHERE user_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(workspaces)
    }
}
