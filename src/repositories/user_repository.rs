use super::{RepositoryError, RepositoryResult};
use crate::models::{
    workspace::personal_workspace_name, NewUser, SenderInfo, Studio, StudioPreset,
    SubscriptionPlan, SubscriptionSummary, User, UserProfile, UserSearchResult, Workspace,
    WorkspaceType,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    async fn find_by_external_id(&self, external_id: &str)
        -> RepositoryResult<Option<UserProfile>>;
    /// Inserts the user with its studio, subscription and personal workspace in one transaction.
    async fn create_with_defaults(&self, new_user: NewUser) -> RepositoryResult<UserProfile>;
    async fn find_sender(&self, external_id: &str) -> RepositoryResult<Option<SenderInfo>>;
    async fn find_studio(&self, user_id: &str) -> RepositoryResult<Option<Studio>>;
    async fn search(
        &self,
        query: &str,
        exclude_external_id: &str,
    ) -> RepositoryResult<Vec<UserSearchResult>>;
    async fn list_users(&self, limit: Option<i64>, offset: Option<i64>)
        -> RepositoryResult<Vec<User>>;
}

#[derive(FromRow)]
struct SearchRow {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    image: Option<String>,
    email: String,
    plan: Option<String>,
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_profile(&self, user: User) -> RepositoryResult<UserProfile> {
        let workspaces = sqlx::query_as::<_, Workspace>(
            r#"
            SELECT id, user_id, name, type, created_at
            FROM workspaces
            WHERE user_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(&user.id)
        .fetch_all(&self.pool)
        .await?;

        let plan: Option<String> =
            sqlx::query_scalar("SELECT plan FROM subscriptions WHERE user_id = ?")
                .bind(&user.id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(UserProfile {
            user,
            workspaces,
            subscription: plan.map(plan_summary).transpose()?,
        })
    }
}

fn plan_summary(plan: String) -> RepositoryResult<SubscriptionSummary> {
    let plan = SubscriptionPlan::try_from(plan)
        .map_err(|e| RepositoryError::Database(sqlx::Error::Decode(Box::new(e))))?;
    Ok(SubscriptionSummary { plan })
}

/// Case-insensitive substring match on first name, last name or email.
///
/// Folding happens here rather than in SQL: SQLite's `LOWER()` only folds ASCII.
fn matches_query(row: &SearchRow, needle: &str) -> bool {
    [row.first_name.as_deref(), row.last_name.as_deref(), Some(row.email.as_str())]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> RepositoryResult<Option<UserProfile>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, external_id, email, first_name, last_name, image, created_at
            FROM users
            WHERE external_id = ?
            "#,
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;

        match user {
            Some(user) => Ok(Some(self.load_profile(user).await?)),
            None => Ok(None),
        }
    }

    async fn create_with_defaults(&self, new_user: NewUser) -> RepositoryResult<UserProfile> {
        let user_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, external_id, email, first_name, last_name, image, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user_id)
        .bind(&new_user.external_id)
        .bind(&new_user.email)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.image)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::classify)?;

        sqlx::query("INSERT INTO studios (id, user_id, preset) VALUES (?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(&user_id)
            .bind(StudioPreset::default().as_str())
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::classify)?;

        sqlx::query(
            r#"
            INSERT INTO subscriptions (id, user_id, plan, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&user_id)
        .bind(SubscriptionPlan::default().as_str())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::classify)?;

        sqlx::query(
            "INSERT INTO workspaces (id, user_id, name, type, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&user_id)
        .bind(personal_workspace_name(new_user.first_name.as_deref()))
        .bind(WorkspaceType::Personal.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::classify)?;

        tx.commit().await?;

        self.find_by_external_id(&new_user.external_id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_sender(&self, external_id: &str) -> RepositoryResult<Option<SenderInfo>> {
        let sender = sqlx::query_as::<_, SenderInfo>(
            "SELECT id, first_name, last_name FROM users WHERE external_id = ?",
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sender)
    }

    async fn find_studio(&self, user_id: &str) -> RepositoryResult<Option<Studio>> {
        let studio = sqlx::query_as::<_, Studio>(
            "SELECT id, user_id, screen, mic, camera, preset FROM studios WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(studio)
    }

    async fn search(
        &self,
        query: &str,
        exclude_external_id: &str,
    ) -> RepositoryResult<Vec<UserSearchResult>> {
        let needle = query.to_lowercase();

        let rows = sqlx::query_as::<_, SearchRow>(
            r#"
            SELECT u.id, u.first_name, u.last_name, u.image, u.email, s.plan
            FROM users u
            LEFT JOIN subscriptions s ON s.user_id = u.id
            WHERE u.external_id != ?
            ORDER BY u.created_at ASC, u.id ASC
            "#,
        )
        .bind(exclude_external_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .filter(|r| matches_query(r, &needle))
            .map(|r| -> RepositoryResult<UserSearchResult> {
                Ok(UserSearchResult {
                    id: r.id,
                    first_name: r.first_name,
                    last_name: r.last_name,
                    image: r.image,
                    email: r.email,
                    subscription: r.plan.map(plan_summary).transpose()?,
                })
            })
            .collect()
    }

    async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> RepositoryResult<Vec<User>> {
        let limit = limit.unwrap_or(100);
        let offset = offset.unwrap_or(0);

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, external_id, email, first_name, last_name, image, created_at
            FROM users
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
