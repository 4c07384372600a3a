pub mod test_helpers {
    use crate::auth::{Identity, IdentityProvider, ProxyIdentityProvider};
    use crate::config::{AppConfig, IdentitySettings, MailerSettings};
    use crate::db::MIGRATOR;
    use crate::models::WorkspaceType;
    use crate::services::{ComposedMail, MailError, MailTransport};
    use crate::AppState;
    use async_trait::async_trait;
    use chrono::Utc;
    use sqlx::{
        sqlite::{SqliteConnectOptions, SqlitePoolOptions},
        SqlitePool,
    };
    use std::str::FromStr;
    use std::sync::Arc;
    use tempfile::NamedTempFile;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    pub const TEST_HOST_URL: &str = "https://clipsync.test";

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        // Run migrations
        MIGRATOR.run(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    /// Useful when several connections must see the same data
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        // Run migrations
        MIGRATOR.run(&pool).await?;

        Ok((pool, temp_file))
    }

    /// Insert a bare user row (no studio, subscription or workspace)
    pub async fn insert_test_user(
        pool: &SqlitePool,
        external_id: &str,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<String, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO users (id, external_id, email, first_name, last_name, image, created_at)
            VALUES (?, ?, ?, ?, ?, NULL, ?)
            "#,
        )
        .bind(&id)
        .bind(external_id)
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(id)
    }

    /// Create a workspace owned by `owner_id`
    pub async fn create_test_workspace(
        pool: &SqlitePool,
        owner_id: &str,
        name: &str,
        workspace_type: WorkspaceType,
    ) -> Result<String, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO workspaces (id, user_id, name, type, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(owner_id)
        .bind(name)
        .bind(workspace_type.as_str())
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(id)
    }

    pub async fn count_rows(pool: &SqlitePool, table: &str) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        sqlx::query_scalar(&sql).fetch_one(pool).await
    }

    pub fn test_identity(id: &str, email: &str, first_name: &str, last_name: &str) -> Identity {
        Identity {
            id: id.to_string(),
            email: email.to_string(),
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            image_url: None,
        }
    }

    pub fn test_config() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            host_url: TEST_HOST_URL.to_string(),
            mailer: MailerSettings::default(),
            identity: IdentitySettings::default(),
            payment_secret: None,
        }
    }

    /// Application state wired over `pool`, trusting identity headers and recording mail.
    pub fn test_state(pool: SqlitePool, transport: Arc<RecordingTransport>) -> AppState {
        let identity_provider: Arc<dyn IdentityProvider> =
            Arc::new(ProxyIdentityProvider::new(IdentitySettings::default()));
        AppState::build(pool, &test_config(), identity_provider, transport)
    }

    /// Keeps every message it is asked to send. In failing mode it still records
    /// the message, then reports a send failure.
    #[derive(Default)]
    pub struct RecordingTransport {
        sent: Mutex<Vec<ComposedMail>>,
        fail: bool,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub async fn sent(&self) -> Vec<ComposedMail> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, mail: ComposedMail) -> Result<(), MailError> {
            self.sent.lock().await.push(mail);
            if self.fail {
                return Err(MailError::SendFailed("connection refused".to_string()));
            }
            Ok(())
        }
    }
}

// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}
