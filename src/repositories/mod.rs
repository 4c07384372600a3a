pub mod invite_repository;
pub mod notification_repository;
pub mod user_repository;
pub mod workspace_repository;

pub use invite_repository::{InviteRepository, SqliteInviteRepository};
pub use notification_repository::{NotificationRepository, SqliteNotificationRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};
pub use workspace_repository::{SqliteWorkspaceRepository, WorkspaceRepository};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Record not found")]
    NotFound,
    #[error("Record already exists")]
    AlreadyExists,
    #[error("Referenced record does not exist")]
    InvalidReference,
}

impl RepositoryError {
    /// Maps constraint violations to their own variants; everything else stays a database error.
    pub fn classify(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return RepositoryError::AlreadyExists;
            }
            if db_err.is_foreign_key_violation() {
                return RepositoryError::InvalidReference;
            }
        }
        RepositoryError::Database(err)
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
