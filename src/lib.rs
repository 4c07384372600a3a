pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::sync::Arc;

use config::AppConfig;
use repositories::{
    SqliteInviteRepository, SqliteNotificationRepository, SqliteUserRepository,
    SqliteWorkspaceRepository,
};
use services::{
    InvitationService, MailDispatcher, MailTransport, NotificationService, UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub notification_service: Arc<NotificationService>,
    pub invitation_service: Arc<InvitationService>,
    pub identity_provider: Arc<dyn auth::IdentityProvider>,
    pub pool: sqlx::SqlitePool,
}

impl AppState {
    /// Wires repositories and services over one pool.
    pub fn build(
        pool: sqlx::SqlitePool,
        config: &AppConfig,
        identity_provider: Arc<dyn auth::IdentityProvider>,
        mail_transport: Arc<dyn MailTransport>,
    ) -> Self {
        let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
        let workspace_repository = Arc::new(SqliteWorkspaceRepository::new(pool.clone()));
        let invite_repository = Arc::new(SqliteInviteRepository::new(pool.clone()));
        let notification_repository = Arc::new(SqliteNotificationRepository::new(pool.clone()));

        let user_service = Arc::new(UserService::new(user_repository.clone()));
        let notification_service =
            Arc::new(NotificationService::new(notification_repository.clone()));
        let invitation_service = Arc::new(InvitationService::new(
            user_repository,
            workspace_repository,
            invite_repository,
            notification_repository,
            MailDispatcher::new(mail_transport),
            config.mailer.clone(),
            config.host_url.clone(),
        ));

        Self {
            user_service,
            notification_service,
            invitation_service,
            identity_provider,
            pool,
        }
    }
}
