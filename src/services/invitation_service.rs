use crate::auth::Identity;
use crate::config::MailerSettings;
use crate::models::{
    invite::{accept_link, invite_content},
    Invite, InviteRequest, NewInvite,
};
use crate::repositories::{
    InviteRepository, NotificationRepository, RepositoryError, UserRepository,
    WorkspaceRepository,
};
use crate::services::mailer::{compose_message, MailDispatcher};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub const INVITE_SUBJECT: &str = "You got an invitation";

#[derive(Debug, thiserror::Error)]
pub enum InvitationError {
    #[error("No authenticated identity")]
    Unauthenticated,
    // The caller's own user row is missing. The message is kept as clients see it.
    #[error("recipient not found")]
    SenderNotFound,
    #[error("workspace not found")]
    WorkspaceNotFound,
    #[error("invitation failed")]
    InvitationFailed,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// A created invite and the background delivery of its email, if one was composed.
#[derive(Debug)]
pub struct InviteSent {
    pub invite: Invite,
    pub delivery: Option<JoinHandle<()>>,
}

pub struct InvitationService {
    users: Arc<dyn UserRepository>,
    workspaces: Arc<dyn WorkspaceRepository>,
    invites: Arc<dyn InviteRepository>,
    notifications: Arc<dyn NotificationRepository>,
    dispatcher: MailDispatcher,
    mailer: MailerSettings,
    host_url: String,
}

impl InvitationService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        workspaces: Arc<dyn WorkspaceRepository>,
        invites: Arc<dyn InviteRepository>,
        notifications: Arc<dyn NotificationRepository>,
        dispatcher: MailDispatcher,
        mailer: MailerSettings,
        host_url: String,
    ) -> Self {
        Self {
            users,
            workspaces,
            invites,
            notifications,
            dispatcher,
            mailer,
            host_url,
        }
    }

    /// Invites `receiver_id` into the workspace and emails `email` an acceptance link.
    ///
    /// The invite row and the notification are written separately; a fault between
    /// them leaves the invite without its notification. Mail delivery is not awaited.
    pub async fn invite(
        &self,
        identity: Option<&Identity>,
        request: InviteRequest,
    ) -> Result<InviteSent, InvitationError> {
        let identity = identity.ok_or(InvitationError::Unauthenticated)?;

        let sender = self
            .users
            .find_sender(&identity.id)
            .await?
            .ok_or(InvitationError::SenderNotFound)?;

        let workspace = self
            .workspaces
            .find_by_id(&request.workspace_id)
            .await?
            .ok_or(InvitationError::WorkspaceNotFound)?;

        let content = invite_content(&workspace.name);
        let invite = match self
            .invites
            .create(NewInvite {
                sender_id: sender.id.clone(),
                receiver_id: request.receiver_id.clone(),
                workspace_id: request.workspace_id.clone(),
                content: content.clone(),
            })
            .await
        {
            Ok(invite) => invite,
            Err(RepositoryError::InvalidReference) => {
                tracing::warn!(
                    "Invite into {} references unknown receiver {}",
                    request.workspace_id,
                    request.receiver_id
                );
                return Err(InvitationError::InvitationFailed);
            }
            Err(e) => return Err(e.into()),
        };

        // Recorded on the sender's own list.
        let notice = format!(
            "{} {} invited {} into {}",
            identity.first_name.as_deref().unwrap_or_default(),
            identity.last_name.as_deref().unwrap_or_default(),
            sender.first_name.as_deref().unwrap_or_default(),
            workspace.name
        );
        self.notifications.append(&sender.id, &notice).await?;

        let html = format!(
            r#"<a href="{}" style="background-color: #000; padding: 5px 10px; border-radius: 10px;">Accept Invite</a>"#,
            accept_link(&self.host_url, &invite.id)
        );

        let delivery =
            match compose_message(&self.mailer, &request.email, INVITE_SUBJECT, &content, Some(&html))
            {
                Ok(mail) => Some(self.dispatcher.dispatch(mail)),
                Err(e) => {
                    tracing::error!("🔴 Could not compose invite email for {}: {}", invite.id, e);
                    None
                }
            };

        tracing::info!(
            "Invite {} sent by {} into workspace {}",
            invite.id,
            sender.id,
            workspace.id
        );

        Ok(InviteSent { invite, delivery })
    }
}
