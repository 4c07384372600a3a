use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invite {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub workspace_id: String,
    pub content: String,
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInvite {
    pub sender_id: String,
    pub receiver_id: String,
    pub workspace_id: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct InviteRequest {
    pub workspace_id: String,
    pub receiver_id: String,
    pub email: String,
}

pub fn invite_content(workspace_name: &str) -> String {
    format!(
        "You are invited to join {} Workspace, click accept to confirm",
        workspace_name
    )
}

pub fn accept_link(host_url: &str, invite_id: &str) -> String {
    format!("{}/invite/{}", host_url.trim_end_matches('/'), invite_id)
}
