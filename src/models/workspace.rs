use super::UnknownVariant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkspaceType {
    Personal,
    Public,
}

impl WorkspaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceType::Personal => "PERSONAL",
            WorkspaceType::Public => "PUBLIC",
        }
    }
}

impl TryFrom<String> for WorkspaceType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PERSONAL" => Ok(WorkspaceType::Personal),
            "PUBLIC" => Ok(WorkspaceType::Public),
            _ => Err(UnknownVariant {
                kind: "workspace type",
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workspace {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[sqlx(rename = "type", try_from = "String")]
    #[serde(rename = "type")]
    pub workspace_type: WorkspaceType,
    pub created_at: DateTime<Utc>,
}

/// Name given to the workspace created alongside a new user.
pub fn personal_workspace_name(first_name: Option<&str>) -> String {
    format!("{}'s Workspace", first_name.unwrap_or_default())
}
