use super::UnknownVariant;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudioPreset {
    #[default]
    SD,
    HD,
}

impl StudioPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudioPreset::SD => "SD",
            StudioPreset::HD => "HD",
        }
    }
}

impl TryFrom<String> for StudioPreset {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "SD" => Ok(StudioPreset::SD),
            "HD" => Ok(StudioPreset::HD),
            _ => Err(UnknownVariant {
                kind: "studio preset",
                value,
            }),
        }
    }
}

/// Recording-device preferences, one per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Studio {
    pub id: String,
    pub user_id: String,
    pub screen: Option<String>,
    pub mic: Option<String>,
    pub camera: Option<String>,
    #[sqlx(try_from = "String")]
    pub preset: StudioPreset,
}
