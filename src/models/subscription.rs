use super::UnknownVariant;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Pro,
}

impl SubscriptionPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Free => "FREE",
            SubscriptionPlan::Pro => "PRO",
        }
    }
}

impl TryFrom<String> for SubscriptionPlan {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "FREE" => Ok(SubscriptionPlan::Free),
            "PRO" => Ok(SubscriptionPlan::Pro),
            _ => Err(UnknownVariant {
                kind: "subscription plan",
                value,
            }),
        }
    }
}

// Plan-only projection used in profiles and search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSummary {
    pub plan: SubscriptionPlan,
}
