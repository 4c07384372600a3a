pub mod invite;
pub mod notification;
pub mod studio;
pub mod subscription;
pub mod user;
pub mod workspace;

pub use invite::{Invite, InviteRequest, NewInvite};
pub use notification::{Notification, NotificationList};
pub use studio::{Studio, StudioPreset};
pub use subscription::{SubscriptionPlan, SubscriptionSummary};
pub use user::{NewUser, SenderInfo, User, UserProfile, UserSearchResult};
pub use workspace::{Workspace, WorkspaceType};

/// Returned when a stored enum column holds a value this build does not know.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
