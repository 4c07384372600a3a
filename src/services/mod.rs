pub mod invitation_service;
pub mod mailer;
pub mod notification_service;
pub mod user_service;

pub use invitation_service::{InvitationError, InvitationService, InviteSent};
pub use mailer::{
    compose_message, create_mail_transport, ComposedMail, LogMailTransport, MailDispatcher,
    MailError, MailTransport, SmtpMailTransport,
};
pub use notification_service::{NotificationError, NotificationService};
pub use user_service::{EnsuredUser, OnboardingError, SearchError, UserService};
