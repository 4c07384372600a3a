use crate::config::{MailEncryption, MailerSettings};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Failed to build email message: {0}")]
    MessageBuild(String),
    #[error("Failed to send email: {0}")]
    SendFailed(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A message ready for delivery, paired with the transport configuration to deliver it with.
#[derive(Debug, Clone)]
pub struct ComposedMail {
    pub transport: MailerSettings,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
    pub message: Message,
}

/// Builds a message without touching the network. Delivery is the caller's job.
pub fn compose_message(
    settings: &MailerSettings,
    to: &str,
    subject: &str,
    text: &str,
    html: Option<&str>,
) -> Result<ComposedMail, MailError> {
    let builder = Message::builder()
        .from(
            settings
                .from_mailbox()
                .parse()
                .map_err(|e| MailError::MessageBuild(format!("Invalid from address: {}", e)))?,
        )
        .to(to
            .parse()
            .map_err(|e| MailError::MessageBuild(format!("Invalid to address: {}", e)))?)
        .subject(subject);

    let message = match html {
        Some(html) => builder.multipart(MultiPart::alternative_plain_html(
            text.to_string(),
            html.to_string(),
        )),
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(text.to_string()),
    }
    .map_err(|e| MailError::MessageBuild(e.to_string()))?;

    Ok(ComposedMail {
        transport: settings.clone(),
        to: to.to_string(),
        subject: subject.to_string(),
        text: text.to_string(),
        html: html.map(str::to_string),
        message,
    })
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: ComposedMail) -> Result<(), MailError>;
}

/// Delivers over SMTP using the settings carried by each message.
pub struct SmtpMailTransport;

impl SmtpMailTransport {
    fn build(settings: &MailerSettings) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let builder = match settings.encryption {
            MailEncryption::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| MailError::ConfigError(format!("SMTP relay error: {}", e)))?,
            MailEncryption::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                    .map_err(|e| MailError::ConfigError(format!("SMTP starttls error: {}", e)))?
            }
            MailEncryption::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            }
        };

        let builder = builder.port(settings.port);
        let builder = match settings.credentials() {
            Some((username, password)) => builder.credentials(Credentials::new(username, password)),
            None => builder,
        };

        Ok(builder.build())
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: ComposedMail) -> Result<(), MailError> {
        let mailer = Self::build(&mail.transport)?;

        mailer
            .send(mail.message)
            .await
            .map_err(|e| MailError::SendFailed(e.to_string()))?;

        Ok(())
    }
}

/// Logs messages instead of sending them; used when no SMTP credentials are configured.
pub struct LogMailTransport;

#[async_trait]
impl MailTransport for LogMailTransport {
    async fn send(&self, mail: ComposedMail) -> Result<(), MailError> {
        tracing::info!("📧 [LOG MAIL] Email to: {}", mail.to);
        tracing::info!("   Subject: {}", mail.subject);
        tracing::info!("   Text: {}", mail.text);
        if let Some(html) = &mail.html {
            tracing::info!("   Html: {}", html);
        }
        tracing::info!("   ---");
        Ok(())
    }
}

pub fn create_mail_transport(settings: &MailerSettings) -> Arc<dyn MailTransport> {
    if settings.credentials().is_some() {
        tracing::info!(
            "Using SMTP mail transport ({}:{})",
            settings.host,
            settings.port
        );
        Arc::new(SmtpMailTransport)
    } else {
        tracing::info!(
            "Mailer credentials not configured. Using log mail transport (emails will be logged to console)"
        );
        Arc::new(LogMailTransport)
    }
}

/// Sends mail in the background. The caller gets the task handle and may ignore it;
/// the outcome is only reported through the log.
#[derive(Clone)]
pub struct MailDispatcher {
    transport: Arc<dyn MailTransport>,
}

impl MailDispatcher {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    pub fn dispatch(&self, mail: ComposedMail) -> JoinHandle<()> {
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            let to = mail.to.clone();
            match transport.send(mail).await {
                Ok(()) => tracing::info!("✅ Email sent to {}", to),
                Err(e) => tracing::error!("🔴 Email to {} failed: {}", to, e),
            }
        })
    }
}
