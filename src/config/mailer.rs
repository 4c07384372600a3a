use super::{non_empty_var, parse_var, ConfigError};
use std::env;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_FROM_ADDRESS: &str = "no-reply@localhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailEncryption {
    /// TLS from the first byte (SMTPS, port 465)
    Tls,
    StartTls,
    None,
}

impl std::str::FromStr for MailEncryption {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tls" => Ok(MailEncryption::Tls),
            "starttls" => Ok(MailEncryption::StartTls),
            "none" => Ok(MailEncryption::None),
            _ => Err(()),
        }
    }
}

/// SMTP transport configuration.
#[derive(Debug, Clone)]
pub struct MailerSettings {
    pub host: String,
    pub port: u16,
    pub encryption: MailEncryption,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_name: String,
}

impl Default for MailerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            encryption: MailEncryption::Tls,
            username: None,
            password: None,
            from_name: "ClipSync".to_string(),
        }
    }
}

impl MailerSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let encryption = match env::var("MAILER_ENCRYPTION") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "MAILER_ENCRYPTION",
                value,
            })?,
            Err(_) => defaults.encryption,
        };

        Ok(Self {
            host: non_empty_var("MAILER_HOST").unwrap_or(defaults.host),
            port: parse_var("MAILER_PORT", defaults.port)?,
            encryption,
            username: non_empty_var("MAILER_EMAIL"),
            password: non_empty_var("MAILER_PASSWORD"),
            from_name: non_empty_var("MAILER_FROM_NAME").unwrap_or(defaults.from_name),
        })
    }

    /// Username and password, when both are configured.
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        }
    }

    pub fn from_mailbox(&self) -> String {
        let address = self.username.as_deref().unwrap_or(DEFAULT_FROM_ADDRESS);
        format!("{} <{}>", self.from_name, address)
    }
}
