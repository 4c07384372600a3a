pub mod mailer;

pub use mailer::{MailEncryption, MailerSettings};

use std::env;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Trust settings for identity headers forwarded by the identity-provider gateway.
#[derive(Debug, Clone, Default)]
pub struct IdentitySettings {
    pub proxy_secret: Option<String>,
}

impl IdentitySettings {
    pub fn from_env() -> Self {
        Self {
            proxy_secret: non_empty_var("IDENTITY_PROXY_SECRET"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Public base URL used to build links in outgoing mail.
    pub host_url: String,
    pub mailer: MailerSettings,
    pub identity: IdentitySettings,
    // Loaded for the billing integration; nothing calls the payment provider yet.
    pub payment_secret: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            non_empty_var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var("PORT", 8080)?;
        let host_url =
            env::var("HOST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            database_url,
            host,
            port,
            host_url,
            mailer: MailerSettings::from_env()?,
            identity: IdentitySettings::from_env(),
            payment_secret: non_empty_var("STRIPE_CLIENT_SECRET"),
        })
    }
}

pub(crate) fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

pub(crate) fn parse_var<T: std::str::FromStr>(
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
