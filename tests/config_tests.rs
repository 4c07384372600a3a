use std::{collections::HashMap, env};

use clipsync::config::{AppConfig, ConfigError, MailEncryption, MailerSettings};
use serial_test::serial;

const CONFIG_KEYS: &[&str] = &[
    "DATABASE_URL",
    "HOST",
    "PORT",
    "HOST_URL",
    "MAILER_HOST",
    "MAILER_PORT",
    "MAILER_ENCRYPTION",
    "MAILER_EMAIL",
    "MAILER_PASSWORD",
    "MAILER_FROM_NAME",
    "STRIPE_CLIENT_SECRET",
    "IDENTITY_PROXY_SECRET",
];

#[derive(Default)]
struct EnvGuard {
    original: HashMap<String, Option<String>>,
}

impl EnvGuard {
    /// Starts from an environment with none of the config keys set.
    fn clean() -> Self {
        let mut guard = Self::default();
        for key in CONFIG_KEYS {
            guard.remove(key);
        }
        guard
    }

    fn set(&mut self, key: &str, value: impl Into<String>) {
        self.original
            .entry(key.to_string())
            .or_insert_with(|| env::var(key).ok());
        env::set_var(key, value.into());
    }

    fn remove(&mut self, key: &str) {
        self.original
            .entry(key.to_string())
            .or_insert_with(|| env::var(key).ok());
        env::remove_var(key);
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.original.drain() {
            match value {
                Some(v) => env::set_var(&key, v),
                None => env::remove_var(&key),
            }
        }
    }
}

#[test]
#[serial]
fn database_url_is_required() {
    let _env = EnvGuard::clean();

    let result = AppConfig::from_env();
    assert!(matches!(result, Err(ConfigError::Missing("DATABASE_URL"))));
}

#[test]
#[serial]
fn defaults_apply_when_unset() {
    let mut env = EnvGuard::clean();
    env.set("DATABASE_URL", "sqlite://data/clipsync.db");

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
    assert_eq!(config.host_url, "http://localhost:3000");
    assert_eq!(config.mailer.host, "smtp.gmail.com");
    assert_eq!(config.mailer.port, 465);
    assert_eq!(config.mailer.encryption, MailEncryption::Tls);
    assert!(config.mailer.credentials().is_none());
    assert!(config.identity.proxy_secret.is_none());
    assert!(config.payment_secret.is_none());
}

#[test]
#[serial]
fn mailer_settings_read_from_env() {
    let mut env = EnvGuard::clean();
    env.set("MAILER_HOST", "smtp.example.com");
    env.set("MAILER_PORT", "587");
    env.set("MAILER_ENCRYPTION", "STARTTLS");
    env.set("MAILER_EMAIL", "mailer@example.com");
    env.set("MAILER_PASSWORD", "app-password");

    let settings = MailerSettings::from_env().unwrap();
    assert_eq!(settings.host, "smtp.example.com");
    assert_eq!(settings.port, 587);
    assert_eq!(settings.encryption, MailEncryption::StartTls);
    assert_eq!(
        settings.credentials(),
        Some(("mailer@example.com".to_string(), "app-password".to_string()))
    );
    assert_eq!(settings.from_mailbox(), "ClipSync <mailer@example.com>");
}

#[test]
#[serial]
fn invalid_values_are_rejected() {
    let mut env = EnvGuard::clean();
    env.set("DATABASE_URL", "sqlite::memory:");
    env.set("PORT", "eighty");

    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::Invalid { key: "PORT", .. })
    ));

    env.set("PORT", "8080");
    env.set("MAILER_ENCRYPTION", "ssl3");
    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::Invalid {
            key: "MAILER_ENCRYPTION",
            ..
        })
    ));
}

#[test]
#[serial]
fn blank_secrets_count_as_unset() {
    let mut env = EnvGuard::clean();
    env.set("DATABASE_URL", "sqlite::memory:");
    env.set("IDENTITY_PROXY_SECRET", "   ");
    env.set("STRIPE_CLIENT_SECRET", "sk_test_123");

    let config = AppConfig::from_env().unwrap();
    assert!(config.identity.proxy_secret.is_none());
    assert_eq!(config.payment_secret.as_deref(), Some("sk_test_123"));
}
