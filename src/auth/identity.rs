use crate::config::IdentitySettings;
use crate::models::NewUser;
use async_trait::async_trait;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

pub const IDENTITY_ID_HEADER: &str = "x-identity-id";
pub const IDENTITY_EMAIL_HEADER: &str = "x-identity-email";
pub const IDENTITY_FIRST_NAME_HEADER: &str = "x-identity-first-name";
pub const IDENTITY_LAST_NAME_HEADER: &str = "x-identity-last-name";
pub const IDENTITY_IMAGE_URL_HEADER: &str = "x-identity-image-url";
pub const IDENTITY_PROXY_SECRET_HEADER: &str = "x-identity-proxy-secret";

/// The authenticated principal of the current request, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

impl From<&Identity> for NewUser {
    fn from(identity: &Identity) -> Self {
        NewUser {
            external_id: identity.id.clone(),
            email: identity.email.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            image: identity.image_url.clone(),
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `None` when the request carries no authenticated identity.
    async fn resolve_current_user(&self, headers: &HeaderMap) -> Option<Identity>;
}

/// Reads the identity forwarded by the authenticating gateway in front of this service.
///
/// When a proxy secret is configured, headers are only trusted if the request also
/// carries the matching `x-identity-proxy-secret`.
pub struct ProxyIdentityProvider {
    settings: IdentitySettings,
}

impl ProxyIdentityProvider {
    pub fn new(settings: IdentitySettings) -> Self {
        Self { settings }
    }

    fn is_trusted(&self, headers: &HeaderMap) -> bool {
        match &self.settings.proxy_secret {
            Some(expected) => header_value(headers, IDENTITY_PROXY_SECRET_HEADER)
                .map(|given| given == *expected)
                .unwrap_or(false),
            None => true,
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl IdentityProvider for ProxyIdentityProvider {
    async fn resolve_current_user(&self, headers: &HeaderMap) -> Option<Identity> {
        if !self.is_trusted(headers) {
            tracing::warn!("Ignoring identity headers without a valid proxy secret");
            return None;
        }

        Some(Identity {
            id: header_value(headers, IDENTITY_ID_HEADER)?,
            email: header_value(headers, IDENTITY_EMAIL_HEADER)?,
            first_name: header_value(headers, IDENTITY_FIRST_NAME_HEADER),
            last_name: header_value(headers, IDENTITY_LAST_NAME_HEADER),
            image_url: header_value(headers, IDENTITY_IMAGE_URL_HEADER),
        })
    }
}
