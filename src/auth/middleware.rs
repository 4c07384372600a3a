use super::identity::Identity;
use crate::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Identity resolved for the current request. Never rejects; handlers decide what a
/// missing identity means for their operation.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Option<Identity>);

impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = state
            .identity_provider
            .resolve_current_user(&parts.headers)
            .await;

        if identity.is_none() {
            tracing::debug!("No authenticated identity for {}", parts.uri.path());
        }

        Ok(CurrentIdentity(identity))
    }
}
