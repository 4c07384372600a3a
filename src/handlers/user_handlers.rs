use crate::auth::CurrentIdentity;
use crate::error::{ActionResponse, OnboardingResponse};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

/// Returns the caller's user, creating it with its default workspace on first sight.
pub async fn ensure_user_handler(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Response {
    match state.user_service.ensure_user(identity.as_ref()).await {
        Ok(ensured) => OnboardingResponse {
            status: ensured.status().as_u16(),
            user: Some(ensured.into_profile()),
        }
        .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn search_users_handler(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Query(params): Query<SearchQuery>,
) -> Response {
    match state
        .user_service
        .search_users(identity.as_ref(), &params.query)
        .await
    {
        Ok(users) => ActionResponse::ok(users).into_response(),
        Err(e) => e.into_response(),
    }
}
