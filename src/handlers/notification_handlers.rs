use crate::auth::CurrentIdentity;
use crate::error::ActionResponse;
use crate::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

pub async fn list_notifications_handler(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Response {
    match state
        .notification_service
        .list_notifications(identity.as_ref())
        .await
    {
        Ok(list) => ActionResponse::ok(list).into_response(),
        Err(e) => e.into_response(),
    }
}
