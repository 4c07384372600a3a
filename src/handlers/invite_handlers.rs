use crate::auth::CurrentIdentity;
use crate::error::ActionResponse;
use crate::models::InviteRequest;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

pub const INVITE_SENT: &str = "Invite sent";

#[derive(Debug, Deserialize)]
pub struct InviteBody {
    pub receiver_id: String,
    pub email: String,
}

/// Invites a user into a workspace. Responds before the invite email is delivered.
pub async fn invite_member_handler(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(workspace_id): Path<String>,
    payload: Result<Json<InviteBody>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            return ActionResponse::new(StatusCode::BAD_REQUEST, Some(rejection.body_text()))
                .into_response()
        }
    };

    let request = InviteRequest {
        workspace_id,
        receiver_id: body.receiver_id,
        email: body.email,
    };

    match state
        .invitation_service
        .invite(identity.as_ref(), request)
        .await
    {
        // Delivery keeps running in the background; its outcome is only logged.
        Ok(_sent) => ActionResponse::ok(INVITE_SENT).into_response(),
        Err(e) => e.into_response(),
    }
}
