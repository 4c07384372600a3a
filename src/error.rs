use crate::models::{Notification, UserProfile};
use crate::services::{InvitationError, NotificationError, OnboardingError, SearchError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

pub const GENERIC_FAILURE: &str = "Oops! something went wrong";

/// Body shape shared by every API operation. The HTTP status always equals `status`.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T: Serialize> {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ActionResponse<T> {
    pub fn new(status: StatusCode, data: Option<T>) -> Self {
        Self {
            status: status.as_u16(),
            data,
        }
    }

    pub fn ok(data: T) -> Self {
        Self::new(StatusCode::OK, Some(data))
    }
}

impl ActionResponse<()> {
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, None)
    }
}

impl<T: Serialize> IntoResponse for ActionResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Onboarding answers with `user` instead of `data`.
#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl IntoResponse for OnboardingResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl OnboardingError {
    pub fn status(&self) -> StatusCode {
        match self {
            OnboardingError::Unauthenticated => StatusCode::FORBIDDEN,
            OnboardingError::NotCreated => StatusCode::BAD_REQUEST,
            OnboardingError::RepositoryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for OnboardingError {
    fn into_response(self) -> Response {
        if let OnboardingError::RepositoryError(e) = &self {
            tracing::error!("🔴 ERROR onboarding user: {}", e);
        }
        OnboardingResponse {
            status: self.status().as_u16(),
            user: None,
        }
        .into_response()
    }
}

impl SearchError {
    pub fn status(&self) -> StatusCode {
        match self {
            SearchError::Unauthenticated | SearchError::NoMatches => StatusCode::NOT_FOUND,
            SearchError::RepositoryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        if let SearchError::RepositoryError(e) = &self {
            tracing::error!("🔴 ERROR searching users: {}", e);
        }
        ActionResponse::empty(self.status()).into_response()
    }
}

impl NotificationError {
    pub fn status(&self) -> StatusCode {
        match self {
            NotificationError::Unauthenticated | NotificationError::Empty => {
                StatusCode::NOT_FOUND
            }
            NotificationError::RepositoryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for NotificationError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            NotificationError::Unauthenticated => ActionResponse::empty(status).into_response(),
            NotificationError::Empty => {
                ActionResponse::new(status, Some(Vec::<Notification>::new())).into_response()
            }
            NotificationError::RepositoryError(e) => {
                tracing::error!("🔴 ERROR listing notifications: {}", e);
                ActionResponse::new(status, Some(Vec::<Notification>::new())).into_response()
            }
        }
    }
}

impl InvitationError {
    pub fn status(&self) -> StatusCode {
        match self {
            InvitationError::Unauthenticated
            | InvitationError::SenderNotFound
            | InvitationError::WorkspaceNotFound => StatusCode::NOT_FOUND,
            InvitationError::InvitationFailed => StatusCode::BAD_REQUEST,
            InvitationError::RepositoryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for InvitationError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            InvitationError::Unauthenticated => ActionResponse::empty(status).into_response(),
            InvitationError::RepositoryError(e) => {
                tracing::error!("🔴 ERROR inviting member: {}", e);
                ActionResponse::new(status, Some(GENERIC_FAILURE)).into_response()
            }
            other => ActionResponse::new(status, Some(other.to_string())).into_response(),
        }
    }
}
