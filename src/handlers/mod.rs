pub mod invite_handlers;
pub mod notification_handlers;
pub mod user_handlers;

pub use invite_handlers::invite_member_handler;
pub use notification_handlers::list_notifications_handler;
pub use user_handlers::{ensure_user_handler, search_users_handler};

use crate::error::ActionResponse;
use crate::AppState;
use axum::{
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub async fn health_handler() -> impl IntoResponse {
    ActionResponse::ok("ok")
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/user", get(ensure_user_handler))
        .route("/users/search", get(search_users_handler))
        .route("/notifications", get(list_notifications_handler))
        .route(
            "/workspaces/{workspace_id}/invites",
            post(invite_member_handler),
        );

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
