use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use clipsync::{
    auth::{
        IDENTITY_EMAIL_HEADER, IDENTITY_FIRST_NAME_HEADER, IDENTITY_ID_HEADER,
        IDENTITY_LAST_NAME_HEADER,
    },
    handlers,
    models::WorkspaceType,
    test_utils::test_helpers::{self, RecordingTransport},
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

async fn build_app() -> anyhow::Result<(Router, SqlitePool, Arc<RecordingTransport>)> {
    let pool = test_helpers::create_test_db().await?;
    let transport = Arc::new(RecordingTransport::new());
    let app = handlers::router(test_helpers::test_state(pool.clone(), transport.clone()));
    Ok((app, pool, transport))
}

fn request_as(identity: Option<(&str, &str, &str, &str)>, method: &str, uri: &str) -> Request<Body> {
    request_with_body(identity, method, uri, Body::empty())
}

fn request_with_body(
    identity: Option<(&str, &str, &str, &str)>,
    method: &str,
    uri: &str,
    body: Body,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some((id, email, first, last)) = identity {
        builder = builder
            .header(IDENTITY_ID_HEADER, id)
            .header(IDENTITY_EMAIL_HEADER, email)
            .header(IDENTITY_FIRST_NAME_HEADER, first)
            .header(IDENTITY_LAST_NAME_HEADER, last);
    }

    builder.body(body).unwrap()
}

async fn json_body(response: axum::response::Response) -> anyhow::Result<Value> {
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&body)?)
}

const ALICE: (&str, &str, &str, &str) = ("user_alice", "alice@example.com", "alice", "smith");
const BOB: (&str, &str, &str, &str) = ("user_bob", "bob@example.com", "Bob", "Marley");

#[tokio::test]
async fn ensure_user_creates_then_returns_existing() -> anyhow::Result<()> {
    let (app, _pool, _transport) = build_app().await?;

    let response = app
        .clone()
        .oneshot(request_as(Some(ALICE), "GET", "/api/auth/user"))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await?;
    assert_eq!(body["status"], 201);
    assert_eq!(body["user"]["external_id"], "user_alice");
    assert_eq!(body["user"]["workspace"][0]["name"], "alice's Workspace");
    assert_eq!(body["user"]["workspace"][0]["type"], "PERSONAL");
    assert_eq!(body["user"]["subscription"]["plan"], "FREE");

    let response = app
        .oneshot(request_as(Some(ALICE), "GET", "/api/auth/user"))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["status"], 200);
    assert_eq!(body["user"]["email"], "alice@example.com");

    Ok(())
}

#[tokio::test]
async fn ensure_user_without_identity_is_forbidden() -> anyhow::Result<()> {
    let (app, _pool, _transport) = build_app().await?;

    let response = app.oneshot(request_as(None, "GET", "/api/auth/user")).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await?, json!({ "status": 403 }));

    Ok(())
}

#[tokio::test]
async fn search_returns_matches_or_404() -> anyhow::Result<()> {
    let (app, _pool, _transport) = build_app().await?;

    for identity in [ALICE, BOB] {
        app.clone()
            .oneshot(request_as(Some(identity), "GET", "/api/auth/user"))
            .await?;
    }

    let response = app
        .clone()
        .oneshot(request_as(Some(ALICE), "GET", "/api/users/search?query=BOB"))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["email"], "bob@example.com");

    let response = app
        .clone()
        .oneshot(request_as(Some(ALICE), "GET", "/api/users/search?query=zzz"))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await?, json!({ "status": 404 }));

    let response = app
        .oneshot(request_as(None, "GET", "/api/users/search?query=bob"))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn notifications_follow_invites() -> anyhow::Result<()> {
    let (app, pool, transport) = build_app().await?;

    let response = app
        .clone()
        .oneshot(request_as(Some(BOB), "GET", "/api/notifications"))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await?, json!({ "status": 404, "data": [] }));

    let response = app
        .clone()
        .oneshot(request_as(Some(BOB), "GET", "/api/auth/user"))
        .await?;
    let bob_id = json_body(response).await?["user"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let carol_id = test_helpers::insert_test_user(
        &pool,
        "user_carol",
        "carol@example.com",
        Some("Carol"),
        None,
    )
    .await?;
    let workspace_id =
        test_helpers::create_test_workspace(&pool, &bob_id, "W1", WorkspaceType::Public).await?;

    let payload = json!({ "receiver_id": carol_id, "email": "carol@example.com" });
    let response = app
        .clone()
        .oneshot(request_with_body(
            Some(BOB),
            "POST",
            &format!("/api/workspaces/{}/invites", workspace_id),
            Body::from(payload.to_string()),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await?,
        json!({ "status": 200, "data": "Invite sent" })
    );

    let response = app
        .oneshot(request_as(Some(BOB), "GET", "/api/notifications"))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(
        body["data"]["notifications"][0]["content"],
        "Bob Marley invited Bob into W1"
    );

    // Delivery runs in the background; give it a moment to land
    for _ in 0..50 {
        if !transport.sent().await.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(transport.sent().await.len(), 1);

    Ok(())
}

#[tokio::test]
async fn invite_into_unknown_workspace_is_404() -> anyhow::Result<()> {
    let (app, pool, _transport) = build_app().await?;

    app.clone()
        .oneshot(request_as(Some(BOB), "GET", "/api/auth/user"))
        .await?;

    let payload = json!({ "receiver_id": "whoever", "email": "carol@example.com" });
    let response = app
        .oneshot(request_with_body(
            Some(BOB),
            "POST",
            "/api/workspaces/missing/invites",
            Body::from(payload.to_string()),
        ))
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await?,
        json!({ "status": 404, "data": "workspace not found" })
    );
    assert_eq!(test_helpers::count_rows(&pool, "invites").await?, 0);

    Ok(())
}

#[tokio::test]
async fn invite_with_malformed_body_is_400() -> anyhow::Result<()> {
    let (app, _pool, _transport) = build_app().await?;

    let response = app
        .oneshot(request_with_body(
            Some(BOB),
            "POST",
            "/api/workspaces/w1/invites",
            Body::from("{\"email\": 42}"),
        ))
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await?["status"], 400);

    Ok(())
}

#[tokio::test]
async fn health_is_ok() -> anyhow::Result<()> {
    let (app, _pool, _transport) = build_app().await?;

    let response = app.oneshot(request_as(None, "GET", "/health")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
