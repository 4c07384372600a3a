use clipsync::{
    auth::ProxyIdentityProvider, config::AppConfig, db, handlers, services, AppState,
};

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
};
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clipsync=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    if config.payment_secret.is_none() {
        tracing::warn!("STRIPE_CLIENT_SECRET not set; billing stays disabled");
    }
    if config.identity.proxy_secret.is_none() {
        tracing::warn!(
            "IDENTITY_PROXY_SECRET not set; identity headers are trusted from any caller"
        );
    }

    // Database connection and migrations
    let pool = db::connect_and_migrate(&config.database_url).await?;

    let identity_provider = Arc::new(ProxyIdentityProvider::new(config.identity.clone()));
    let mail_transport = services::create_mail_transport(&config.mailer);
    let app_state = AppState::build(pool, &config, identity_provider, mail_transport);

    let app = handlers::router(app_state).layer(middleware::from_fn(add_security_headers));

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));

    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_security_headers(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert("Cache-Control", HeaderValue::from_static("no-store"));

    if std::env::var("ENVIRONMENT")
        .map(|env| env == "production")
        .unwrap_or(false)
    {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains; preload"),
        );
    }

    response
}
