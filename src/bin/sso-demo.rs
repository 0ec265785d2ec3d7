//! Minimal application protected by the SSO gate.
//!
//! Reads the `SSO_*` variables documented on [`SsoConfig::from_env`] and
//! listens on `SSO_DEMO_ADDR` (default `127.0.0.1:3000`).

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use sso_gate::{Identity, SsoConfig, SsoGate, enforce_sso};
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SsoConfig::from_env()?;
    let secure = config.secure_cookies();
    let gate = SsoGate::new(config)?;

    let app = Router::new()
        .route("/", get(home))
        .route("/dashboard", get(dashboard))
        .route("/static/{*path}", get(|| async { "static asset" }))
        .route("/api/health", get(|| async { "ok" }))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(axum::middleware::from_fn_with_state(gate, enforce_sso))
        .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(secure));

    let addr = std::env::var("SSO_DEMO_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "SSO demo listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn home(identity: Identity) -> String {
    format!("Welcome, {}", identity.user_name())
}

async fn dashboard(identity: Identity) -> String {
    format!("Dashboard of user #{}", identity.id())
}
