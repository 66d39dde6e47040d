#![allow(dead_code)]
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::{AppConfig, DatabaseConfig};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use server::auth::ServerState;
use server::routes;

pub const ADMIN_EMAIL: &str = "admin@example.com";

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth.jwt_secret = "test-secret".into();
    cfg.database = DatabaseConfig::in_memory();
    cfg
}

pub async fn test_state() -> anyhow::Result<ServerState> {
    let cfg = test_config();
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(ServerState::new(db, &cfg))
}

pub async fn build_app() -> anyhow::Result<(Router, DatabaseConnection)> {
    let state = test_state().await?;
    let db = state.db.clone();
    Ok((routes::build_router(state, CorsLayer::very_permissive()), db))
}

/// Drive one request through the router and decode the JSON body (Null when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

/// Register then log in; returns the bearer token.
pub async fn signup(app: &Router, username: &str, email: &str, phone: Option<&str>) -> anyhow::Result<String> {
    let (status, body) = send(
        app,
        "POST",
        "/users/register",
        None,
        Some(json!({"username": username, "email": email, "phone": phone, "password": "secret123"})),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "register failed: {status} {body}");
    let (status, body) = send(
        app,
        "POST",
        "/users/login",
        None,
        Some(json!({"email": email, "password": "secret123"})),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::OK, "login failed: {status} {body}");
    body["access_token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("no token in {body}"))
}
