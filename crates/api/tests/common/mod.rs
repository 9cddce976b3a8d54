//! Shared harness for HTTP-level integration tests.
//!
//! Uses Axum's `tower::ServiceExt::oneshot` to send requests directly to the
//! router without an actual TCP listener. The router is rebuilt per request
//! (oneshot consumes it), mirroring the production middleware stack.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use ttrpg_api::auth::jwt::JwtConfig;
use ttrpg_api::config::ServerConfig;
use ttrpg_api::router::build_app_router;
use ttrpg_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Send one request. `token` adds a Bearer Authorization header; `body`
/// adds a JSON payload.
pub async fn request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

/// Password used by every test account.
pub const TEST_PASSWORD: &str = "a-strong-password";

/// Register a fresh account through the API and log it in.
/// Returns `(user_id, access_token)`.
pub async fn register_and_login(pool: &PgPool, username: &str) -> (i64, String) {
    let app = build_test_app(pool.clone());
    let response = request(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(serde_json::json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": TEST_PASSWORD,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "registration failed");
    let user = body_json(response).await;
    let user_id = user["id"].as_i64().unwrap();

    let token = login(pool, username).await;
    (user_id, token)
}

/// Log an existing account in and return its access token.
pub async fn login(pool: &PgPool, username: &str) -> String {
    let app = build_test_app(pool.clone());
    let response = request(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(serde_json::json!({
            "identifier": username,
            "password": TEST_PASSWORD,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login failed");
    let auth = body_json(response).await;
    auth["access_token"].as_str().unwrap().to_string()
}

/// Grant a global role directly in the database. Tokens issued before the
/// grant do not carry the role -- log in again afterwards.
pub async fn grant_global_role(pool: &PgPool, user_id: i64, role: &str) {
    sqlx::query(
        "INSERT INTO user_roles (user_id, role) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(role)
    .execute(pool)
    .await
    .expect("failed to grant role");
}

/// Create a campaign owned by the token's user; returns its id.
pub async fn create_campaign(pool: &PgPool, token: &str, name: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = request(
        app,
        Method::POST,
        "/api/v1/campaigns",
        Some(token),
        Some(serde_json::json!({"name": name})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "campaign create failed");
    body_json(response).await["id"].as_i64().unwrap()
}

/// Add a user to a campaign as PLAYER via the idempotent PUT.
pub async fn add_player(pool: &PgPool, gm_token: &str, campaign_id: i64, user_id: i64) {
    let app = build_test_app(pool.clone());
    let response = request(
        app,
        Method::PUT,
        &format!("/api/v1/campaigns/{campaign_id}/members/{user_id}"),
        Some(gm_token),
        Some(serde_json::json!({"role": "PLAYER"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "member add failed");
}

/// A valid character payload owned by the caller.
pub fn character_payload(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "class": "Fighter",
        "race": "Dwarf",
        "level": 1,
        "hp": 10,
        "max_hp": 10,
        "attributes": {
            "strength": 16,
            "dexterity": 12,
            "constitution": 14,
            "intelligence": 8,
            "wisdom": 10,
            "charisma": 11
        }
    })
}

/// Create a character in the campaign, owned by the token's user;
/// returns its id.
pub async fn create_character(pool: &PgPool, token: &str, campaign_id: i64, name: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = request(
        app,
        Method::POST,
        &format!("/api/v1/campaigns/{campaign_id}/characters"),
        Some(token),
        Some(character_payload(name)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "character create failed");
    body_json(response).await["id"].as_i64().unwrap()
}

/// Seed a catalog item directly through the repository layer; returns its id.
pub async fn seed_item(pool: &PgPool, name: &str) -> i64 {
    let item = ttrpg_db::repositories::ItemRepo::create(pool, name, None, 0.5, 25)
        .await
        .expect("failed to seed item");
    item.id
}
