//! HTTP-level integration tests for the item catalog.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app, grant_global_role, request};
use sqlx::PgPool;

async fn admin_token(pool: &PgPool) -> String {
    let (admin_id, _) = common::register_and_login(pool, "catalog_admin").await;
    grant_global_role(pool, admin_id, "ADMIN").await;
    common::login(pool, "catalog_admin").await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_item_creation_is_admin_only(pool: PgPool) {
    let (_, player_token) = common::register_and_login(&pool, "shopper").await;

    let app = build_test_app(pool.clone());
    let response = request(
        app,
        Method::POST,
        "/api/v1/items",
        Some(&player_token),
        Some(serde_json::json!({"name": "Sword"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let token = admin_token(&pool).await;
    let app = build_test_app(pool);
    let response = request(
        app,
        Method::POST,
        "/api/v1/items",
        Some(&token),
        Some(serde_json::json!({"name": " Sword ", "weight": 3.5, "price": 120})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Sword");
    assert_eq!(json["price"], 120);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_item_name_is_conflict(pool: PgPool) {
    let token = admin_token(&pool).await;

    for (name, expected) in [("Shield", StatusCode::CREATED), ("sHiElD", StatusCode::CONFLICT)] {
        let app = build_test_app(pool.clone());
        let response = request(
            app,
            Method::POST,
            "/api/v1/items",
            Some(&token),
            Some(serde_json::json!({"name": name})),
        )
        .await;
        assert_eq!(response.status(), expected);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_negative_weight_or_price_rejected(pool: PgPool) {
    let token = admin_token(&pool).await;

    for payload in [
        serde_json::json!({"name": "Feather", "weight": -0.1}),
        serde_json::json!({"name": "Gem", "price": -5}),
    ] {
        let app = build_test_app(pool.clone());
        let response =
            request(app, Method::POST, "/api/v1/items", Some(&token), Some(payload)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_item_update_partial(pool: PgPool) {
    let token = admin_token(&pool).await;
    let item_id = common::seed_item(&pool, "Lantern").await;

    let app = build_test_app(pool);
    let response = request(
        app,
        Method::PATCH,
        &format!("/api/v1/items/{item_id}"),
        Some(&token),
        Some(serde_json::json!({"price": 40})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["price"], 40);
    assert_eq!(json["name"], "Lantern");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_global_game_master_may_delete_items(pool: PgPool) {
    let item_id = common::seed_item(&pool, "Rope").await;
    let (gm_id, _) = common::register_and_login(&pool, "world_builder").await;
    grant_global_role(&pool, gm_id, "GAME_MASTER").await;
    let token = common::login(&pool, "world_builder").await;

    let app = build_test_app(pool);
    let response = request(
        app,
        Method::DELETE,
        &format!("/api/v1/items/{item_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_search_by_name_fragment(pool: PgPool) {
    common::seed_item(&pool, "Healing Potion").await;
    common::seed_item(&pool, "Mana Potion").await;
    common::seed_item(&pool, "Torch").await;
    let (_, token) = common::register_and_login(&pool, "browser").await;

    let app = build_test_app(pool.clone());
    let response = request(app, Method::GET, "/api/v1/items?name=potion", Some(&token), None).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    let app = build_test_app(pool);
    let response = request(app, Method::GET, "/api/v1/items", Some(&token), None).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);
}
