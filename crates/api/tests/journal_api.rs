//! HTTP-level integration tests for journal entries and their visibility.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app, request};
use sqlx::PgPool;

fn entry_payload(entry_type: &str, visibility: &str, title: &str) -> serde_json::Value {
    serde_json::json!({
        "type": entry_type,
        "visibility": visibility,
        "title": title,
        "content": "The party ventured deeper into the keep.",
    })
}

/// GM + player + campaign.
async fn setup(pool: &PgPool) -> (String, String, i64) {
    let (_, gm_token) = common::register_and_login(pool, "chronicler").await;
    let (player_id, player_token) = common::register_and_login(pool, "reader").await;
    let campaign_id = common::create_campaign(pool, &gm_token, "Annals of the Keep").await;
    common::add_player(pool, &gm_token, campaign_id, player_id).await;
    (gm_token, player_token, campaign_id)
}

async fn create_entry(
    pool: &PgPool,
    token: &str,
    campaign_id: i64,
    payload: serde_json::Value,
) -> i64 {
    let app = build_test_app(pool.clone());
    let response = request(
        app,
        Method::POST,
        &format!("/api/v1/campaigns/{campaign_id}/journals"),
        Some(token),
        Some(payload),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "entry create failed");
    body_json(response).await["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_only_gm_creates_campaign_entries(pool: PgPool) {
    let (_, player_token, campaign_id) = setup(&pool).await;

    let app = build_test_app(pool);
    let response = request(
        app,
        Method::POST,
        &format!("/api/v1/campaigns/{campaign_id}/journals"),
        Some(&player_token),
        Some(entry_payload("session", "PLAYERS", "Player Notes")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_member_cannot_list_journals(pool: PgPool) {
    let (gm_token, _, campaign_id) = setup(&pool).await;
    create_entry(&pool, &gm_token, campaign_id, entry_payload("lore", "PLAYERS", "Intro")).await;
    let (_, outsider_token) = common::register_and_login(&pool, "lurker").await;

    let app = build_test_app(pool);
    let response = request(
        app,
        Method::GET,
        &format!("/api/v1/campaigns/{campaign_id}/journals"),
        Some(&outsider_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_visibility_filtering_in_listing(pool: PgPool) {
    let (gm_token, player_token, campaign_id) = setup(&pool).await;
    create_entry(&pool, &gm_token, campaign_id, entry_payload("plot", "GM_ONLY", "Secrets")).await;
    create_entry(&pool, &gm_token, campaign_id, entry_payload("lore", "PLAYERS", "Rumors")).await;

    let uri = format!("/api/v1/campaigns/{campaign_id}/journals");

    // The GM sees both entries.
    let app = build_test_app(pool.clone());
    let response = request(app, Method::GET, &uri, Some(&gm_token), None).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    // The GM can ask for the players' view.
    let app = build_test_app(pool.clone());
    let response = request(
        app,
        Method::GET,
        &format!("{uri}?only_players_visible=true"),
        Some(&gm_token),
        None,
    )
    .await;
    let entries = body_json(response).await;
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["title"], "Rumors");

    // A player only ever sees PLAYERS entries.
    let app = build_test_app(pool);
    let response = request(app, Method::GET, &uri, Some(&player_token), None).await;
    let entries = body_json(response).await;
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["visibility"], "PLAYERS");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_type_filter_is_case_insensitive(pool: PgPool) {
    let (gm_token, _, campaign_id) = setup(&pool).await;
    create_entry(&pool, &gm_token, campaign_id, entry_payload("Session", "PLAYERS", "One")).await;
    create_entry(&pool, &gm_token, campaign_id, entry_payload("lore", "PLAYERS", "Two")).await;

    let app = build_test_app(pool);
    let response = request(
        app,
        Method::GET,
        &format!("/api/v1/campaigns/{campaign_id}/journals?type=session"),
        Some(&gm_token),
        None,
    )
    .await;
    let entries = body_json(response).await;
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["title"], "One");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_gm_only_entry_hidden_from_players(pool: PgPool) {
    let (gm_token, player_token, campaign_id) = setup(&pool).await;
    let entry_id =
        create_entry(&pool, &gm_token, campaign_id, entry_payload("plot", "GM_ONLY", "Twist")).await;
    let uri = format!("/api/v1/journals/{entry_id}");

    let app = build_test_app(pool.clone());
    let response = request(app, Method::GET, &uri, Some(&player_token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = build_test_app(pool);
    let response = request(app, Method::GET, &uri, Some(&gm_token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "Twist");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_entry_mutation_is_gm_only(pool: PgPool) {
    let (gm_token, player_token, campaign_id) = setup(&pool).await;
    let entry_id =
        create_entry(&pool, &gm_token, campaign_id, entry_payload("lore", "PLAYERS", "Draft")).await;
    let uri = format!("/api/v1/journals/{entry_id}");

    let app = build_test_app(pool.clone());
    let response = request(
        app,
        Method::PATCH,
        &uri,
        Some(&player_token),
        Some(serde_json::json!({"title": "Vandalized"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = build_test_app(pool.clone());
    let response = request(
        app,
        Method::PATCH,
        &uri,
        Some(&gm_token),
        Some(serde_json::json!({"title": "Final", "visibility": "GM_ONLY"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Final");
    assert_eq!(json["visibility"], "GM_ONLY");

    let app = build_test_app(pool);
    let response = request(app, Method::DELETE, &uri, Some(&gm_token), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_blank_type_or_missing_visibility_rejected(pool: PgPool) {
    let (gm_token, _, campaign_id) = setup(&pool).await;
    let uri = format!("/api/v1/campaigns/{campaign_id}/journals");

    let app = build_test_app(pool.clone());
    let response = request(
        app,
        Method::POST,
        &uri,
        Some(&gm_token),
        Some(entry_payload("  ", "PLAYERS", "No Type")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = build_test_app(pool);
    let response = request(
        app,
        Method::POST,
        &uri,
        Some(&gm_token),
        Some(serde_json::json!({
            "type": "session",
            "title": "No Visibility",
            "content": "text",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_personal_entries_are_private(pool: PgPool) {
    let (_, alice_token) = common::register_and_login(&pool, "alice_writer").await;
    let (_, bob_token) = common::register_and_login(&pool, "bob_reader").await;

    let app = build_test_app(pool.clone());
    let response = request(
        app,
        Method::POST,
        "/api/v1/journals/personal",
        Some(&alice_token),
        Some(entry_payload("diary", "GM_ONLY", "Dear Diary")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let entry = body_json(response).await;
    assert!(entry["campaign_id"].is_null());
    let entry_id = entry["id"].as_i64().unwrap();

    // The author lists and reads their own entries.
    let app = build_test_app(pool.clone());
    let response = request(app, Method::GET, "/api/v1/journals/personal", Some(&alice_token), None).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    // Someone else cannot read, edit, or list them.
    let app = build_test_app(pool.clone());
    let response = request(
        app,
        Method::GET,
        &format!("/api/v1/journals/{entry_id}"),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = build_test_app(pool);
    let response = request(app, Method::GET, "/api/v1/journals/personal", Some(&bob_token), None).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);
}
