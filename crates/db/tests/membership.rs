//! Repository-level tests for the campaign membership relation:
//! race-safe upsert, uniqueness constraints, and cascade behaviour.

use sqlx::PgPool;
use ttrpg_core::roles::CampaignRole;
use ttrpg_db::models::user::CreateUser;
use ttrpg_db::repositories::{CampaignRepo, MemberRepo, UserRepo};

async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$fake".to_string(),
        },
    )
    .await
    .expect("user insert failed");
    user.id
}

async fn seed_campaign(pool: &PgPool, gm_id: i64, name: &str) -> i64 {
    let mut conn = pool.acquire().await.unwrap();
    let campaign = CampaignRepo::create(&mut conn, gm_id, name, None)
        .await
        .expect("campaign insert failed");
    campaign.id
}

#[sqlx::test(migrations = "./migrations")]
async fn test_insert_if_absent_reports_the_race_loser(pool: PgPool) {
    let gm = seed_user(&pool, "the_gm").await;
    let player = seed_user(&pool, "a_player").await;
    let campaign = seed_campaign(&pool, gm, "Upsert Test").await;

    let mut conn = pool.acquire().await.unwrap();
    let first = MemberRepo::insert_if_absent(&mut conn, campaign, player, CampaignRole::Player)
        .await
        .unwrap();
    assert!(first, "first insert should create the row");

    // The same statement again models the losing writer of a concurrent
    // identical PUT: no constraint error, just rows_affected = 0.
    let second = MemberRepo::insert_if_absent(&mut conn, campaign, player, CampaignRole::Player)
        .await
        .unwrap();
    assert!(!second, "second insert must be a conflict-free no-op");

    let member = MemberRepo::find(&pool, campaign, player).await.unwrap().unwrap();
    assert_eq!(member.role().unwrap(), CampaignRole::Player);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_role_returns_none_for_missing_row(pool: PgPool) {
    let gm = seed_user(&pool, "the_gm").await;
    let stranger = seed_user(&pool, "stranger").await;
    let campaign = seed_campaign(&pool, gm, "Patch Test").await;

    let mut conn = pool.acquire().await.unwrap();
    let updated = MemberRepo::update_role(&mut conn, campaign, stranger, CampaignRole::Player)
        .await
        .unwrap();
    assert!(updated.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_campaign_name_hits_uq_constraint(pool: PgPool) {
    let gm = seed_user(&pool, "the_gm").await;
    seed_campaign(&pool, gm, "Twice Told").await;

    let mut conn = pool.acquire().await.unwrap();
    let err = CampaignRepo::create(&mut conn, gm, "Twice Told", None)
        .await
        .expect_err("duplicate name should violate uq_campaigns_name");
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_campaigns_name"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_campaign_delete_cascades_members(pool: PgPool) {
    let gm = seed_user(&pool, "the_gm").await;
    let player = seed_user(&pool, "a_player").await;
    let campaign = seed_campaign(&pool, gm, "Doomed").await;

    let mut conn = pool.acquire().await.unwrap();
    MemberRepo::insert_if_absent(&mut conn, campaign, gm, CampaignRole::Gm)
        .await
        .unwrap();
    MemberRepo::insert_if_absent(&mut conn, campaign, player, CampaignRole::Player)
        .await
        .unwrap();
    drop(conn);

    assert!(CampaignRepo::delete(&pool, campaign).await.unwrap());
    assert!(MemberRepo::find(&pool, campaign, player).await.unwrap().is_none());
    assert!(MemberRepo::find(&pool, campaign, gm).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_member_listing_orders_gm_first(pool: PgPool) {
    let gm = seed_user(&pool, "zz_gm").await;
    let player = seed_user(&pool, "aa_player").await;
    let campaign = seed_campaign(&pool, gm, "Ordering").await;

    let mut conn = pool.acquire().await.unwrap();
    MemberRepo::insert_if_absent(&mut conn, campaign, player, CampaignRole::Player)
        .await
        .unwrap();
    MemberRepo::insert_if_absent(&mut conn, campaign, gm, CampaignRole::Gm)
        .await
        .unwrap();
    drop(conn);

    let members = MemberRepo::list_with_users(&pool, campaign).await.unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].role, "GM");
    assert_eq!(members[0].user_id, gm);
}
