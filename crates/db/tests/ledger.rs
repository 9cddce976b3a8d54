//! Repository-level tests for the inventory ledger and its foreign keys.

use sqlx::PgPool;
use ttrpg_core::character::Attributes;
use ttrpg_core::roles::CampaignRole;
use ttrpg_db::models::character::NewCharacter;
use ttrpg_db::models::user::CreateUser;
use ttrpg_db::repositories::{
    CampaignRepo, CharacterRepo, InventoryRepo, ItemRepo, MemberRepo, UserRepo,
};

struct Fixture {
    character_id: i64,
    item_id: i64,
}

async fn seed(pool: &PgPool) -> Fixture {
    let gm = UserRepo::create(
        pool,
        &CreateUser {
            username: "ledger_gm".into(),
            email: "ledger_gm@example.com".into(),
            password_hash: "$argon2id$fake".into(),
        },
    )
    .await
    .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let campaign = CampaignRepo::create(&mut conn, gm.id, "Ledger Test", None)
        .await
        .unwrap();
    MemberRepo::insert_if_absent(&mut conn, campaign.id, gm.id, CampaignRole::Gm)
        .await
        .unwrap();
    drop(conn);

    let character = CharacterRepo::create(
        pool,
        &NewCharacter {
            campaign_id: campaign.id,
            owner_id: gm.id,
            name: "Holder".into(),
            class: "Rogue".into(),
            race: "Halfling".into(),
            level: 1,
            hp: 8,
            max_hp: 8,
            attributes: Attributes {
                strength: 10,
                dexterity: 16,
                constitution: 12,
                intelligence: 10,
                wisdom: 10,
                charisma: 12,
            },
        },
    )
    .await
    .unwrap();

    let item = ItemRepo::create(pool, "Coin", None, 0.01, 1).await.unwrap();

    Fixture {
        character_id: character.id,
        item_id: item.id,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upsert_creates_then_overwrites(pool: PgPool) {
    let f = seed(&pool).await;

    let mut conn = pool.acquire().await.unwrap();
    let entry = InventoryRepo::upsert_quantity(&mut conn, f.character_id, f.item_id, 3)
        .await
        .unwrap();
    assert_eq!(entry.quantity, 3);

    let entry = InventoryRepo::upsert_quantity(&mut conn, f.character_id, f.item_id, 10)
        .await
        .unwrap();
    assert_eq!(entry.quantity, 10);
    drop(conn);

    let entries = InventoryRepo::list_by_character(&pool, f.character_id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].quantity, 10);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_zero_quantity_rows_are_impossible(pool: PgPool) {
    let f = seed(&pool).await;

    let mut conn = pool.acquire().await.unwrap();
    let err = InventoryRepo::upsert_quantity(&mut conn, f.character_id, f.item_id, 0)
        .await
        .expect_err("the quantity >= 1 CHECK must reject zero");
    match err {
        sqlx::Error::Database(db_err) => {
            // PostgreSQL check violation
            assert_eq!(db_err.code().as_deref(), Some("23514"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_entry_is_idempotent(pool: PgPool) {
    let f = seed(&pool).await;

    let mut conn = pool.acquire().await.unwrap();
    InventoryRepo::upsert_quantity(&mut conn, f.character_id, f.item_id, 2)
        .await
        .unwrap();

    assert!(InventoryRepo::delete_entry(&mut conn, f.character_id, f.item_id)
        .await
        .unwrap());
    assert!(!InventoryRepo::delete_entry(&mut conn, f.character_id, f.item_id)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_character_delete_cascades_ledger_rows(pool: PgPool) {
    let f = seed(&pool).await;

    let mut conn = pool.acquire().await.unwrap();
    InventoryRepo::upsert_quantity(&mut conn, f.character_id, f.item_id, 5)
        .await
        .unwrap();
    drop(conn);

    assert!(CharacterRepo::delete(&pool, f.character_id).await.unwrap());

    assert!(!InventoryRepo::exists_by_item(&pool, f.item_id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_referenced_item_cannot_be_deleted(pool: PgPool) {
    let f = seed(&pool).await;

    let mut conn = pool.acquire().await.unwrap();
    InventoryRepo::upsert_quantity(&mut conn, f.character_id, f.item_id, 1)
        .await
        .unwrap();
    drop(conn);

    // The RESTRICT foreign key backs up the handler-level guard.
    let err = ItemRepo::delete(&pool, f.item_id)
        .await
        .expect_err("delete of a referenced item must fail");
    match err {
        sqlx::Error::Database(db_err) => {
            // PostgreSQL foreign key violation
            assert_eq!(db_err.code().as_deref(), Some("23503"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_one_character_per_owner_constraint(pool: PgPool) {
    let f = seed(&pool).await;
    let existing = CharacterRepo::find_by_id(&pool, f.character_id)
        .await
        .unwrap()
        .unwrap();

    let err = CharacterRepo::create(
        &pool,
        &NewCharacter {
            campaign_id: existing.campaign_id,
            owner_id: existing.owner_id,
            name: "Second Sheet".into(),
            class: "Bard".into(),
            race: "Human".into(),
            level: 1,
            hp: 6,
            max_hp: 6,
            attributes: existing.attributes(),
        },
    )
    .await
    .expect_err("second character for the same owner must violate the unique index");
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_characters_campaign_owner"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}
