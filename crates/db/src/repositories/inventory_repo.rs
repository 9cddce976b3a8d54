//! Repository for the `character_inventory` ledger.
//!
//! Every mutation of a ledger row happens inside a transaction that first
//! takes a row lock via [`InventoryRepo::find_locked`], so concurrent
//! give/consume/set calls on the same pair serialize instead of losing
//! updates.

use sqlx::{PgConnection, PgPool};
use ttrpg_core::types::DbId;

use crate::models::inventory::InventoryEntry;

const COLUMNS: &str = "character_id, item_id, quantity";

/// Provides operations on the character-item quantity ledger.
pub struct InventoryRepo;

impl InventoryRepo {
    /// List a character's inventory, heaviest stacks first.
    pub async fn list_by_character(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<InventoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_inventory
             WHERE character_id = $1
             ORDER BY quantity DESC, item_id ASC"
        );
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(character_id)
            .fetch_all(pool)
            .await
    }

    /// Find one ledger row with a row lock. Transaction-scoped.
    pub async fn find_locked(
        conn: &mut PgConnection,
        character_id: DbId,
        item_id: DbId,
    ) -> Result<Option<InventoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_inventory
             WHERE character_id = $1 AND item_id = $2
             FOR UPDATE"
        );
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(character_id)
            .bind(item_id)
            .fetch_optional(conn)
            .await
    }

    /// Create the row or overwrite its quantity. Transaction-scoped.
    pub async fn upsert_quantity(
        conn: &mut PgConnection,
        character_id: DbId,
        item_id: DbId,
        quantity: i64,
    ) -> Result<InventoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_inventory (character_id, item_id, quantity)
             VALUES ($1, $2, $3)
             ON CONFLICT (character_id, item_id) DO UPDATE SET quantity = EXCLUDED.quantity
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(character_id)
            .bind(item_id)
            .bind(quantity)
            .fetch_one(conn)
            .await
    }

    /// Delete one ledger row. Transaction-scoped. Returns `true` if a row
    /// was removed.
    pub async fn delete_entry(
        conn: &mut PgConnection,
        character_id: DbId,
        item_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM character_inventory WHERE character_id = $1 AND item_id = $2")
                .bind(character_id)
                .bind(item_id)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether any character holds the item. Item-deletion guard.
    pub async fn exists_by_item(pool: &PgPool, item_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM character_inventory WHERE item_id = $1)")
            .bind(item_id)
            .fetch_one(pool)
            .await
    }
}
