//! Inventory ledger row model.

use serde::Serialize;
use sqlx::FromRow;
use ttrpg_core::types::DbId;

/// One ledger row: the quantity of one item type held by one character.
/// Quantity is always >= 1; a row that would reach zero is deleted instead.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryEntry {
    pub character_id: DbId,
    pub item_id: DbId,
    pub quantity: i64,
}
