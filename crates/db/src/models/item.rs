//! Item catalog entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ttrpg_core::types::{DbId, Timestamp};

/// An item row from the `items` table. Items are a global catalog, not
/// campaign-scoped.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub weight: f64,
    pub price: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub name: String,
    pub description: Option<String>,
    pub weight: Option<f64>,
    pub price: Option<i64>,
}

/// DTO for updating an existing item. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub weight: Option<f64>,
    pub price: Option<i64>,
}
