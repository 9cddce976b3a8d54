//! Repository for the `items` table.

use sqlx::PgPool;
use ttrpg_core::types::DbId;

use crate::models::item::Item;

const COLUMNS: &str = "id, name, description, weight, price, created_at, updated_at";

/// Provides CRUD operations for the global item catalog.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item, returning the created row.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        description: Option<&str>,
        weight: f64,
        price: i64,
    ) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items (name, description, weight, price)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(name)
            .bind(description)
            .bind(weight)
            .bind(price)
            .fetch_one(pool)
            .await
    }

    /// Find an item by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update an item. Only non-`None` values are applied; the caller has
    /// already validated them.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        description: Option<&str>,
        weight: Option<f64>,
        price: Option<i64>,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                weight = COALESCE($4, weight),
                price = COALESCE($5, price),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(name)
            .bind(description)
            .bind(weight)
            .bind(price)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item. Returns `true` if a row was removed. The
    /// inventory-reference guard is checked by the caller first; a racing
    /// reference insert still fails on the RESTRICT foreign key.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List items whose name contains the given fragment (case-insensitive);
    /// no fragment lists the whole catalog.
    pub async fn search_by_name(
        pool: &PgPool,
        fragment: Option<&str>,
    ) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE $1::text IS NULL OR name ILIKE '%' || $1 || '%'
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(fragment)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive catalog-wide name check, optionally excluding one
    /// item (for renames onto the same name).
    pub async fn name_taken(
        pool: &PgPool,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM items
                WHERE LOWER(name) = LOWER($1)
                  AND ($2::bigint IS NULL OR id <> $2)
             )",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }
}
