//! Repository for the `campaigns` table.

use sqlx::{PgConnection, PgPool};
use ttrpg_core::types::DbId;

use crate::models::campaign::Campaign;

const COLUMNS: &str = "id, name, description, gm_id, created_at, updated_at";

/// Provides CRUD operations for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a new campaign. Runs inside a caller-provided transaction so
    /// the automatic GM membership insert lands atomically with it.
    pub async fn create(
        conn: &mut PgConnection,
        gm_id: DbId,
        name: &str,
        description: Option<&str>,
    ) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns (name, description, gm_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(name)
            .bind(description)
            .bind(gm_id)
            .fetch_one(conn)
            .await
    }

    /// Find a campaign by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a campaign. Only non-`None` values are applied; the name
    /// arrives already trimmed and non-blank.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(name)
            .bind(description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a campaign. Members and journal entries cascade at the store
    /// level; the character guard is checked by the caller first.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List campaigns owned by a GM, newest first.
    pub async fn list_by_gm(pool: &PgPool, gm_id: DbId) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns WHERE gm_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(gm_id)
            .fetch_all(pool)
            .await
    }

    /// List campaigns the user participates in (as GM or player), newest first.
    pub async fn list_by_member(pool: &PgPool, user_id: DbId) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = "SELECT c.id, c.name, c.description, c.gm_id, c.created_at, c.updated_at
             FROM campaigns c
             JOIN campaign_members m ON m.campaign_id = c.id
             WHERE m.user_id = $1
             ORDER BY c.created_at DESC";
        sqlx::query_as::<_, Campaign>(query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Whether the user owns any campaign. Used by the user-deletion guard.
    pub async fn exists_by_gm(pool: &PgPool, gm_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM campaigns WHERE gm_id = $1)")
            .bind(gm_id)
            .fetch_one(pool)
            .await
    }
}
