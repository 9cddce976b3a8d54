//! Repository for the `characters` table.

use sqlx::{PgConnection, PgPool};
use ttrpg_core::types::DbId;

use crate::models::character::{Character, CharacterValues, NewCharacter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, campaign_id, owner_id, name, class, race, level, hp, max_hp, \
     attr_str, attr_dex, attr_con, attr_int, attr_wis, attr_cha, created_at, updated_at";

/// Provides CRUD operations for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character, returning the created row.
    ///
    /// Ownership and name uniqueness races land on the `uq_characters_*`
    /// indexes; the caller converts those into Conflicts.
    pub async fn create(pool: &PgPool, input: &NewCharacter) -> Result<Character, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters
                (campaign_id, owner_id, name, class, race, level, hp, max_hp,
                 attr_str, attr_dex, attr_con, attr_int, attr_wis, attr_cha)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(input.campaign_id)
            .bind(input.owner_id)
            .bind(&input.name)
            .bind(&input.class)
            .bind(&input.race)
            .bind(input.level)
            .bind(input.hp)
            .bind(input.max_hp)
            .bind(input.attributes.strength)
            .bind(input.attributes.dexterity)
            .bind(input.attributes.constitution)
            .bind(input.attributes.intelligence)
            .bind(input.attributes.wisdom)
            .bind(input.attributes.charisma)
            .fetch_one(pool)
            .await
    }

    /// Find a character by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a character with a row lock so a read-merge-write update cannot
    /// interleave with a concurrent one. Transaction-scoped.
    pub async fn find_by_id_locked(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Write back the fully merged character values. Transaction-scoped;
    /// the caller loaded the row with [`Self::find_by_id_locked`] first.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        values: &CharacterValues,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET
                name = $2, class = $3, race = $4, level = $5, hp = $6, max_hp = $7,
                attr_str = $8, attr_dex = $9, attr_con = $10,
                attr_int = $11, attr_wis = $12, attr_cha = $13,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(&values.name)
            .bind(&values.class)
            .bind(&values.race)
            .bind(values.level)
            .bind(values.hp)
            .bind(values.max_hp)
            .bind(values.attributes.strength)
            .bind(values.attributes.dexterity)
            .bind(values.attributes.constitution)
            .bind(values.attributes.intelligence)
            .bind(values.attributes.wisdom)
            .bind(values.attributes.charisma)
            .fetch_optional(conn)
            .await
    }

    /// Set only the HP column. Transaction-scoped, paired with
    /// [`Self::find_by_id_locked`].
    pub async fn update_hp(
        conn: &mut PgConnection,
        id: DbId,
        hp: i32,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET hp = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(hp)
            .fetch_optional(conn)
            .await
    }

    /// Delete a character (inventory rows cascade). Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM characters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete all characters a user owns inside one campaign. Used by the
    /// member-removal cascade; transaction-scoped. Returns the count removed.
    pub async fn delete_by_campaign_and_owner(
        conn: &mut PgConnection,
        campaign_id: DbId,
        owner_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM characters WHERE campaign_id = $1 AND owner_id = $2")
            .bind(campaign_id)
            .bind(owner_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// List a campaign's characters, ordered by name.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<Character>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM characters WHERE campaign_id = $1 ORDER BY name ASC");
        sqlx::query_as::<_, Character>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// List all characters a user owns across campaigns.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Character>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM characters WHERE owner_id = $1 ORDER BY name ASC");
        sqlx::query_as::<_, Character>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Whether any character exists in the campaign. Campaign-deletion guard.
    pub async fn exists_in_campaign(pool: &PgPool, campaign_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM characters WHERE campaign_id = $1)")
            .bind(campaign_id)
            .fetch_one(pool)
            .await
    }

    /// Whether the owner already has a character in the campaign.
    pub async fn exists_by_campaign_and_owner(
        pool: &PgPool,
        campaign_id: DbId,
        owner_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM characters WHERE campaign_id = $1 AND owner_id = $2)",
        )
        .bind(campaign_id)
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }

    /// Whether the user owns any character at all. User-deletion guard.
    pub async fn exists_by_owner(pool: &PgPool, owner_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM characters WHERE owner_id = $1)")
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Case-insensitive per-campaign name check, optionally excluding one
    /// character (for renames onto the same name).
    pub async fn name_taken(
        pool: &PgPool,
        campaign_id: DbId,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM characters
                WHERE campaign_id = $1 AND LOWER(name) = LOWER($2)
                  AND ($3::bigint IS NULL OR id <> $3)
             )",
        )
        .bind(campaign_id)
        .bind(name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }
}
