//! Repository for the `journal_entries` table.

use sqlx::PgPool;
use ttrpg_core::journal::Visibility;
use ttrpg_core::types::DbId;

use crate::models::journal::JournalEntry;

const COLUMNS: &str = "id, campaign_id, author_id, type, visibility, title, content, tags, created_at";

/// Provides CRUD operations for journal entries.
pub struct JournalRepo;

impl JournalRepo {
    /// Insert a journal entry. `campaign_id` is `None` for personal entries.
    pub async fn create(
        pool: &PgPool,
        campaign_id: Option<DbId>,
        author_id: DbId,
        entry_type: &str,
        visibility: Visibility,
        title: &str,
        content: &str,
        tags: Option<&str>,
    ) -> Result<JournalEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO journal_entries (campaign_id, author_id, type, visibility, title, content, tags)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JournalEntry>(&query)
            .bind(campaign_id)
            .bind(author_id)
            .bind(entry_type)
            .bind(visibility.as_str())
            .bind(title)
            .bind(content)
            .bind(tags)
            .fetch_one(pool)
            .await
    }

    /// Find an entry by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<JournalEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM journal_entries WHERE id = $1");
        sqlx::query_as::<_, JournalEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Write back fully merged entry values (the handler loads, merges the
    /// patch, validates, then calls this). `created_at` stays immutable.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        entry_type: &str,
        visibility: Visibility,
        title: &str,
        content: &str,
        tags: Option<&str>,
    ) -> Result<Option<JournalEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE journal_entries SET
                type = $2, visibility = $3, title = $4, content = $5, tags = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JournalEntry>(&query)
            .bind(id)
            .bind(entry_type)
            .bind(visibility.as_str())
            .bind(title)
            .bind(content)
            .bind(tags)
            .fetch_optional(pool)
            .await
    }

    /// Delete an entry. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a campaign's entries, newest first, optionally narrowed by
    /// case-insensitive type and/or visibility.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        type_filter: Option<&str>,
        visibility: Option<Visibility>,
    ) -> Result<Vec<JournalEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM journal_entries
             WHERE campaign_id = $1
               AND ($2::text IS NULL OR LOWER(type) = LOWER($2))
               AND ($3::text IS NULL OR visibility = $3)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, JournalEntry>(&query)
            .bind(campaign_id)
            .bind(type_filter)
            .bind(visibility.map(|v| v.as_str()))
            .fetch_all(pool)
            .await
    }

    /// List the caller's personal (campaign-less) entries, newest first.
    pub async fn list_personal(
        pool: &PgPool,
        author_id: DbId,
    ) -> Result<Vec<JournalEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM journal_entries
             WHERE campaign_id IS NULL AND author_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, JournalEntry>(&query)
            .bind(author_id)
            .fetch_all(pool)
            .await
    }

    /// Whether the user authored any entry. User-deletion guard.
    pub async fn exists_by_author(pool: &PgPool, author_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM journal_entries WHERE author_id = $1)")
            .bind(author_id)
            .fetch_one(pool)
            .await
    }
}
