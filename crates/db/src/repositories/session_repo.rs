//! Repository for the `sessions` table (refresh tokens).

use sqlx::PgPool;
use ttrpg_core::types::{DbId, Timestamp};

use crate::models::session::Session;

const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, created_at";

/// Stores hashed refresh tokens and their expiry.
pub struct SessionRepo;

impl SessionRepo {
    /// Record a new session for the given (already hashed) refresh token.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        refresh_token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (user_id, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(user_id)
            .bind(refresh_token_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Look up a session by token hash.
    pub async fn find_by_token_hash(
        pool: &PgPool,
        refresh_token_hash: &str,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE refresh_token_hash = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(refresh_token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a session by token hash. Returns `true` if a row was removed.
    pub async fn delete_by_token_hash(
        pool: &PgPool,
        refresh_token_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE refresh_token_hash = $1")
            .bind(refresh_token_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Drop all expired sessions. Returns the number removed.
    pub async fn delete_expired(pool: &PgPool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < $1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
