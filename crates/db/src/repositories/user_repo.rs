//! Repository for the `users` and `user_roles` tables.

use sqlx::{PgConnection, PgPool};
use ttrpg_core::roles::GlobalRole;
use ttrpg_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

/// Provides CRUD operations for users and their global roles.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Uniqueness races surface as a `uq_users_*` constraint violation; the
    /// caller converts that into a Conflict.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Grant a global role. Idempotent.
    pub async fn grant_role(
        pool: &PgPool,
        user_id: DbId,
        role: GlobalRole,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role) VALUES ($1, $2)
             ON CONFLICT (user_id, role) DO NOTHING",
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Load a user's global roles. Unknown role strings are skipped rather
    /// than failing the whole lookup; the CHECK constraint makes them
    /// unreachable in practice.
    pub async fn roles(pool: &PgPool, user_id: DbId) -> Result<Vec<GlobalRole>, sqlx::Error> {
        let names: Vec<String> =
            sqlx::query_scalar("SELECT role FROM user_roles WHERE user_id = $1 ORDER BY role")
                .bind(user_id)
                .fetch_all(pool)
                .await?;
        Ok(names
            .iter()
            .filter_map(|n| GlobalRole::parse(n).ok())
            .collect())
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by exact username.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username or (case-normalized) email. Used by login,
    /// which accepts either identifier.
    pub async fn find_by_username_or_email(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1 OR email = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(identifier)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists_by_username(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await
    }

    pub async fn exists_by_email(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// List all users, ordered by username.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY username ASC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Delete a user. Runs inside a caller-provided transaction so the
    /// referential guards checked just before stay authoritative.
    /// Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
