//! Refresh-token session model.

use sqlx::FromRow;
use ttrpg_core::types::{DbId, Timestamp};

/// A session row from the `sessions` table. Holds only the hash of the
/// opaque refresh token, never the token itself.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
