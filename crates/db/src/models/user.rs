//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ttrpg_core::roles::GlobalRole;
use ttrpg_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub roles: Vec<GlobalRole>,
    pub created_at: Timestamp,
}

impl UserResponse {
    pub fn from_user(user: &User, roles: Vec<GlobalRole>) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            roles,
            created_at: user.created_at,
        }
    }
}

/// DTO for inserting a new user. The password arrives already hashed.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
