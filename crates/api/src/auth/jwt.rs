//! JWT access-token generation/validation and refresh-token helpers.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload.
//! Refresh tokens are opaque random strings; only their SHA-256 hash is stored
//! server-side so a database leak does not compromise active sessions.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use ttrpg_core::roles::GlobalRole;
use ttrpg_core::types::DbId;
use uuid::Uuid;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's global role names (e.g. `["PLAYER", "ADMIN"]`).
    pub roles: Vec<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for revocation / audit.
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 7).
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Load the JWT settings. `JWT_SECRET` is required (and must be
    /// non-empty); `JWT_ACCESS_EXPIRY_MINS` defaults to 15 and
    /// `JWT_REFRESH_EXPIRY_DAYS` to 7.
    ///
    /// # Panics
    ///
    /// Panics on a missing/empty secret or unparseable expiry, stopping
    /// the process at startup.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let expiry = |key: &str, default: &str| -> i64 {
            std::env::var(key)
                .unwrap_or_else(|_| default.to_string())
                .parse()
                .unwrap_or_else(|_| panic!("{key} must be a valid i64"))
        };

        Self {
            secret,
            access_token_expiry_mins: expiry("JWT_ACCESS_EXPIRY_MINS", "15"),
            refresh_token_expiry_days: expiry("JWT_REFRESH_EXPIRY_DAYS", "7"),
        }
    }
}

/// Generate an HS256 access token for the given user.
pub fn generate_access_token(
    user_id: DbId,
    roles: &[GlobalRole],
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        roles: roles.iter().map(|r| r.as_str().to_string()).collect(),
        exp: (now + chrono::Duration::minutes(config.access_token_expiry_mins)).timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate an access token and return its claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Generate an opaque refresh token: 32 random bytes, hex-encoded.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    to_hex(&bytes)
}

/// SHA-256 hash of a refresh token, hex-encoded, as stored in `sessions`.
pub fn hash_refresh_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    to_hex(&digest)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
