//! Bearer-token authentication extractor.
//!
//! Every protected handler names [`AuthUser`] as a parameter; extraction
//! validates the JWT and yields the caller's id plus parsed global roles.
//! Handlers pass `user.user_id` explicitly into the domain functions, so
//! nothing below this layer ever reads ambient request state.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ttrpg_core::error::CoreError;
use ttrpg_core::roles::GlobalRole;
use ttrpg_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, as established by the access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Internal database id (the token's `sub` claim).
    pub user_id: DbId,
    /// Global roles carried in the token. Roles granted after the token was
    /// issued appear only once the caller logs in again.
    pub roles: Vec<GlobalRole>,
}

impl AuthUser {
    pub fn has_role(&self, role: GlobalRole) -> bool {
        self.roles.contains(&role)
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        // Unknown role strings in an otherwise valid token are dropped, not
        // fatal: the token already proves identity.
        let roles = claims
            .roles
            .iter()
            .filter_map(|r| GlobalRole::parse(r).ok())
            .collect();

        Ok(AuthUser {
            user_id: claims.sub,
            roles,
        })
    }
}
