//! Global-role gates as extractors.
//!
//! Campaign-level authorization (GM-of-this-campaign, owner-of-this-sheet)
//! lives in the handlers because it needs loaded rows; the extractors here
//! only gate on roles carried in the token, which is all the admin surface
//! needs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ttrpg_core::error::CoreError;
use ttrpg_core::roles::GlobalRole;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Admits only callers holding the ADMIN global role; everyone else gets
/// 403 before the handler body runs.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.has_role(GlobalRole::Admin) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
