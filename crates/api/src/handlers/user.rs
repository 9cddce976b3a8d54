//! Handlers for the `/users` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use ttrpg_core::error::CoreError;
use ttrpg_core::types::DbId;
use ttrpg_db::models::user::UserResponse;
use ttrpg_db::repositories::{CampaignRepo, CharacterRepo, JournalRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Query string for `GET /users/by-username`.
#[derive(Debug, Deserialize)]
pub struct ByUsernameQuery {
    pub username: String,
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    let roles = UserRepo::roles(&state.pool, user.id).await?;
    Ok(Json(UserResponse::from_user(&user, roles)))
}

/// GET /api/v1/users/by-username?username=...
pub async fn get_by_username(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ByUsernameQuery>,
) -> AppResult<Json<UserResponse>> {
    let username = query.username.trim();
    // Name-keyed lookup; there is no id to put in a NotFound, so the
    // RowNotFound mapping supplies the 404.
    let user = UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
    let roles = UserRepo::roles(&state.pool, user.id).await?;
    Ok(Json(UserResponse::from_user(&user, roles)))
}

/// GET /api/v1/users (admin only)
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    let mut responses = Vec::with_capacity(users.len());
    for user in &users {
        let roles = UserRepo::roles(&state.pool, user.id).await?;
        responses.push(UserResponse::from_user(user, roles));
    }
    Ok(Json(responses))
}

/// DELETE /api/v1/users/{id} (admin only)
///
/// Blocked while the user is a campaign GM, owns characters, or authored
/// journal entries -- deleting them would orphan or silently drop content.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    if CampaignRepo::exists_by_gm(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "User is a campaign GM; transfer or delete the campaign first".into(),
        )));
    }
    if CharacterRepo::exists_by_owner(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "User owns characters; transfer or delete them first".into(),
        )));
    }
    if JournalRepo::exists_by_author(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "User authored journal entries; delete them first".into(),
        )));
    }

    let mut tx = state.pool.begin().await?;
    let deleted = UserRepo::delete(&mut *tx, id).await?;
    tx.commit().await?;

    if deleted {
        tracing::info!(user_id = id, "Deleted user");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}
