//! Handlers for the `/auth` resource (register, login, refresh, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use ttrpg_core::error::CoreError;
use ttrpg_core::roles::GlobalRole;
use ttrpg_core::types::DbId;
use ttrpg_db::models::user::{CreateUser, UserResponse};
use ttrpg_db::repositories::{SessionRepo, UserRepo};
use validator::Validate;

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, hash_refresh_token,
};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Minimum password length enforced at registration.
const MIN_PASSWORD_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 30))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`. `identifier` accepts a username or
/// an email address.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh` and `POST /auth/logout`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub roles: Vec<GlobalRole>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a new account with the PLAYER global role.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let username = input.username.trim().to_string();
    let email = input.email.trim().to_lowercase();

    let normalized = RegisterRequest {
        username: username.clone(),
        email: email.clone(),
        password: input.password.clone(),
    };
    normalized
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::exists_by_username(&state.pool, &username).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Username is already taken".into(),
        )));
    }
    if UserRepo::exists_by_email(&state.pool, &email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already taken".into(),
        )));
    }

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // A racing duplicate slips past the pre-checks and lands on the uq_users_*
    // constraints, which the error classifier converts to 409.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            email,
            password_hash: hashed,
        },
    )
    .await?;

    UserRepo::grant_role(&state.pool, user.id, GlobalRole::Player).await?;
    let roles = UserRepo::roles(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, "Registered new user");
    Ok((
        StatusCode::CREATED,
        Json(UserResponse::from_user(&user, roles)),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username-or-email + password. Returns access and
/// refresh tokens. The failure message never reveals which part was wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_username_or_email(&state.pool, input.identifier.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    let response = create_auth_response(&state, user.id, &user.username, &user.email).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens. The old
/// session is revoked (refresh tokens are single-use).
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid refresh token".into())))?;

    if session.expires_at < Utc::now() {
        SessionRepo::delete_by_token_hash(&state.pool, &token_hash).await?;
        return Err(AppError::Core(CoreError::Unauthorized(
            "Refresh token expired".into(),
        )));
    }

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid refresh token".into())))?;

    SessionRepo::delete_by_token_hash(&state.pool, &token_hash).await?;

    let response = create_auth_response(&state, user.id, &user.username, &user.email).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke the presented refresh token's session.
pub async fn logout(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<StatusCode> {
    let token_hash = hash_refresh_token(&input.refresh_token);
    SessionRepo::delete_by_token_hash(&state.pool, &token_hash).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Generate tokens, persist the refresh session, and build the response.
async fn create_auth_response(
    state: &AppState,
    user_id: DbId,
    username: &str,
    email: &str,
) -> AppResult<AuthResponse> {
    let roles = UserRepo::roles(&state.pool, user_id).await?;

    let access_token = generate_access_token(user_id, &roles, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let refresh_token = generate_refresh_token();
    let refresh_hash = hash_refresh_token(&refresh_token);
    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);
    SessionRepo::create(&state.pool, user_id, &refresh_hash, expires_at).await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserInfo {
            id: user_id,
            username: username.to_string(),
            email: email.to_string(),
            roles,
        },
    })
}
