//! HTTP error mapping.
//!
//! Handlers return [`AppResult`]; every failure funnels through
//! [`AppError::into_response`] so the wire format stays uniform:
//! `{"error": <message>, "code": <symbolic code>}`.
//!
//! Domain failures carry their status via the [`CoreError`] taxonomy.
//! Storage failures are classified here: constraint violations that back up
//! the domain invariants become 409s, everything else is logged and
//! sanitized to an opaque 500 so no storage detail leaks to the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use ttrpg_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An assumption the handlers rely on broke mid-operation (a row
    /// vanished between statements, a hasher failed). Logged, reported as
    /// an opaque 500.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    fn response_parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Core(CoreError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::Core(CoreError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Core(CoreError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
            }
            AppError::Core(CoreError::Internal(msg)) => {
                tracing::error!(error = %msg, "Internal core error");
                internal()
            }
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.response_parts();
        let body = json!({ "error": message, "code": code });
        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error.
///
/// Two Postgres error codes are part of the domain contract and map to 409
/// instead of 500:
///
/// - 23505 on a `uq_*` constraint: a uniqueness race slipped past the
///   handler's pre-check (duplicate registration, campaign name, character
///   slot). The index is the authority; the caller sees the same Conflict
///   the pre-check would have produced.
/// - 23503 on a RESTRICT foreign key: a reference appeared between the
///   handler's "still referenced?" check and the delete (item held in an
///   inventory, user still owning rows).
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    let sqlx::Error::Database(db_err) = err else {
        if matches!(err, sqlx::Error::RowNotFound) {
            return (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            );
        }
        tracing::error!(error = %err, "Database error");
        return internal();
    };

    match db_err.code().as_deref() {
        Some("23505") => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                );
            }
        }
        Some("23503") => {
            return (
                StatusCode::CONFLICT,
                "CONFLICT",
                "Entity is still referenced and cannot be deleted".to_string(),
            );
        }
        _ => {}
    }
    tracing::error!(error = %db_err, "Database error");
    internal()
}
