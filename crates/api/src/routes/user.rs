//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /               -> list (admin)
/// GET    /by-username    -> get_by_username
/// GET    /{id}           -> get_by_id
/// DELETE /{id}           -> delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list))
        .route("/by-username", get(user::get_by_username))
        .route("/{id}", get(user::get_by_id).delete(user::delete))
}
