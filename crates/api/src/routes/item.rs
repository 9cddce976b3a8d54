//! Route definitions for the `/items` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::item;
use crate::state::AppState;

/// Routes mounted at `/items`.
///
/// ```text
/// GET    /       -> search (?name=)
/// POST   /       -> create (admin)
/// GET    /{id}   -> get_by_id
/// PATCH  /{id}   -> update (admin)
/// DELETE /{id}   -> delete (admin or game-master)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(item::search).post(item::create))
        .route(
            "/{id}",
            get(item::get_by_id).patch(item::update).delete(item::delete),
        )
}
