//! Route definitions for the `/journals` resource. Campaign-scoped listing
//! and creation live under `/campaigns/{campaign_id}/journals`.

use axum::routing::get;
use axum::Router;

use crate::handlers::journal;
use crate::state::AppState;

/// Routes mounted at `/journals`.
///
/// ```text
/// GET    /personal -> list_personal
/// POST   /personal -> create_personal
/// GET    /{id}     -> get_by_id
/// PATCH  /{id}     -> update
/// DELETE /{id}     -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/personal",
            get(journal::list_personal).post(journal::create_personal),
        )
        .route(
            "/{id}",
            get(journal::get_by_id)
                .patch(journal::update)
                .delete(journal::delete),
        )
}
