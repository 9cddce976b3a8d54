//! Route definitions for the legacy `/inventory` endpoint. The canonical
//! inventory routes live under `/characters/{character_id}/inventory`.

use axum::routing::post;
use axum::Router;

use crate::handlers::inventory;
use crate::state::AppState;

/// Routes mounted at `/inventory`.
///
/// ```text
/// POST /change -> change_quantity (signed delta; GM for +, owner for -)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/change", post(inventory::change_quantity))
}
