//! Route definitions for the `/characters` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::{character, inventory};
use crate::state::AppState;

/// Routes mounted at `/characters`.
///
/// ```text
/// GET    /{id}                           -> get_by_id
/// PATCH  /{id}                           -> update
/// DELETE /{id}                           -> delete
/// PATCH  /{id}/hp                        -> patch_hp
/// GET    /by-owner/{owner_id}            -> list_by_owner
///
/// GET    /{character_id}/inventory            -> get_inventory
/// POST   /{character_id}/inventory            -> give_item (GM)
/// PATCH  /{character_id}/inventory/{item_id}  -> set_quantity (GM)
/// DELETE /{character_id}/inventory/{item_id}  -> remove_or_consume
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/by-owner/{owner_id}", get(character::list_by_owner))
        .route(
            "/{id}",
            get(character::get_by_id)
                .patch(character::update)
                .delete(character::delete),
        )
        .route("/{id}/hp", patch(character::patch_hp))
        .route(
            "/{character_id}/inventory",
            get(inventory::get_inventory).post(inventory::give_item),
        )
        .route(
            "/{character_id}/inventory/{item_id}",
            patch(inventory::set_quantity).delete(inventory::remove_or_consume),
        )
}
