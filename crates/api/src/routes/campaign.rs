//! Route definitions for the `/campaigns` resource.
//!
//! Also nests the membership, character, and journal sub-resources under
//! `/campaigns/{campaign_id}/...`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{campaign, character, journal};
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// GET    /                                    -> list_mine (as GM)
/// POST   /                                    -> create
/// GET    /member                              -> list_participating
/// GET    /{id}                                -> get_by_id
/// PATCH  /{id}                                -> update
/// DELETE /{id}                                -> delete
///
/// GET    /{campaign_id}/members               -> list_members (GM)
/// PUT    /{campaign_id}/members/{user_id}     -> upsert_member (GM)
/// PATCH  /{campaign_id}/members/{user_id}     -> update_member_role (GM)
/// DELETE /{campaign_id}/members/{user_id}     -> remove_member (GM)
///
/// GET    /{campaign_id}/characters            -> list_by_campaign
/// POST   /{campaign_id}/characters            -> create
///
/// GET    /{campaign_id}/journals              -> list (participants)
/// POST   /{campaign_id}/journals              -> create (GM)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(campaign::list_mine).post(campaign::create))
        .route("/member", get(campaign::list_participating))
        .route(
            "/{id}",
            get(campaign::get_by_id)
                .patch(campaign::update)
                .delete(campaign::delete),
        )
        .route("/{campaign_id}/members", get(campaign::list_members))
        .route(
            "/{campaign_id}/members/{user_id}",
            put(campaign::upsert_member)
                .patch(campaign::update_member_role)
                .delete(campaign::remove_member),
        )
        .route(
            "/{campaign_id}/characters",
            get(character::list_by_campaign).post(character::create),
        )
        .route(
            "/{campaign_id}/journals",
            get(journal::list).post(journal::create),
        )
}
