pub mod auth;
pub mod campaign;
pub mod character;
pub mod health;
pub mod inventory;
pub mod item;
pub mod journal;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                  register (public)
/// /auth/login                                     login (public)
/// /auth/refresh                                   refresh (public)
/// /auth/logout                                    logout
///
/// /users                                          list (admin)
/// /users/by-username                              lookup by username
/// /users/{id}                                     get, delete (admin)
///
/// /campaigns                                      list mine, create
/// /campaigns/member                               list participating
/// /campaigns/{id}                                 get, update, delete (GM)
/// /campaigns/{campaign_id}/members                list (GM)
/// /campaigns/{campaign_id}/members/{user_id}      upsert, role-patch, remove (GM)
/// /campaigns/{campaign_id}/characters             list, create
/// /campaigns/{campaign_id}/journals               list, create (GM)
///
/// /characters/{id}                                get, update, delete
/// /characters/{id}/hp                             HP patch
/// /characters/by-owner/{owner_id}                 owner's characters
/// /characters/{character_id}/inventory            list, give (GM)
/// /characters/{character_id}/inventory/{item_id}  set (GM), remove/consume
///
/// /inventory/change                               legacy signed-delta op
///
/// /items                                          search, create (admin)
/// /items/{id}                                     get, update (admin), delete
///
/// /journals/personal                              personal entries
/// /journals/{id}                                  get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", user::router())
        .nest("/campaigns", campaign::router())
        .nest("/characters", character::router())
        .nest("/inventory", inventory::router())
        .nest("/items", item::router())
        .nest("/journals", journal::router())
}
