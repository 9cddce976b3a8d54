//! Handlers for the `/items` resource (global catalog).
//!
//! Authoring the catalog is an admin concern; deletion is additionally open
//! to users holding the GAME_MASTER global role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use ttrpg_core::error::CoreError;
use ttrpg_core::roles::GlobalRole;
use ttrpg_core::text::{normalize_optional, require_non_blank};
use ttrpg_core::types::DbId;
use ttrpg_db::models::item::{CreateItem, Item, UpdateItem};
use ttrpg_db::repositories::{InventoryRepo, ItemRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Query string for `GET /items`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
}

fn validate_weight(weight: f64) -> Result<(), AppError> {
    if weight < 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Weight must not be negative".into(),
        )));
    }
    Ok(())
}

fn validate_price(price: i64) -> Result<(), AppError> {
    if price < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Price must not be negative".into(),
        )));
    }
    Ok(())
}

/// POST /api/v1/items (admin only)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<Item>)> {
    let name = require_non_blank(&input.name, "Item name")?;
    let description = normalize_optional(input.description.as_deref());
    let weight = input.weight.unwrap_or(0.0);
    let price = input.price.unwrap_or(0);
    validate_weight(weight)?;
    validate_price(price)?;

    if ItemRepo::name_taken(&state.pool, &name, None).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "An item with this name already exists".into(),
        )));
    }

    let created = ItemRepo::create(&state.pool, &name, description.as_deref(), weight, price).await?;
    tracing::info!(item_id = created.id, "Created item");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/v1/items/{id} (admin only)
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateItem>,
) -> AppResult<Json<Item>> {
    ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;

    let name = match input.name.as_deref() {
        Some(raw) => {
            let name = require_non_blank(raw, "Item name")?;
            if ItemRepo::name_taken(&state.pool, &name, Some(id)).await? {
                return Err(AppError::Core(CoreError::Conflict(
                    "An item with this name already exists".into(),
                )));
            }
            Some(name)
        }
        None => None,
    };
    if let Some(weight) = input.weight {
        validate_weight(weight)?;
    }
    if let Some(price) = input.price {
        validate_price(price)?;
    }
    let description = input.description.as_deref().map(str::trim);

    let updated = ItemRepo::update(
        &state.pool,
        id,
        name.as_deref(),
        description,
        input.weight,
        input.price,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/items/{id} (admin or global GAME_MASTER)
///
/// Refused while the item is referenced by any character's inventory.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !user.has_role(GlobalRole::Admin) && !user.has_role(GlobalRole::GameMaster) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admin or game-master role required to delete items".into(),
        )));
    }

    ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;

    if InventoryRepo::exists_by_item(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Item is held in character inventories and cannot be deleted".into(),
        )));
    }

    ItemRepo::delete(&state.pool, id).await?;
    tracing::info!(item_id = id, "Deleted item");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Item>> {
    let found = ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;
    Ok(Json(found))
}

/// GET /api/v1/items?name=... -- substring search over the catalog.
pub async fn search(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Item>>> {
    let fragment = normalize_optional(query.name.as_deref());
    let items = ItemRepo::search_by_name(&state.pool, fragment.as_deref()).await?;
    Ok(Json(items))
}
