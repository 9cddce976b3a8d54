//! Handlers for the inventory ledger.
//!
//! Give, set, consume, and remove are distinct operations with distinct
//! authorization predicates (granting is world-authoring, spending is a
//! player action); the legacy signed-delta endpoint delegates to the same
//! predicates. Every mutation locks the ledger row inside a transaction so
//! concurrent calls on the same (character, item) pair serialize.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sqlx::PgConnection;
use ttrpg_core::error::CoreError;
use ttrpg_core::ledger::{self, DeltaKind, LedgerChange};
use ttrpg_core::types::DbId;
use ttrpg_db::models::inventory::InventoryEntry;
use ttrpg_db::repositories::{InventoryRepo, ItemRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::character::load_with_campaign;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `POST /characters/{character_id}/inventory` (give).
#[derive(Debug, Deserialize)]
pub struct GiveItemRequest {
    pub item_id: DbId,
    pub quantity: i64,
}

/// Body for `PATCH /characters/{character_id}/inventory/{item_id}` (set).
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

/// Optional body for the DELETE endpoint: present means consume that many,
/// absent means remove the entry entirely.
#[derive(Debug, Deserialize)]
pub struct ConsumeRequest {
    pub quantity: i64,
}

/// Body for the legacy `POST /inventory/change` endpoint.
#[derive(Debug, Deserialize)]
pub struct ChangeQuantityRequest {
    pub character_id: DbId,
    pub item_id: DbId,
    pub delta: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/characters/{character_id}/inventory (owner or GM)
pub async fn get_inventory(
    State(state): State<AppState>,
    user: AuthUser,
    Path(character_id): Path<DbId>,
) -> AppResult<Json<Vec<InventoryEntry>>> {
    let (found, campaign) = load_with_campaign(&state, character_id).await?;
    if user.user_id != found.owner_id && user.user_id != campaign.gm_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the character's owner or the campaign GM may view the inventory".into(),
        )));
    }

    let entries = InventoryRepo::list_by_character(&state.pool, character_id).await?;
    Ok(Json(entries))
}

/// POST /api/v1/characters/{character_id}/inventory (GM only)
pub async fn give_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(character_id): Path<DbId>,
    Json(input): Json<GiveItemRequest>,
) -> AppResult<StatusCode> {
    let (_, campaign) = load_with_campaign(&state, character_id).await?;
    if user.user_id != campaign.gm_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the GM may give items to a character".into(),
        )));
    }
    ensure_item_exists(&state, input.item_id).await?;

    let mut tx = state.pool.begin().await?;
    let existing = InventoryRepo::find_locked(&mut *tx, character_id, input.item_id)
        .await?
        .map(|e| e.quantity);
    let change = ledger::give(existing, input.quantity)?;
    apply_change(&mut *tx, character_id, input.item_id, change).await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/characters/{character_id}/inventory/{item_id} (GM only)
///
/// Absolute-value mutation is a stronger privilege than the relative give,
/// so it stays GM-only. Quantity zero deletes the row, idempotently.
pub async fn set_quantity(
    State(state): State<AppState>,
    user: AuthUser,
    Path((character_id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<SetQuantityRequest>,
) -> AppResult<StatusCode> {
    let (_, campaign) = load_with_campaign(&state, character_id).await?;
    if user.user_id != campaign.gm_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the GM may set inventory quantities".into(),
        )));
    }
    ensure_item_exists(&state, item_id).await?;

    let mut tx = state.pool.begin().await?;
    let existing = InventoryRepo::find_locked(&mut *tx, character_id, item_id)
        .await?
        .map(|e| e.quantity);
    if let Some(change) = ledger::set(existing, input.quantity)? {
        apply_change(&mut *tx, character_id, item_id, change).await?;
    }
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/characters/{character_id}/inventory/{item_id}
///
/// Without a body: unconditional removal, allowed for the GM or the owner.
/// With `{"quantity": n}`: consume, allowed for the owner only.
pub async fn remove_or_consume(
    State(state): State<AppState>,
    user: AuthUser,
    Path((character_id, item_id)): Path<(DbId, DbId)>,
    body: Option<Json<ConsumeRequest>>,
) -> AppResult<StatusCode> {
    let (found, campaign) = load_with_campaign(&state, character_id).await?;

    match body {
        None => {
            if user.user_id != found.owner_id && user.user_id != campaign.gm_id {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Only the character's owner or the campaign GM may remove items".into(),
                )));
            }
            let mut tx = state.pool.begin().await?;
            let existing = InventoryRepo::find_locked(&mut *tx, character_id, item_id)
                .await?
                .map(|e| e.quantity);
            let change = ledger::remove(existing, item_id)?;
            apply_change(&mut *tx, character_id, item_id, change).await?;
            tx.commit().await?;
        }
        Some(Json(input)) => {
            if user.user_id != found.owner_id {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Only the character's owner may consume items".into(),
                )));
            }
            let mut tx = state.pool.begin().await?;
            let existing = InventoryRepo::find_locked(&mut *tx, character_id, item_id)
                .await?
                .map(|e| e.quantity);
            let change = ledger::consume(existing, input.quantity, item_id)?;
            apply_change(&mut *tx, character_id, item_id, change).await?;
            tx.commit().await?;
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/inventory/change (legacy combined operation)
///
/// A positive delta behaves like give (GM only); a negative delta behaves
/// like consume of the magnitude (owner only); zero is rejected.
pub async fn change_quantity(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ChangeQuantityRequest>,
) -> AppResult<StatusCode> {
    let kind = ledger::classify_delta(input.delta)?;

    let (found, campaign) = load_with_campaign(&state, input.character_id).await?;
    ensure_item_exists(&state, input.item_id).await?;

    let mut tx = state.pool.begin().await?;
    let existing = InventoryRepo::find_locked(&mut *tx, input.character_id, input.item_id)
        .await?
        .map(|e| e.quantity);

    let change = match kind {
        DeltaKind::Give(quantity) => {
            if user.user_id != campaign.gm_id {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Only the GM may give items to a character".into(),
                )));
            }
            ledger::give(existing, quantity)?
        }
        DeltaKind::Consume(quantity) => {
            if user.user_id != found.owner_id {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Only the character's owner may consume items".into(),
                )));
            }
            ledger::consume(existing, quantity, input.item_id)?
        }
    };
    apply_change(&mut *tx, input.character_id, input.item_id, change).await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_item_exists(state: &AppState, item_id: DbId) -> Result<(), AppError> {
    ItemRepo::find_by_id(&state.pool, item_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        }))?;
    Ok(())
}

/// Persist a computed ledger transition inside the caller's transaction.
async fn apply_change(
    conn: &mut PgConnection,
    character_id: DbId,
    item_id: DbId,
    change: LedgerChange,
) -> Result<(), sqlx::Error> {
    match change {
        LedgerChange::Upsert(quantity) => {
            InventoryRepo::upsert_quantity(conn, character_id, item_id, quantity).await?;
        }
        LedgerChange::Delete => {
            InventoryRepo::delete_entry(conn, character_id, item_id).await?;
        }
    }
    Ok(())
}
