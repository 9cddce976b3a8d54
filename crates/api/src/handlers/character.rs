//! Handlers for the `/characters` resource.
//!
//! Creation is nested under campaigns
//! (`/campaigns/{campaign_id}/characters`); everything else addresses the
//! character directly.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use ttrpg_core::character::{self, Attributes};
use ttrpg_core::error::CoreError;
use ttrpg_core::types::DbId;
use ttrpg_db::models::campaign::Campaign;
use ttrpg_db::models::character::{Character, CharacterResponse, CharacterValues, NewCharacter};
use ttrpg_db::repositories::{CampaignRepo, CharacterRepo, MemberRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::campaign::is_participant;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `POST /campaigns/{campaign_id}/characters`.
///
/// `owner_id` defaults to the caller; a GM may set it to enroll a player's
/// character on their behalf.
#[derive(Debug, Deserialize)]
pub struct CreateCharacterRequest {
    pub name: String,
    pub class: String,
    pub race: String,
    pub level: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub attributes: Attributes,
    pub owner_id: Option<DbId>,
}

/// Body for `PATCH /characters/{id}`. All fields optional; the attribute
/// block is replaced as a whole when present. HP changes go through the
/// dedicated HP endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateCharacterRequest {
    pub name: Option<String>,
    pub class: Option<String>,
    pub race: Option<String>,
    pub level: Option<i32>,
    pub max_hp: Option<i32>,
    pub attributes: Option<Attributes>,
}

/// Body for `PATCH /characters/{id}/hp`. `set` wins over `delta`.
#[derive(Debug, Default, Deserialize)]
pub struct HpPatchRequest {
    pub set: Option<i32>,
    pub delta: Option<i32>,
}

/// Query string for `PATCH /characters/{id}/hp` (lowest-precedence HP source).
#[derive(Debug, Default, Deserialize)]
pub struct HpQuery {
    pub hp: Option<i32>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/campaigns/{campaign_id}/characters
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<CreateCharacterRequest>,
) -> AppResult<(StatusCode, Json<CharacterResponse>)> {
    let target = CampaignRepo::find_by_id(&state.pool, campaign_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }))?;

    let owner_id = input.owner_id.unwrap_or(user.user_id);
    if user.user_id != target.gm_id && user.user_id != owner_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the campaign GM or the intended owner may create this character".into(),
        )));
    }

    UserRepo::find_by_id(&state.pool, owner_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: owner_id,
        }))?;

    let draft = character::validate_draft(
        &input.name,
        &input.class,
        &input.race,
        input.level,
        input.hp,
        input.max_hp,
        input.attributes,
    )?;

    if !MemberRepo::exists(&state.pool, campaign_id, owner_id).await? {
        return Err(AppError::Core(CoreError::Forbidden(
            "The character's owner must be a campaign member".into(),
        )));
    }

    if CharacterRepo::exists_by_campaign_and_owner(&state.pool, campaign_id, owner_id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "This player already has a character in the campaign".into(),
        )));
    }
    if CharacterRepo::name_taken(&state.pool, campaign_id, &draft.name, None).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "A character with this name already exists in the campaign".into(),
        )));
    }

    // Races past the pre-checks land on uq_characters_* and come back as 409.
    let created = CharacterRepo::create(
        &state.pool,
        &NewCharacter {
            campaign_id,
            owner_id,
            name: draft.name,
            class: draft.class,
            race: draft.race,
            level: draft.level,
            hp: draft.hp,
            max_hp: draft.max_hp,
            attributes: draft.attributes,
        },
    )
    .await?;

    tracing::info!(character_id = created.id, campaign_id, owner_id, "Created character");
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /api/v1/characters/{id}
///
/// Readable by campaign participants (GM or member).
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<CharacterResponse>> {
    let (found, campaign) = load_with_campaign(&state, id).await?;
    if !is_participant(&state, &campaign, user.user_id).await? {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only campaign participants may view this character".into(),
        )));
    }
    Ok(Json(found.into()))
}

/// GET /api/v1/campaigns/{campaign_id}/characters
pub async fn list_by_campaign(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campaign_id): Path<DbId>,
) -> AppResult<Json<Vec<CharacterResponse>>> {
    let target = CampaignRepo::find_by_id(&state.pool, campaign_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }))?;
    if !is_participant(&state, &target, user.user_id).await? {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only campaign participants may list its characters".into(),
        )));
    }

    let characters = CharacterRepo::list_by_campaign(&state.pool, campaign_id).await?;
    Ok(Json(characters.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/characters/by-owner/{owner_id}
///
/// Restricted to the owner themself; a cross-campaign listing has no single
/// GM to defer to.
pub async fn list_by_owner(
    State(state): State<AppState>,
    user: AuthUser,
    Path(owner_id): Path<DbId>,
) -> AppResult<Json<Vec<CharacterResponse>>> {
    if user.user_id != owner_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner may list their characters".into(),
        )));
    }
    let characters = CharacterRepo::list_by_owner(&state.pool, owner_id).await?;
    Ok(Json(characters.into_iter().map(Into::into).collect()))
}

/// PATCH /api/v1/characters/{id} (owner or GM)
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCharacterRequest>,
) -> AppResult<Json<CharacterResponse>> {
    let (existing, campaign) = load_with_campaign(&state, id).await?;
    character::ensure_owner_or_gm(existing.owner_id, campaign.gm_id, user.user_id, "edit it")?;

    // Name uniqueness is checked outside the lock for the friendly error;
    // the uq_characters_campaign_name index covers the race.
    let name = match input.name.as_deref() {
        Some(raw) => {
            let name = ttrpg_core::text::require_non_blank(raw, "Character name")?;
            if CharacterRepo::name_taken(&state.pool, campaign.id, &name, Some(id)).await? {
                return Err(AppError::Core(CoreError::Conflict(
                    "A character with this name already exists in the campaign".into(),
                )));
            }
            Some(name)
        }
        None => None,
    };

    let mut tx = state.pool.begin().await?;
    let locked = CharacterRepo::find_by_id_locked(&mut *tx, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;

    let class = match input.class.as_deref() {
        Some(raw) => ttrpg_core::text::require_non_blank(raw, "Class")?,
        None => locked.class.clone(),
    };
    let race = match input.race.as_deref() {
        Some(raw) => ttrpg_core::text::require_non_blank(raw, "Race")?,
        None => locked.race.clone(),
    };

    let level = input.level.unwrap_or(locked.level);
    character::validate_level(level)?;

    let max_hp = match input.max_hp {
        Some(new_max) => {
            character::validate_new_max_hp(locked.hp, new_max)?;
            new_max
        }
        None => locked.max_hp,
    };

    let attributes = match input.attributes {
        Some(attrs) => {
            attrs.validate()?;
            attrs
        }
        None => locked.attributes(),
    };

    let values = CharacterValues {
        name: name.unwrap_or_else(|| locked.name.clone()),
        class,
        race,
        level,
        hp: locked.hp,
        max_hp,
        attributes,
    };
    let updated = CharacterRepo::update(&mut *tx, id, &values)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;
    tx.commit().await?;

    Ok(Json(updated.into()))
}

/// PATCH /api/v1/characters/{id}/hp (owner or GM)
///
/// HP sources in precedence order: body `set`, body `delta`, `?hp=` query
/// parameter. The result must stay within `[0, max_hp]`.
pub async fn patch_hp(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(query): Query<HpQuery>,
    body: Option<Json<HpPatchRequest>>,
) -> AppResult<Json<CharacterResponse>> {
    let (existing, campaign) = load_with_campaign(&state, id).await?;
    character::ensure_owner_or_gm(existing.owner_id, campaign.gm_id, user.user_id, "change its HP")?;

    let patch = body.map(|Json(b)| b).unwrap_or_default();

    let mut tx = state.pool.begin().await?;
    let locked = CharacterRepo::find_by_id_locked(&mut *tx, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;

    let new_hp = character::resolve_hp(locked.hp, locked.max_hp, patch.set, patch.delta, query.hp)?;

    let updated = CharacterRepo::update_hp(&mut *tx, id, new_hp)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;
    tx.commit().await?;

    Ok(Json(updated.into()))
}

/// DELETE /api/v1/characters/{id} (owner or GM)
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let (existing, campaign) = load_with_campaign(&state, id).await?;
    character::ensure_owner_or_gm(existing.owner_id, campaign.gm_id, user.user_id, "delete it")?;

    CharacterRepo::delete(&state.pool, id).await?;
    tracing::info!(character_id = id, "Deleted character");
    Ok(StatusCode::NO_CONTENT)
}

/// Load a character together with its campaign (which carries the GM id
/// every authorization check needs).
pub async fn load_with_campaign(
    state: &AppState,
    character_id: DbId,
) -> Result<(Character, Campaign), AppError> {
    let found = CharacterRepo::find_by_id(&state.pool, character_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id: character_id,
        }))?;
    let campaign = CampaignRepo::find_by_id(&state.pool, found.campaign_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: found.campaign_id,
        }))?;
    Ok((found, campaign))
}
