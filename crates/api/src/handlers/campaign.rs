//! Handlers for the `/campaigns` resource, including the membership
//! sub-resource.
//!
//! Every mutation takes the authenticated caller and re-checks the GM gate
//! against the loaded campaign row; nothing trusts ambient state.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use ttrpg_core::error::CoreError;
use ttrpg_core::roles::CampaignRole;
use ttrpg_core::types::DbId;
use ttrpg_core::{campaign, membership, text};
use ttrpg_db::models::campaign::{Campaign, CreateCampaign, UpdateCampaign};
use ttrpg_db::models::member::{MemberWithUser, UpsertMemberResult};
use ttrpg_db::repositories::{CampaignRepo, CharacterRepo, MemberRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `PUT /campaigns/{campaign_id}/members/{user_id}`. The role
/// defaults to PLAYER when the body is omitted.
#[derive(Debug, Default, Deserialize)]
pub struct UpsertMemberRequest {
    pub role: Option<CampaignRole>,
}

/// Body for `PATCH /campaigns/{campaign_id}/members/{user_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRoleRequest {
    pub role: CampaignRole,
}

// ---------------------------------------------------------------------------
// Campaign CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/campaigns
///
/// The caller becomes the campaign's GM and is inserted as a GM member in
/// the same transaction (idempotently, so a retry after a half-applied
/// create converges).
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCampaign>,
) -> AppResult<(StatusCode, Json<Campaign>)> {
    let gm = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;

    let name = campaign::normalize_name(&input.name)?;
    let description = text::normalize_optional(input.description.as_deref());

    let mut tx = state.pool.begin().await?;
    let created = CampaignRepo::create(&mut *tx, gm.id, &name, description.as_deref()).await?;
    MemberRepo::insert_if_absent(&mut *tx, created.id, gm.id, CampaignRole::Gm).await?;
    tx.commit().await?;

    tracing::info!(campaign_id = created.id, gm_id = gm.id, "Created campaign");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Campaign>> {
    let found = CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }))?;
    Ok(Json(found))
}

/// GET /api/v1/campaigns -- campaigns the caller owns as GM, newest first.
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Campaign>>> {
    let campaigns = CampaignRepo::list_by_gm(&state.pool, user.user_id).await?;
    Ok(Json(campaigns))
}

/// GET /api/v1/campaigns/member -- campaigns the caller participates in
/// (as GM or player), newest first.
pub async fn list_participating(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Campaign>>> {
    let campaigns = CampaignRepo::list_by_member(&state.pool, user.user_id).await?;
    Ok(Json(campaigns))
}

/// PATCH /api/v1/campaigns/{id} (GM only)
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaign>,
) -> AppResult<Json<Campaign>> {
    let existing = CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }))?;
    campaign::ensure_gm(existing.gm_id, user.user_id, "edit the campaign")?;

    let name = match input.name.as_deref() {
        Some(raw) => Some(campaign::normalize_name(raw)?),
        None => None,
    };
    let description = input.description.as_deref().map(str::trim);

    let updated = CampaignRepo::update(&state.pool, id, name.as_deref(), description)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/campaigns/{id} (GM only)
///
/// Refused while any character exists in the campaign; members and journal
/// entries cascade at the store level.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }))?;
    campaign::ensure_gm(existing.gm_id, user.user_id, "delete the campaign")?;

    let has_characters = CharacterRepo::exists_in_campaign(&state.pool, id).await?;
    campaign::ensure_deletable(has_characters)?;

    CampaignRepo::delete(&state.pool, id).await?;
    tracing::info!(campaign_id = id, "Deleted campaign");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Membership sub-resource
// ---------------------------------------------------------------------------

/// PUT /api/v1/campaigns/{campaign_id}/members/{user_id} (GM only)
///
/// Idempotent PUT: inserts the membership, updates its role, or does
/// nothing, reporting `created` accordingly. Safe against concurrent
/// identical PUTs -- the losing writer of the insert race re-reads and
/// converges on the no-op outcome.
pub async fn upsert_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path((campaign_id, member_id)): Path<(DbId, DbId)>,
    body: Option<Json<UpsertMemberRequest>>,
) -> AppResult<(StatusCode, Json<UpsertMemberResult>)> {
    let target = CampaignRepo::find_by_id(&state.pool, campaign_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }))?;
    campaign::ensure_gm(target.gm_id, user.user_id, "manage members")?;

    UserRepo::find_by_id(&state.pool, member_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: member_id,
        }))?;

    let requested = body.and_then(|Json(b)| b.role);

    let mut tx = state.pool.begin().await?;
    let existing = MemberRepo::find_locked(&mut *tx, campaign_id, member_id).await?;
    let existing_role = existing.map(|m| m.role()).transpose()?;

    let action = membership::resolve_upsert(existing_role, requested, member_id, target.gm_id)?;
    let created = match action {
        membership::UpsertAction::Insert(role) => {
            let inserted = MemberRepo::insert_if_absent(&mut *tx, campaign_id, member_id, role).await?;
            if !inserted {
                // Lost the insert race: converge on the idempotent outcome.
                let current = MemberRepo::find_locked(&mut *tx, campaign_id, member_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError("Membership row vanished mid-upsert".into())
                    })?;
                if current.role()? != role {
                    MemberRepo::update_role(&mut *tx, campaign_id, member_id, role).await?;
                }
            }
            inserted
        }
        membership::UpsertAction::Update(role) => {
            MemberRepo::update_role(&mut *tx, campaign_id, member_id, role).await?;
            false
        }
        membership::UpsertAction::Noop => false,
    };
    tx.commit().await?;

    let member = MemberRepo::get_with_user(&state.pool, campaign_id, member_id)
        .await?
        .ok_or_else(|| AppError::InternalError("Membership row vanished after upsert".into()))?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(UpsertMemberResult { member, created })))
}

/// PATCH /api/v1/campaigns/{campaign_id}/members/{user_id} (GM only)
///
/// Unlike the PUT upsert, this fails NotFound when the membership row does
/// not exist.
pub async fn update_member_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path((campaign_id, member_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateMemberRoleRequest>,
) -> AppResult<Json<MemberWithUser>> {
    let target = CampaignRepo::find_by_id(&state.pool, campaign_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }))?;
    campaign::ensure_gm(target.gm_id, user.user_id, "change member roles")?;
    membership::ensure_single_gm(input.role, member_id, target.gm_id)?;

    let mut tx = state.pool.begin().await?;
    let updated = MemberRepo::update_role(&mut *tx, campaign_id, member_id, input.role).await?;
    tx.commit().await?;

    if updated.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CampaignMember",
            id: member_id,
        }));
    }

    let member = MemberRepo::get_with_user(&state.pool, campaign_id, member_id)
        .await?
        .ok_or_else(|| AppError::InternalError("Membership row vanished after update".into()))?;
    Ok(Json(member))
}

/// DELETE /api/v1/campaigns/{campaign_id}/members/{user_id} (GM only)
///
/// The owning GM cannot be removed. Removal cascades to the member's
/// characters in this campaign, in the same transaction.
pub async fn remove_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path((campaign_id, member_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let target = CampaignRepo::find_by_id(&state.pool, campaign_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }))?;
    campaign::ensure_gm(target.gm_id, user.user_id, "remove members")?;
    membership::ensure_removable(member_id, target.gm_id)?;

    let mut tx = state.pool.begin().await?;
    let removed = MemberRepo::delete(&mut *tx, campaign_id, member_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CampaignMember",
            id: member_id,
        }));
    }
    let dropped =
        CharacterRepo::delete_by_campaign_and_owner(&mut *tx, campaign_id, member_id).await?;
    tx.commit().await?;

    tracing::info!(
        campaign_id,
        user_id = member_id,
        characters_dropped = dropped,
        "Removed campaign member"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/campaigns/{campaign_id}/members (GM only)
pub async fn list_members(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campaign_id): Path<DbId>,
) -> AppResult<Json<Vec<MemberWithUser>>> {
    let target = CampaignRepo::find_by_id(&state.pool, campaign_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }))?;
    campaign::ensure_gm(target.gm_id, user.user_id, "list members")?;

    let members = MemberRepo::list_with_users(&state.pool, campaign_id).await?;
    Ok(Json(members))
}

/// Shared participant check used by character and journal reads: the caller
/// must be the campaign GM or a member.
pub async fn is_participant(
    state: &AppState,
    campaign: &Campaign,
    user_id: DbId,
) -> Result<bool, AppError> {
    if campaign.gm_id == user_id {
        return Ok(true);
    }
    Ok(MemberRepo::exists(&state.pool, campaign.id, user_id).await?)
}

