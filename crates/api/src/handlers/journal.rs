//! Handlers for journal entries: campaign-scoped (GM-authored,
//! visibility-filtered) and personal (campaign-less, author-private).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use ttrpg_core::campaign::ensure_gm;
use ttrpg_core::error::CoreError;
use ttrpg_core::journal::{self, Visibility, TITLE_MAX_LEN, TYPE_MAX_LEN};
use ttrpg_core::text::{normalize_optional, require_non_blank, require_non_blank_max};
use ttrpg_core::types::DbId;
use ttrpg_db::models::journal::{CreateJournalEntry, JournalEntry, UpdateJournalEntry};
use ttrpg_db::repositories::{CampaignRepo, JournalRepo, MemberRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query string for `GET /campaigns/{campaign_id}/journals`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    #[serde(default)]
    pub only_players_visible: bool,
}

/// Validate the shared create-entry fields, returning normalized values.
fn validate_entry(
    input: &CreateJournalEntry,
) -> Result<(String, Visibility, String, String, Option<String>), AppError> {
    let entry_type = require_non_blank_max(&input.entry_type, "Entry type", TYPE_MAX_LEN)?;
    let visibility = input.visibility.ok_or_else(|| {
        AppError::Core(CoreError::Validation("Visibility must be provided".into()))
    })?;
    let title = require_non_blank_max(&input.title, "Title", TITLE_MAX_LEN)?;
    let content = require_non_blank(&input.content, "Content")?;
    let tags = normalize_optional(input.tags.as_deref());
    Ok((entry_type, visibility, title, content, tags))
}

// ---------------------------------------------------------------------------
// Campaign-scoped entries
// ---------------------------------------------------------------------------

/// POST /api/v1/campaigns/{campaign_id}/journals (GM only)
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<CreateJournalEntry>,
) -> AppResult<(StatusCode, Json<JournalEntry>)> {
    let target = CampaignRepo::find_by_id(&state.pool, campaign_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }))?;
    ensure_gm(target.gm_id, user.user_id, "create journal entries")?;

    let (entry_type, visibility, title, content, tags) = validate_entry(&input)?;

    let created = JournalRepo::create(
        &state.pool,
        Some(campaign_id),
        user.user_id,
        &entry_type,
        visibility,
        &title,
        &content,
        tags.as_deref(),
    )
    .await?;

    tracing::info!(entry_id = created.id, campaign_id, "Created journal entry");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/campaigns/{campaign_id}/journals (participants)
///
/// The GM sees all entries unless `only_players_visible=true`; players only
/// ever see PLAYERS entries. Optional case-insensitive type filter. Newest
/// first.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campaign_id): Path<DbId>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<JournalEntry>>> {
    let target = CampaignRepo::find_by_id(&state.pool, campaign_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }))?;

    let is_gm = target.gm_id == user.user_id;
    let is_member =
        is_gm || MemberRepo::exists(&state.pool, campaign_id, user.user_id).await?;
    journal::ensure_participant(is_member)?;

    let type_filter = normalize_optional(query.entry_type.as_deref());
    let visibility = journal::list_visibility_filter(is_gm, query.only_players_visible);

    let entries = JournalRepo::list_by_campaign(
        &state.pool,
        campaign_id,
        type_filter.as_deref(),
        visibility,
    )
    .await?;
    Ok(Json(entries))
}

/// GET /api/v1/journals/{id}
///
/// Campaign entries require participancy, and GM_ONLY entries the GM.
/// Personal entries are readable by their author alone.
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<JournalEntry>> {
    let entry = load_entry(&state, id).await?;

    match entry.campaign_id {
        Some(campaign_id) => {
            let target = CampaignRepo::find_by_id(&state.pool, campaign_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Campaign",
                    id: campaign_id,
                }))?;
            let is_gm = target.gm_id == user.user_id;
            let is_member =
                is_gm || MemberRepo::exists(&state.pool, campaign_id, user.user_id).await?;
            journal::ensure_participant(is_member)?;
            journal::ensure_entry_visible(entry.visibility()?, is_gm)?;
        }
        None => {
            if entry.author_id != user.user_id {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Personal entries are visible to their author only".into(),
                )));
            }
        }
    }

    Ok(Json(entry))
}

/// PATCH /api/v1/journals/{id}
///
/// Campaign entries: GM of the entry's campaign only. Personal entries:
/// the author only.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateJournalEntry>,
) -> AppResult<Json<JournalEntry>> {
    let entry = load_entry(&state, id).await?;
    ensure_may_edit(&state, &entry, user.user_id).await?;

    let entry_type = match input.entry_type.as_deref() {
        Some(raw) => require_non_blank_max(raw, "Entry type", TYPE_MAX_LEN)?,
        None => entry.entry_type.clone(),
    };
    let visibility = match input.visibility {
        Some(v) => v,
        None => entry.visibility()?,
    };
    let title = match input.title.as_deref() {
        Some(raw) => require_non_blank_max(raw, "Title", TITLE_MAX_LEN)?,
        None => entry.title.clone(),
    };
    let content = match input.content.as_deref() {
        Some(raw) => require_non_blank(raw, "Content")?,
        None => entry.content.clone(),
    };
    let tags = match input.tags.as_deref() {
        Some(raw) => normalize_optional(Some(raw)),
        None => entry.tags.clone(),
    };

    let updated = JournalRepo::update(
        &state.pool,
        id,
        &entry_type,
        visibility,
        &title,
        &content,
        tags.as_deref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "JournalEntry",
        id,
    }))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/journals/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let entry = load_entry(&state, id).await?;
    ensure_may_edit(&state, &entry, user.user_id).await?;

    JournalRepo::delete(&state.pool, id).await?;
    tracing::info!(entry_id = id, "Deleted journal entry");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Personal entries
// ---------------------------------------------------------------------------

/// POST /api/v1/journals/personal
///
/// Any authenticated user may keep campaign-less notes.
pub async fn create_personal(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateJournalEntry>,
) -> AppResult<(StatusCode, Json<JournalEntry>)> {
    let (entry_type, visibility, title, content, tags) = validate_entry(&input)?;

    let created = JournalRepo::create(
        &state.pool,
        None,
        user.user_id,
        &entry_type,
        visibility,
        &title,
        &content,
        tags.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/journals/personal -- the caller's own campaign-less entries.
pub async fn list_personal(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<JournalEntry>>> {
    let entries = JournalRepo::list_personal(&state.pool, user.user_id).await?;
    Ok(Json(entries))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_entry(state: &AppState, id: DbId) -> Result<JournalEntry, AppError> {
    JournalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "JournalEntry",
            id,
        }))
}

/// Mutation gate: the campaign GM for campaign entries, the author for
/// personal entries.
async fn ensure_may_edit(
    state: &AppState,
    entry: &JournalEntry,
    user_id: DbId,
) -> Result<(), AppError> {
    match entry.campaign_id {
        Some(campaign_id) => {
            let target = CampaignRepo::find_by_id(&state.pool, campaign_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Campaign",
                    id: campaign_id,
                }))?;
            ensure_gm(target.gm_id, user_id, "edit journal entries")?;
        }
        None => {
            if entry.author_id != user_id {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Personal entries may only be edited by their author".into(),
                )));
            }
        }
    }
    Ok(())
}
