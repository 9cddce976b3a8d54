//! Campaign membership rules: idempotent upsert, the single-GM invariant,
//! and owner-removal protection.
//!
//! The upsert decision is pure so the api layer can run it between a locked
//! read and the write inside one transaction.

use crate::error::{CoreError, CoreResult};
use crate::roles::CampaignRole;
use crate::types::DbId;

/// What a PUT on `(campaign_id, user_id)` should do to the membership row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    /// No row exists; insert with the given role. Reported as `created = true`.
    Insert(CampaignRole),
    /// A row exists with a different role; update it. `created = false`.
    Update(CampaignRole),
    /// A row exists with the same role; write nothing. `created = false`.
    Noop,
}

impl UpsertAction {
    pub fn created(&self) -> bool {
        matches!(self, UpsertAction::Insert(_))
    }
}

/// The GM role may only ever be held by the campaign's owning GM.
pub fn ensure_single_gm(role: CampaignRole, user_id: DbId, gm_id: DbId) -> CoreResult<()> {
    if role == CampaignRole::Gm && user_id != gm_id {
        return Err(CoreError::Forbidden(
            "Cannot assign a second GM; transfer GM ownership instead".into(),
        ));
    }
    Ok(())
}

/// Decide the idempotent PUT outcome for a membership row.
///
/// `requested` is the caller-supplied role; `None` defaults to PLAYER.
pub fn resolve_upsert(
    existing: Option<CampaignRole>,
    requested: Option<CampaignRole>,
    user_id: DbId,
    gm_id: DbId,
) -> CoreResult<UpsertAction> {
    let target = requested.unwrap_or(CampaignRole::Player);
    ensure_single_gm(target, user_id, gm_id)?;

    Ok(match existing {
        None => UpsertAction::Insert(target),
        Some(current) if current != target => UpsertAction::Update(target),
        Some(_) => UpsertAction::Noop,
    })
}

/// The owning GM can never be removed from their own campaign.
pub fn ensure_removable(user_id: DbId, gm_id: DbId) -> CoreResult<()> {
    if user_id == gm_id {
        return Err(CoreError::Forbidden(
            "Cannot remove the GM from their own campaign".into(),
        ));
    }
    Ok(())
}
