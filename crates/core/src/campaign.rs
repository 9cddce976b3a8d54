//! Campaign lifecycle rules.
//!
//! A campaign is owned by exactly one GM; every mutation of the campaign or
//! of anything scoped under it starts from [`ensure_gm`].

use crate::error::{CoreError, CoreResult};
use crate::types::DbId;

/// Normalize a campaign name. A blank trimmed name is a `Conflict`, matching
/// the create/update contract (the name participates in a uniqueness
/// invariant rather than plain input validation).
pub fn normalize_name(raw: &str) -> CoreResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Conflict(
            "Campaign name must not be blank".into(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Reject any caller other than the campaign's owning GM.
pub fn ensure_gm(gm_id: DbId, requester_id: DbId, action: &str) -> CoreResult<()> {
    if requester_id != gm_id {
        return Err(CoreError::Forbidden(format!(
            "Only the campaign GM may {action}"
        )));
    }
    Ok(())
}

/// Campaign deletion is blocked while any character sheet lives in it.
pub fn ensure_deletable(has_characters: bool) -> CoreResult<()> {
    if has_characters {
        return Err(CoreError::Conflict(
            "Cannot delete a campaign that still has characters".into(),
        ));
    }
    Ok(())
}
