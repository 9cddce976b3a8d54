//! Campaign membership model.

use serde::Serialize;
use sqlx::FromRow;
use ttrpg_core::roles::CampaignRole;
use ttrpg_core::types::{DbId, Timestamp};

/// A row from the `campaign_members` table. The role is stored as TEXT and
/// parsed at the edge; see [`CampaignMember::role`].
#[derive(Debug, Clone, FromRow)]
pub struct CampaignMember {
    pub campaign_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub joined_at: Timestamp,
}

impl CampaignMember {
    pub fn role(&self) -> Result<CampaignRole, ttrpg_core::error::CoreError> {
        CampaignRole::parse(&self.role)
    }
}

/// Membership joined with the member's public user fields, as returned by
/// the member-listing endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberWithUser {
    pub user_id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub joined_at: Timestamp,
}

/// Result of an idempotent membership PUT.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertMemberResult {
    pub member: MemberWithUser,
    pub created: bool,
}
