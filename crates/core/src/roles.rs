//! Closed role enums for global accounts and per-campaign membership.
//!
//! The string forms must match the CHECK constraints in the `user_roles`
//! and `campaign_members` migrations. Both enums are deliberately closed:
//! adding a variant forces every authorization predicate to be revisited.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Account-level role, granted independently of any campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GlobalRole {
    Player,
    GameMaster,
    Admin,
}

impl GlobalRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalRole::Player => "PLAYER",
            GlobalRole::GameMaster => "GAME_MASTER",
            GlobalRole::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "PLAYER" => Ok(GlobalRole::Player),
            "GAME_MASTER" => Ok(GlobalRole::GameMaster),
            "ADMIN" => Ok(GlobalRole::Admin),
            other => Err(CoreError::Internal(format!("Unknown global role: {other}"))),
        }
    }
}

/// Role a user holds inside one campaign.
///
/// Exactly one member per campaign holds [`CampaignRole::Gm`], and that
/// member is always the campaign's owning GM (see `membership`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignRole {
    Gm,
    Player,
}

impl CampaignRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignRole::Gm => "GM",
            CampaignRole::Player => "PLAYER",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "GM" => Ok(CampaignRole::Gm),
            "PLAYER" => Ok(CampaignRole::Player),
            other => Err(CoreError::Internal(format!(
                "Unknown campaign role: {other}"
            ))),
        }
    }
}
