//! Campaign entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ttrpg_core::types::{DbId, Timestamp};

/// A campaign row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub gm_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new campaign. The GM is the authenticated caller,
/// never part of the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaign {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating an existing campaign. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCampaign {
    pub name: Option<String>,
    pub description: Option<String>,
}
