//! Journal entry model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ttrpg_core::journal::Visibility;
use ttrpg_core::types::{DbId, Timestamp};

/// A journal entry row. `campaign_id` is NULL for personal entries.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JournalEntry {
    pub id: DbId,
    pub campaign_id: Option<DbId>,
    pub author_id: DbId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub entry_type: String,
    pub visibility: String,
    pub title: String,
    pub content: String,
    pub tags: Option<String>,
    pub created_at: Timestamp,
}

impl JournalEntry {
    pub fn visibility(&self) -> Result<Visibility, ttrpg_core::error::CoreError> {
        Visibility::parse(&self.visibility)
    }
}

/// DTO for creating a journal entry (campaign-scoped or personal).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJournalEntry {
    #[serde(rename = "type")]
    pub entry_type: String,
    pub visibility: Option<Visibility>,
    pub title: String,
    pub content: String,
    pub tags: Option<String>,
}

/// DTO for updating a journal entry. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateJournalEntry {
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    pub visibility: Option<Visibility>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
}
