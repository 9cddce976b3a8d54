//! Character entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ttrpg_core::character::Attributes;
use ttrpg_core::types::{DbId, Timestamp};

/// A character row from the `characters` table. Attribute scores live in
/// six flat columns; use [`Character::attributes`] for the domain view.
#[derive(Debug, Clone, FromRow)]
pub struct Character {
    pub id: DbId,
    pub campaign_id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub class: String,
    pub race: String,
    pub level: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub attr_str: i32,
    pub attr_dex: i32,
    pub attr_con: i32,
    pub attr_int: i32,
    pub attr_wis: i32,
    pub attr_cha: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Character {
    pub fn attributes(&self) -> Attributes {
        Attributes {
            strength: self.attr_str,
            dexterity: self.attr_dex,
            constitution: self.attr_con,
            intelligence: self.attr_int,
            wisdom: self.attr_wis,
            charisma: self.attr_cha,
        }
    }
}

/// Character representation for API responses, with the attribute block
/// nested instead of flattened.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterResponse {
    pub id: DbId,
    pub campaign_id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub class: String,
    pub race: String,
    pub level: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub attributes: Attributes,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Character> for CharacterResponse {
    fn from(c: Character) -> Self {
        let attributes = c.attributes();
        Self {
            id: c.id,
            campaign_id: c.campaign_id,
            owner_id: c.owner_id,
            name: c.name,
            class: c.class,
            race: c.race,
            level: c.level,
            hp: c.hp,
            max_hp: c.max_hp,
            attributes,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Fully validated values for inserting a character; produced by the api
/// layer from a `ttrpg_core::character::CharacterDraft`.
#[derive(Debug, Clone)]
pub struct NewCharacter {
    pub campaign_id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub class: String,
    pub race: String,
    pub level: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub attributes: Attributes,
}

/// Fully merged values for updating a character. The handler loads the row,
/// merges the patch, re-validates, and writes every column back, so the
/// attribute set is always replaced as a whole.
#[derive(Debug, Clone)]
pub struct CharacterValues {
    pub name: String,
    pub class: String,
    pub race: String,
    pub level: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub attributes: Attributes,
}
