//! Journal entry visibility rules.
//!
//! Campaign-scoped entries are authored by the GM and carry a visibility
//! flag; personal entries have no campaign and belong to their author alone.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const TYPE_MAX_LEN: usize = 50;
pub const TITLE_MAX_LEN: usize = 150;

/// Who inside the campaign may read an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    GmOnly,
    Players,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::GmOnly => "GM_ONLY",
            Visibility::Players => "PLAYERS",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "GM_ONLY" => Ok(Visibility::GmOnly),
            "PLAYERS" => Ok(Visibility::Players),
            other => Err(CoreError::Internal(format!(
                "Unknown journal visibility: {other}"
            ))),
        }
    }
}

/// Non-GM participants may only read PLAYERS entries.
pub fn ensure_entry_visible(visibility: Visibility, requester_is_gm: bool) -> CoreResult<()> {
    if !requester_is_gm && visibility != Visibility::Players {
        return Err(CoreError::Forbidden(
            "Entry is visible to the GM only".into(),
        ));
    }
    Ok(())
}

/// Visibility filter to apply when listing a campaign's journal.
///
/// The GM sees everything unless they explicitly asked for the players'
/// view; everyone else is always restricted to PLAYERS entries.
pub fn list_visibility_filter(
    requester_is_gm: bool,
    only_players_visible: bool,
) -> Option<Visibility> {
    if requester_is_gm && !only_players_visible {
        None
    } else {
        Some(Visibility::Players)
    }
}

/// Campaign participation gate shared by every journal read.
pub fn ensure_participant(is_participant: bool) -> CoreResult<()> {
    if !is_participant {
        return Err(CoreError::Forbidden(
            "Only campaign participants may access the journal".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_visibility_round_trip() {
        for v in [Visibility::GmOnly, Visibility::Players] {
            assert_eq!(Visibility::parse(v.as_str()).unwrap(), v);
        }
        assert!(Visibility::parse("EVERYONE").is_err());
    }

    #[test]
    fn test_gm_reads_everything() {
        assert!(ensure_entry_visible(Visibility::GmOnly, true).is_ok());
        assert!(ensure_entry_visible(Visibility::Players, true).is_ok());
    }

    #[test]
    fn test_player_blocked_from_gm_only() {
        assert_matches!(
            ensure_entry_visible(Visibility::GmOnly, false),
            Err(CoreError::Forbidden(_))
        );
        assert!(ensure_entry_visible(Visibility::Players, false).is_ok());
    }

    #[test]
    fn test_list_filter_matrix() {
        assert_eq!(list_visibility_filter(true, false), None);
        assert_eq!(list_visibility_filter(true, true), Some(Visibility::Players));
        assert_eq!(list_visibility_filter(false, false), Some(Visibility::Players));
        assert_eq!(list_visibility_filter(false, true), Some(Visibility::Players));
    }

    #[test]
    fn test_non_participant_rejected() {
        assert_matches!(ensure_participant(false), Err(CoreError::Forbidden(_)));
        assert!(ensure_participant(true).is_ok());
    }
}
