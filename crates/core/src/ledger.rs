//! Inventory ledger transitions.
//!
//! Per `(character_id, item_id)` pair the ledger is a tiny state machine:
//! absent -> present(qty >= 1) -> absent. No row may persist with quantity
//! zero; reaching zero deletes the row. The functions here compute the
//! transition from a loaded (and, in the api layer, row-locked) quantity;
//! the caller persists the returned [`LedgerChange`] in the same
//! transaction.
//!
//! Granting items is a world-authoring action (GM privilege); spending them
//! is a player action on their own character. The signed-delta entry point
//! exists for the legacy combined operation and routes to the same two
//! predicates instead of inferring intent.

use crate::error::{CoreError, CoreResult};
use crate::types::DbId;

/// Write to apply to the ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerChange {
    /// Create the row or overwrite its quantity (always >= 1).
    Upsert(i64),
    /// Delete the row.
    Delete,
}

/// How a signed legacy delta maps onto the split operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaKind {
    /// Positive delta: behaves like `give`, requires the GM.
    Give(i64),
    /// Negative delta: behaves like `consume` of the magnitude, requires the owner.
    Consume(i64),
}

fn require_positive(quantity: i64) -> CoreResult<()> {
    if quantity < 1 {
        return Err(CoreError::Validation(
            "Quantity must be at least 1".into(),
        ));
    }
    Ok(())
}

/// GM grants `quantity` of an item. Creates the row or adds to it;
/// repeated grants saturate rather than wrap.
pub fn give(existing: Option<i64>, quantity: i64) -> CoreResult<LedgerChange> {
    require_positive(quantity)?;
    let new_qty = match existing {
        None => quantity,
        Some(current) => current.saturating_add(quantity),
    };
    Ok(LedgerChange::Upsert(new_qty))
}

/// Owner spends `quantity` of an item they hold.
///
/// Fails `NotFound` when the row is absent and `Validation` when spending
/// more than is held; exactly reaching zero deletes the row.
pub fn consume(existing: Option<i64>, quantity: i64, item_id: DbId) -> CoreResult<LedgerChange> {
    require_positive(quantity)?;
    let current = existing.ok_or(CoreError::NotFound {
        entity: "InventoryEntry",
        id: item_id,
    })?;

    let new_qty = current - quantity;
    if new_qty < 0 {
        return Err(CoreError::Validation(
            "Cannot consume more than the character holds".into(),
        ));
    }
    if new_qty == 0 {
        Ok(LedgerChange::Delete)
    } else {
        Ok(LedgerChange::Upsert(new_qty))
    }
}

/// GM sets the absolute quantity. Zero deletes the row (a no-op when it is
/// already absent, keeping the operation idempotent).
pub fn set(existing: Option<i64>, quantity: i64) -> CoreResult<Option<LedgerChange>> {
    if quantity < 0 {
        return Err(CoreError::Validation(
            "Quantity must not be negative".into(),
        ));
    }
    if quantity == 0 {
        return Ok(existing.map(|_| LedgerChange::Delete));
    }
    Ok(Some(LedgerChange::Upsert(quantity)))
}

/// Explicit removal regardless of quantity. Fails `NotFound` when absent.
pub fn remove(existing: Option<i64>, item_id: DbId) -> CoreResult<LedgerChange> {
    existing.ok_or(CoreError::NotFound {
        entity: "InventoryEntry",
        id: item_id,
    })?;
    Ok(LedgerChange::Delete)
}

/// Classify a legacy signed delta. Zero is rejected.
pub fn classify_delta(delta: i64) -> CoreResult<DeltaKind> {
    match delta {
        0 => Err(CoreError::Validation("Delta must not be zero".into())),
        d if d > 0 => Ok(DeltaKind::Give(d)),
        d => Ok(DeltaKind::Consume(-d)),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::CoreError;

    const ITEM: DbId = 7;

    #[test]
    fn test_give_creates_row() {
        assert_eq!(give(None, 3).unwrap(), LedgerChange::Upsert(3));
    }

    #[test]
    fn test_give_accumulates() {
        assert_eq!(give(Some(3), 2).unwrap(), LedgerChange::Upsert(5));
    }

    #[test]
    fn test_give_saturates() {
        assert_eq!(give(Some(i64::MAX), 1).unwrap(), LedgerChange::Upsert(i64::MAX));
    }

    #[test]
    fn test_give_rejects_non_positive() {
        assert_matches!(give(None, 0), Err(CoreError::Validation(_)));
        assert_matches!(give(Some(3), -1), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_consume_decrements() {
        assert_eq!(consume(Some(3), 2, ITEM).unwrap(), LedgerChange::Upsert(1));
    }

    #[test]
    fn test_consume_to_zero_deletes() {
        assert_eq!(consume(Some(2), 2, ITEM).unwrap(), LedgerChange::Delete);
    }

    #[test]
    fn test_consume_absent_is_not_found() {
        assert_matches!(consume(None, 1, ITEM), Err(CoreError::NotFound { .. }));
    }

    #[test]
    fn test_overconsume_rejected() {
        assert_matches!(consume(Some(1), 5, ITEM), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_consume_then_give_round_trips() {
        // consume then give of the same amount restores the original quantity
        let after_consume = match consume(Some(5), 2, ITEM).unwrap() {
            LedgerChange::Upsert(q) => Some(q),
            LedgerChange::Delete => None,
        };
        assert_eq!(give(after_consume, 2).unwrap(), LedgerChange::Upsert(5));
    }

    #[test]
    fn test_set_overwrites() {
        assert_eq!(set(Some(3), 10).unwrap(), Some(LedgerChange::Upsert(10)));
        assert_eq!(set(None, 4).unwrap(), Some(LedgerChange::Upsert(4)));
    }

    #[test]
    fn test_set_zero_deletes_or_noops() {
        assert_eq!(set(Some(3), 0).unwrap(), Some(LedgerChange::Delete));
        assert_eq!(set(None, 0).unwrap(), None);
    }

    #[test]
    fn test_set_negative_rejected() {
        assert_matches!(set(Some(3), -1), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_remove_requires_presence() {
        assert_eq!(remove(Some(1), ITEM).unwrap(), LedgerChange::Delete);
        assert_matches!(remove(None, ITEM), Err(CoreError::NotFound { .. }));
    }

    #[test]
    fn test_delta_classification() {
        assert_eq!(classify_delta(4).unwrap(), DeltaKind::Give(4));
        assert_eq!(classify_delta(-4).unwrap(), DeltaKind::Consume(4));
        assert_matches!(classify_delta(0), Err(CoreError::Validation(_)));
    }
}
