//! Compensating allocation over the part inventory.
//!
//! The backend offers single-key writes only, so replacing a record's
//! allocation cannot be one transaction. The engine runs the replacement as
//! compensation phases against the single-part write path:
//!
//! 1. **validate** every requested line against headroom (current quantity
//!    plus whatever this record already holds), rejecting the whole
//!    submission before any write
//! 2. **restore** the previously committed lines (credit stock back)
//! 3. **deduct** the requested lines (take stock)
//!
//! A failure in the middle of a phase leaves stock half-moved. The engine
//! rolls the deduct phase back itself; when a restore cannot be completed or
//! undone it reports exactly which lines were credited so the caller can trim
//! its snapshot and retry the remainder.

use serde_json::Value as JsonValue;

use lotledger_core::{PartId, RecordId, StockError, StockResult};
use lotledger_events::{EventBus, EventEnvelope};
use lotledger_parts::TransactionKind;
use lotledger_records::{Allocation, AllocationSet};

use crate::inventory::PartInventory;
use crate::ledger::{TransactionLedger, net_effect};
use crate::part_store::PartStore;

/// Replaces one record's committed allocation with a requested one,
/// all-or-nothing from the caller's point of view.
#[derive(Debug, Clone)]
pub struct AllocationEngine<S, L, B> {
    inventory: PartInventory<S, L, B>,
}

impl<S, L, B> AllocationEngine<S, L, B>
where
    S: PartStore,
    L: TransactionLedger,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    pub fn new(inventory: PartInventory<S, L, B>) -> Self {
        Self { inventory }
    }

    pub fn inventory(&self) -> &PartInventory<S, L, B> {
        &self.inventory
    }

    /// Replace `previous` (the record's committed snapshot) with `requested`.
    ///
    /// Acceptance is judged against headroom: the quantity on hand plus what
    /// `previous` already holds for that part, since the restore phase gives
    /// that back before the deduct phase takes. An unaffordable line rejects
    /// the entire submission with nothing written.
    ///
    /// Error contract:
    /// - [`StockError::InsufficientStock`]: rejected up front, state intact.
    /// - [`StockError::PartialCompensation`]: some previous lines were
    ///   credited back and could not be re-taken. The named lines are
    ///   released; the caller must trim its snapshot before retrying.
    /// - [`StockError::IncompleteRollback`]: a failed deduct phase could not
    ///   be fully unwound. `held` lines remain taken from stock and must be
    ///   charged to the record's snapshot so a later edit or delete releases
    ///   them; `restored` lines are released as above.
    /// - anything else: state intact (either nothing was written or the
    ///   deduct phase was fully rolled back).
    pub fn commit(
        &self,
        record_id: RecordId,
        previous: &AllocationSet,
        requested: &AllocationSet,
    ) -> StockResult<()> {
        for line in requested.lines() {
            let stored = self.inventory.get_part(line.part_id)?;
            let headroom = stored
                .part
                .quantity
                .checked_add(previous.quantity_of(line.part_id))
                .ok_or_else(|| {
                    StockError::validation(format!(
                        "allocation headroom overflows for part {}",
                        line.part_id
                    ))
                })?;
            if line.quantity > headroom {
                return Err(StockError::InsufficientStock {
                    part_id: line.part_id,
                    available: headroom,
                    requested: line.quantity,
                });
            }
        }

        self.restore_phase(record_id, previous)?;

        let mut deducted: Vec<Allocation> = Vec::new();
        for line in requested.lines() {
            match self.inventory.apply_delta(
                line.part_id,
                -line.quantity,
                TransactionKind::ServiceConsume,
                Some(record_id),
                None,
            ) {
                Ok(_) => deducted.push(line.clone()),
                Err(error) => {
                    tracing::error!(
                        %record_id,
                        part_id = %line.part_id,
                        %error,
                        "deduct phase failed, rolling back"
                    );
                    return match self.roll_back_deduct(record_id, previous, &deducted) {
                        Ok(()) => Err(error),
                        Err(remainder) if remainder.still_held.is_empty() => {
                            Err(StockError::PartialCompensation {
                                restored: remainder.still_credited,
                                expected: previous.len(),
                            })
                        }
                        Err(remainder) => Err(StockError::IncompleteRollback {
                            restored: remainder.still_credited,
                            held: remainder.still_held,
                            expected: previous.len(),
                        }),
                    };
                }
            }
        }

        Ok(())
    }

    /// Credit a record's committed allocation back without taking anything.
    /// Used on record deletion.
    pub fn release(&self, record_id: RecordId, previous: &AllocationSet) -> StockResult<()> {
        self.restore_phase(record_id, previous)
    }

    /// A record's net outstanding effect on each part, summed from the
    /// ledger. Zero net means the record currently holds nothing.
    pub fn reconcile(&self, record_id: RecordId) -> StockResult<Vec<(PartId, i64)>> {
        let entries = self.inventory.ledger().entries_for_record(record_id)?;
        Ok(net_effect(&entries))
    }

    fn restore_phase(&self, record_id: RecordId, previous: &AllocationSet) -> StockResult<()> {
        let mut restored: Vec<PartId> = Vec::new();
        for line in previous.lines() {
            match self.inventory.apply_delta(
                line.part_id,
                line.quantity,
                TransactionKind::ServiceRestore,
                Some(record_id),
                None,
            ) {
                Ok(_) => restored.push(line.part_id),
                Err(error) => {
                    // Nothing credited yet: clean failure, state intact.
                    if restored.is_empty() {
                        return Err(error);
                    }
                    tracing::error!(
                        %record_id,
                        restored = restored.len(),
                        expected = previous.len(),
                        %error,
                        "restore phase stopped partway"
                    );
                    return Err(StockError::PartialCompensation {
                        restored,
                        expected: previous.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Undo a failed deduct phase: give back what was taken, then re-take
    /// what the restore phase credited. Returns the divergence from
    /// `previous` when either direction cannot complete.
    fn roll_back_deduct(
        &self,
        record_id: RecordId,
        previous: &AllocationSet,
        deducted: &[Allocation],
    ) -> Result<(), RollbackRemainder> {
        let mut still_held: Vec<(PartId, i64)> = Vec::new();
        let mut still_credited: Vec<PartId> = Vec::new();

        for line in deducted {
            if let Err(error) = self.inventory.apply_delta(
                line.part_id,
                line.quantity,
                TransactionKind::ServiceRestore,
                Some(record_id),
                None,
            ) {
                tracing::error!(
                    %record_id,
                    part_id = %line.part_id,
                    %error,
                    "rollback could not re-credit a deducted line"
                );
                still_held.push((line.part_id, line.quantity));
            }
        }

        for line in previous.lines() {
            if let Err(error) = self.inventory.apply_delta(
                line.part_id,
                -line.quantity,
                TransactionKind::ServiceConsume,
                Some(record_id),
                None,
            ) {
                tracing::error!(
                    %record_id,
                    part_id = %line.part_id,
                    %error,
                    "rollback could not re-take a restored line"
                );
                still_credited.push(line.part_id);
            }
        }

        if still_held.is_empty() && still_credited.is_empty() {
            Ok(())
        } else {
            Err(RollbackRemainder {
                still_credited,
                still_held,
            })
        }
    }
}

/// Stock still out of place after a rollback that could not finish.
struct RollbackRemainder {
    /// Previous lines credited by the restore phase that could not be
    /// re-taken.
    still_credited: Vec<PartId>,
    /// Requested lines deducted before the failure that could not be
    /// re-credited, with their quantities.
    still_held: Vec<(PartId, i64)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use lotledger_core::PartId;
    use lotledger_events::InMemoryEventBus;
    use lotledger_parts::Part;
    use lotledger_records::Allocation as Line;

    use crate::ledger::InMemoryLedger;
    use crate::part_store::InMemoryPartStore;

    type TestEngine = AllocationEngine<
        Arc<InMemoryPartStore>,
        Arc<InMemoryLedger>,
        Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>,
    >;

    fn engine() -> TestEngine {
        AllocationEngine::new(PartInventory::new(
            Arc::new(InMemoryPartStore::new()),
            Arc::new(InMemoryLedger::new()),
            Arc::new(InMemoryEventBus::new()),
        ))
    }

    fn seed_part(engine: &TestEngine, quantity: i64) -> PartId {
        engine
            .inventory()
            .create_part(
                Part::new(PartId::new(), "Clutch plate", "drive", "C-4", 2_000, quantity, 1)
                    .unwrap(),
            )
            .unwrap()
            .part
            .id
    }

    fn quantity(engine: &TestEngine, part_id: PartId) -> i64 {
        engine.inventory().get_part(part_id).unwrap().part.quantity
    }

    fn set(lines: Vec<Line>) -> AllocationSet {
        AllocationSet::new(lines).unwrap()
    }

    #[test]
    fn first_commit_deducts_requested_lines() {
        let engine = engine();
        let a = seed_part(&engine, 10);
        let record = RecordId::new();

        engine
            .commit(record, &AllocationSet::empty(), &set(vec![Line::new(a, 3, 100)]))
            .unwrap();

        assert_eq!(quantity(&engine, a), 7);
        assert_eq!(engine.reconcile(record).unwrap(), vec![(a, -3)]);
    }

    #[test]
    fn edit_restores_then_deducts() {
        let engine = engine();
        let a = seed_part(&engine, 10);
        let b = seed_part(&engine, 5);
        let record = RecordId::new();

        let first = set(vec![Line::new(a, 3, 100)]);
        engine.commit(record, &AllocationSet::empty(), &first).unwrap();
        assert_eq!(quantity(&engine, a), 7);

        let second = set(vec![Line::new(a, 1, 100), Line::new(b, 2, 200)]);
        engine.commit(record, &first, &second).unwrap();

        assert_eq!(quantity(&engine, a), 9);
        assert_eq!(quantity(&engine, b), 3);
        assert_eq!(engine.reconcile(record).unwrap(), vec![(a, -1), (b, -2)]);
    }

    #[test]
    fn headroom_counts_the_records_own_holding() {
        let engine = engine();
        let a = seed_part(&engine, 10);
        let record = RecordId::new();

        let first = set(vec![Line::new(a, 8, 100)]);
        engine.commit(record, &AllocationSet::empty(), &first).unwrap();
        assert_eq!(quantity(&engine, a), 2);

        // Only 2 on hand, but the record holds 8, so 10 is affordable.
        let second = set(vec![Line::new(a, 10, 100)]);
        engine.commit(record, &first, &second).unwrap();
        assert_eq!(quantity(&engine, a), 0);
    }

    #[test]
    fn unaffordable_line_rejects_the_whole_submission() {
        let engine = engine();
        let a = seed_part(&engine, 9);
        let b = seed_part(&engine, 5);
        let record = RecordId::new();

        let requested = set(vec![Line::new(b, 2, 200), Line::new(a, 999, 100)]);
        let err = engine
            .commit(record, &AllocationSet::empty(), &requested)
            .unwrap_err();

        match err {
            StockError::InsufficientStock {
                part_id,
                available,
                requested,
            } => {
                assert_eq!(part_id, a);
                assert_eq!(available, 9);
                assert_eq!(requested, 999);
            }
            e => panic!("expected InsufficientStock, got {e:?}"),
        }

        // Nothing moved, nothing recorded.
        assert_eq!(quantity(&engine, a), 9);
        assert_eq!(quantity(&engine, b), 5);
        assert!(engine.reconcile(record).unwrap().is_empty());
    }

    #[test]
    fn saturated_headroom_is_rejected_not_overflowed() {
        let engine = engine();
        let a = seed_part(&engine, i64::MAX);
        let record = RecordId::new();

        // A snapshot claiming the record holds stock on top of a saturated
        // quantity must reject cleanly instead of wrapping.
        let previous = set(vec![Line::new(a, 5, 100)]);
        let err = engine
            .commit(record, &previous, &set(vec![Line::new(a, 1, 100)]))
            .unwrap_err();
        assert!(matches!(err, StockError::Validation(_)));
        assert_eq!(quantity(&engine, a), i64::MAX);
        assert!(engine.reconcile(record).unwrap().is_empty());
    }

    #[test]
    fn release_credits_everything_back() {
        let engine = engine();
        let a = seed_part(&engine, 10);
        let b = seed_part(&engine, 5);
        let record = RecordId::new();

        let held = set(vec![Line::new(a, 4, 100), Line::new(b, 2, 200)]);
        engine.commit(record, &AllocationSet::empty(), &held).unwrap();

        engine.release(record, &held).unwrap();
        assert_eq!(quantity(&engine, a), 10);
        assert_eq!(quantity(&engine, b), 5);
        assert_eq!(engine.reconcile(record).unwrap(), vec![(a, 0), (b, 0)]);
    }

    #[test]
    fn empty_to_empty_commit_is_a_no_op() {
        let engine = engine();
        let record = RecordId::new();
        engine
            .commit(record, &AllocationSet::empty(), &AllocationSet::empty())
            .unwrap();
        assert!(engine.reconcile(record).unwrap().is_empty());
    }
}
