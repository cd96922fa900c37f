//! Part inventory service: the single write path for part quantities.
//!
//! Every quantity change flows through [`PartInventory::apply_delta`], which
//! turns the store's get/conditional-put pair into an atomic read-modify-write
//! with bounded retry. The committed delta is appended to the ledger and then
//! announced on the bus.

use chrono::Utc;
use serde_json::Value as JsonValue;

use lotledger_core::{ExpectedVersion, PartId, RecordId, StockError, StockResult, TransactionId};
use lotledger_events::{EventBus, EventEnvelope};
use lotledger_parts::{Part, PartCreated, PartEvent, StockAdjusted, StockTransaction, TransactionKind};

use crate::MAX_CAS_RETRIES;
use crate::ledger::TransactionLedger;
use crate::notify::publish_event;
use crate::part_store::{PartStore, StoredPart};

/// Part CRUD plus the versioned stock-adjustment write path.
#[derive(Debug, Clone)]
pub struct PartInventory<S, L, B> {
    store: S,
    ledger: L,
    bus: B,
}

impl<S, L, B> PartInventory<S, L, B>
where
    S: PartStore,
    L: TransactionLedger,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    pub fn new(store: S, ledger: L, bus: B) -> Self {
        Self { store, ledger, bus }
    }

    /// Create a part. Initial quantity is taken as-is and produces no ledger
    /// entry; the ledger reconciles against it as the starting observation.
    pub fn create_part(&self, part: Part) -> StockResult<StoredPart> {
        let stored = self.store.insert(part)?;
        let event = PartEvent::PartCreated(PartCreated {
            part_id: stored.part.id,
            name: stored.part.name.clone(),
            quantity: stored.part.quantity,
            occurred_at: Utc::now(),
        });
        publish_event(
            &self.bus,
            *stored.part.id.as_uuid(),
            stored.version,
            &event,
        );
        Ok(stored)
    }

    pub fn get_part(&self, part_id: PartId) -> StockResult<StoredPart> {
        Ok(self.store.get(part_id)?)
    }

    pub fn list_parts(&self) -> StockResult<Vec<StoredPart>> {
        Ok(self.store.list()?)
    }

    /// Apply one signed stock delta to one part.
    ///
    /// Optimistic loop: read the part with its version, compute the next
    /// state, commit it with a version-conditioned put. A lost write means
    /// another clerk moved the quantity between our read and write; the loop
    /// re-reads and revalidates against fresh state, up to a bounded number
    /// of attempts. Domain rejections (insufficient stock) abort immediately,
    /// retrying cannot make an overdraw valid against the same state.
    pub fn apply_delta(
        &self,
        part_id: PartId,
        delta: i64,
        kind: TransactionKind,
        source_record_id: Option<RecordId>,
        notes: Option<String>,
    ) -> StockResult<StockTransaction> {
        if delta == 0 {
            return Err(StockError::validation("stock delta cannot be zero"));
        }

        for attempt in 0..MAX_CAS_RETRIES {
            let current = self.store.get(part_id)?;
            let next = current.part.with_delta(delta)?;

            match self
                .store
                .put(next, ExpectedVersion::Exact(current.version))
            {
                Ok(stored) => {
                    let tx = StockTransaction {
                        id: TransactionId::new(),
                        part_id,
                        delta,
                        quantity_before: current.part.quantity,
                        quantity_after: stored.part.quantity,
                        kind,
                        occurred_at: Utc::now(),
                        source_record_id,
                        notes,
                    };
                    self.ledger.record(tx.clone())?;
                    let event = PartEvent::StockAdjusted(StockAdjusted {
                        part_id,
                        delta,
                        quantity: stored.part.quantity,
                        kind,
                        source_record_id,
                        occurred_at: tx.occurred_at,
                    });
                    publish_event(&self.bus, *part_id.as_uuid(), stored.version, &event);
                    return Ok(tx);
                }
                Err(crate::part_store::PartStoreError::VersionConflict { .. }) => {
                    tracing::debug!(%part_id, delta, attempt, "stock write lost, retrying");
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(StockError::ConcurrentModification { part_id })
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use lotledger_events::InMemoryEventBus;

    use crate::ledger::InMemoryLedger;
    use crate::part_store::InMemoryPartStore;

    fn inventory() -> PartInventory<
        Arc<InMemoryPartStore>,
        Arc<InMemoryLedger>,
        Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>,
    > {
        PartInventory::new(
            Arc::new(InMemoryPartStore::new()),
            Arc::new(InMemoryLedger::new()),
            Arc::new(InMemoryEventBus::new()),
        )
    }

    fn part(quantity: i64) -> Part {
        Part::new(PartId::new(), "Brake pad", "brakes", "A-12", 4_500, quantity, 2).unwrap()
    }

    #[test]
    fn create_part_produces_no_ledger_entry() {
        let inventory = inventory();
        let stored = inventory.create_part(part(10)).unwrap();

        assert_eq!(stored.version, 1);
        assert!(inventory.ledger().all().unwrap().is_empty());
    }

    #[test]
    fn apply_delta_commits_and_records() {
        let inventory = inventory();
        let stored = inventory.create_part(part(10)).unwrap();
        let id = stored.part.id;

        let tx = inventory
            .apply_delta(id, -3, TransactionKind::Sale, None, None)
            .unwrap();

        assert_eq!(tx.quantity_before, 10);
        assert_eq!(tx.quantity_after, 7);
        assert!(tx.is_consistent());
        assert_eq!(inventory.get_part(id).unwrap().part.quantity, 7);
        assert_eq!(inventory.ledger().entries_for_part(id).unwrap().len(), 1);
    }

    #[test]
    fn apply_delta_rejects_zero() {
        let inventory = inventory();
        let stored = inventory.create_part(part(10)).unwrap();

        let err = inventory
            .apply_delta(stored.part.id, 0, TransactionKind::ManualAdjust, None, None)
            .unwrap_err();
        assert!(matches!(err, StockError::Validation(_)));
    }

    #[test]
    fn overdraw_leaves_no_trace() {
        let inventory = inventory();
        let stored = inventory.create_part(part(5)).unwrap();
        let id = stored.part.id;

        let err = inventory
            .apply_delta(id, -6, TransactionKind::ServiceConsume, None, None)
            .unwrap_err();
        assert!(matches!(err, StockError::InsufficientStock { .. }));
        assert_eq!(inventory.get_part(id).unwrap().part.quantity, 5);
        assert!(inventory.ledger().all().unwrap().is_empty());
    }

    #[test]
    fn adjustment_is_announced_on_the_bus() {
        let bus = Arc::new(InMemoryEventBus::new());
        let inventory = PartInventory::new(
            Arc::new(InMemoryPartStore::new()),
            Arc::new(InMemoryLedger::new()),
            Arc::clone(&bus),
        );
        let stored = inventory.create_part(part(10)).unwrap();
        let subscription = bus.subscribe();

        inventory
            .apply_delta(stored.part.id, 4, TransactionKind::Purchase, None, None)
            .unwrap();

        let envelope = subscription.try_recv().unwrap();
        assert_eq!(envelope.subject_type(), "parts.part.stock_adjusted");
        assert_eq!(envelope.subject_id(), *stored.part.id.as_uuid());
        assert_eq!(envelope.sequence_number(), 2);
        assert_eq!(envelope.payload()["StockAdjusted"]["quantity"], 14);
    }

    #[test]
    fn contended_deltas_all_land() {
        let store = Arc::new(InMemoryPartStore::new());
        let inventory = PartInventory::new(
            Arc::clone(&store),
            Arc::new(InMemoryLedger::new()),
            Arc::new(InMemoryEventBus::new()),
        );
        let stored = inventory.create_part(part(100)).unwrap();
        let id = stored.part.id;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let inventory = inventory.clone();
                std::thread::spawn(move || {
                    inventory.apply_delta(id, -5, TransactionKind::Sale, None, None)
                })
            })
            .collect();

        let mut committed = 0;
        for handle in handles {
            if handle.join().unwrap().is_ok() {
                committed += 1;
            }
        }

        // Heavy interleaving may exhaust retries for some writers, but every
        // committed delta must be reflected exactly once.
        let quantity = inventory.get_part(id).unwrap().part.quantity;
        assert_eq!(quantity, 100 - committed * 5);
        assert_eq!(
            inventory.ledger().entries_for_part(id).unwrap().len(),
            committed as usize
        );
    }
}
