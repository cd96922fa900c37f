//! Record manager: ties consuming records to the allocation engine.
//!
//! The manager owns the ordering contract between the record store and stock:
//! stock moves first, the record body is persisted only after the engine
//! accepted the new allocation. A rejected submission leaves both the record
//! and stock exactly as they were.

use serde_json::Value as JsonValue;

use lotledger_core::{RecordId, StockError, StockResult};
use lotledger_events::{EventBus, EventEnvelope};
use lotledger_records::{Allocation, AllocationSet, ConsumingRecord, RecordDetails, RecordStatus};

use crate::engine::AllocationEngine;
use crate::ledger::TransactionLedger;
use crate::part_store::PartStore;
use crate::record_store::RecordStore;

/// One create-or-edit request: the record body plus the full allocation the
/// record should hold afterwards (not a diff).
#[derive(Debug, Clone)]
pub struct RecordSubmission {
    pub id: RecordId,
    pub details: RecordDetails,
    pub allocation: AllocationSet,
}

/// CRUD over consuming records with compensating stock allocation.
#[derive(Debug, Clone)]
pub struct RecordManager<S, L, B, R> {
    engine: AllocationEngine<S, L, B>,
    records: R,
}

impl<S, L, B, R> RecordManager<S, L, B, R>
where
    S: PartStore,
    L: TransactionLedger,
    B: EventBus<EventEnvelope<JsonValue>>,
    R: RecordStore,
{
    pub fn new(engine: AllocationEngine<S, L, B>, records: R) -> Self {
        Self { engine, records }
    }

    pub fn engine(&self) -> &AllocationEngine<S, L, B> {
        &self.engine
    }

    /// Create or edit a record.
    ///
    /// The engine replaces the record's committed snapshot with the submitted
    /// allocation; on success the record is persisted with the new snapshot.
    /// On [`StockError::PartialCompensation`] the snapshot is trimmed to the
    /// lines still held, persisted, and the error surfaced so the caller can
    /// retry the same submission. On [`StockError::IncompleteRollback`] the
    /// lines an interrupted rollback left deducted are additionally charged
    /// to the snapshot, so no taken stock goes unaccounted. Any other error
    /// leaves the record untouched.
    pub fn submit(&self, submission: RecordSubmission) -> StockResult<ConsumingRecord> {
        let existing = self.records.get(submission.id)?;
        let previous = existing
            .as_ref()
            .map(|r| r.committed().clone())
            .unwrap_or_else(AllocationSet::empty);

        match self
            .engine
            .commit(submission.id, &previous, &submission.allocation)
        {
            Ok(()) => {
                let mut record = match existing {
                    Some(mut record) => {
                        record.set_details(submission.details);
                        record
                    }
                    None => ConsumingRecord::new(submission.id, submission.details),
                };
                record.commit_allocation(submission.allocation);
                self.records.put(record.clone())?;
                Ok(record)
            }
            Err(StockError::PartialCompensation { restored, expected }) => {
                if let Some(mut record) = existing {
                    record.trim_committed(&restored);
                    self.records.put(record)?;
                }
                Err(StockError::PartialCompensation { restored, expected })
            }
            Err(StockError::IncompleteRollback {
                restored,
                held,
                expected,
            }) => {
                // The held lines were taken from stock and nothing else
                // remembers them; charge them to the record (creating it if
                // this was a first submission) so a later edit or delete
                // releases them.
                let held_lines: Vec<Allocation> = held
                    .iter()
                    .filter_map(|&(part_id, quantity)| {
                        submission
                            .allocation
                            .lines()
                            .iter()
                            .find(|l| l.part_id == part_id)
                            .map(|l| Allocation::new(part_id, quantity, l.unit_price))
                    })
                    .collect();
                let mut record = existing
                    .unwrap_or_else(|| ConsumingRecord::new(submission.id, submission.details));
                record.trim_committed(&restored);
                let charged = record.committed().merged_with(&held_lines);
                record.commit_allocation(charged);
                self.records.put(record)?;
                Err(StockError::IncompleteRollback {
                    restored,
                    held,
                    expected,
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Delete a record, crediting its committed allocation back first.
    ///
    /// On [`StockError::PartialCompensation`] the record survives with its
    /// snapshot trimmed to the unrestored remainder; retrying the delete
    /// releases exactly that remainder.
    pub fn delete(&self, record_id: RecordId) -> StockResult<()> {
        let record = self
            .records
            .get(record_id)?
            .ok_or_else(|| StockError::not_found(format!("record {record_id}")))?;

        match self.engine.release(record_id, record.committed()) {
            Ok(()) => {
                self.records.remove(record_id)?;
                Ok(())
            }
            Err(StockError::PartialCompensation { restored, expected }) => {
                let mut record = record;
                record.trim_committed(&restored);
                self.records.put(record)?;
                Err(StockError::PartialCompensation { restored, expected })
            }
            Err(other) => Err(other),
        }
    }

    pub fn get(&self, record_id: RecordId) -> StockResult<ConsumingRecord> {
        self.records
            .get(record_id)?
            .ok_or_else(|| StockError::not_found(format!("record {record_id}")))
    }

    pub fn list(&self) -> StockResult<Vec<ConsumingRecord>> {
        Ok(self.records.list()?)
    }

    /// Change the lifecycle status. Carries no stock impact; completing or
    /// cancelling a record does not release its allocation, only deletion or
    /// an edit does.
    pub fn set_status(&self, record_id: RecordId, status: RecordStatus) -> StockResult<ConsumingRecord> {
        let mut record = self.get(record_id)?;
        record.set_status(status);
        self.records.put(record.clone())?;
        Ok(record)
    }
}
