use thiserror::Error;

use lotledger_core::{PartId, RecordId, StockError};
use lotledger_parts::StockTransaction;
use std::sync::Arc;

/// Ledger operation error.
///
/// Appends are conflict-free (entries are immutable and independent), so the
/// only failure mode is the backend itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

impl From<LedgerError> for StockError {
    fn from(value: LedgerError) -> Self {
        match value {
            LedgerError::Unavailable(msg) => StockError::Unavailable(msg),
        }
    }
}

/// Append-only audit log of stock deltas.
///
/// There is deliberately no update or delete operation. The ledger serves two
/// masters: audit (every quantity movement with its before/after observation)
/// and reconciliation (a consuming record's net effect is the sum of entries
/// carrying its `source_record_id`).
pub trait TransactionLedger: Send + Sync {
    /// Append an immutable entry.
    fn record(&self, tx: StockTransaction) -> Result<(), LedgerError>;

    /// Entries caused by one consuming record, in append order.
    fn entries_for_record(&self, record_id: RecordId) -> Result<Vec<StockTransaction>, LedgerError>;

    /// Entries for one part, in append order.
    fn entries_for_part(&self, part_id: PartId) -> Result<Vec<StockTransaction>, LedgerError>;

    /// Every entry, in append order.
    fn all(&self) -> Result<Vec<StockTransaction>, LedgerError>;
}

impl<L> TransactionLedger for Arc<L>
where
    L: TransactionLedger + ?Sized,
{
    fn record(&self, tx: StockTransaction) -> Result<(), LedgerError> {
        (**self).record(tx)
    }

    fn entries_for_record(&self, record_id: RecordId) -> Result<Vec<StockTransaction>, LedgerError> {
        (**self).entries_for_record(record_id)
    }

    fn entries_for_part(&self, part_id: PartId) -> Result<Vec<StockTransaction>, LedgerError> {
        (**self).entries_for_part(part_id)
    }

    fn all(&self) -> Result<Vec<StockTransaction>, LedgerError> {
        (**self).all()
    }
}
