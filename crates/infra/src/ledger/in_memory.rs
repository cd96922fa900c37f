use std::sync::RwLock;

use lotledger_core::{PartId, RecordId};
use lotledger_parts::StockTransaction;

use super::r#trait::{LedgerError, TransactionLedger};

/// In-memory append-only ledger for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: RwLock<Vec<StockTransaction>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionLedger for InMemoryLedger {
    fn record(&self, tx: StockTransaction) -> Result<(), LedgerError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LedgerError::Unavailable("lock poisoned".to_string()))?;
        entries.push(tx);
        Ok(())
    }

    fn entries_for_record(&self, record_id: RecordId) -> Result<Vec<StockTransaction>, LedgerError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LedgerError::Unavailable("lock poisoned".to_string()))?;
        Ok(entries
            .iter()
            .filter(|tx| tx.source_record_id == Some(record_id))
            .cloned()
            .collect())
    }

    fn entries_for_part(&self, part_id: PartId) -> Result<Vec<StockTransaction>, LedgerError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LedgerError::Unavailable("lock poisoned".to_string()))?;
        Ok(entries
            .iter()
            .filter(|tx| tx.part_id == part_id)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<StockTransaction>, LedgerError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LedgerError::Unavailable("lock poisoned".to_string()))?;
        Ok(entries.clone())
    }
}
