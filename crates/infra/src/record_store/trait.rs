use thiserror::Error;

use lotledger_core::{RecordId, StockError};
use lotledger_records::ConsumingRecord;
use std::sync::Arc;

/// Record store operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordStoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

impl From<RecordStoreError> for StockError {
    fn from(value: RecordStoreError) -> Self {
        match value {
            RecordStoreError::Unavailable(msg) => StockError::Unavailable(msg),
        }
    }
}

/// Storage for consuming records (`serviceOrders/{id}` key space).
///
/// Records are contended per record id at most (one back-office clerk edits
/// one order at a time); the contended resource of the system is part
/// quantity, not the record body, so writes here are unconditional upserts.
pub trait RecordStore: Send + Sync {
    fn get(&self, record_id: RecordId) -> Result<Option<ConsumingRecord>, RecordStoreError>;

    fn put(&self, record: ConsumingRecord) -> Result<(), RecordStoreError>;

    /// Remove a record; returns whether it existed.
    fn remove(&self, record_id: RecordId) -> Result<bool, RecordStoreError>;

    fn list(&self) -> Result<Vec<ConsumingRecord>, RecordStoreError>;
}

impl<R> RecordStore for Arc<R>
where
    R: RecordStore + ?Sized,
{
    fn get(&self, record_id: RecordId) -> Result<Option<ConsumingRecord>, RecordStoreError> {
        (**self).get(record_id)
    }

    fn put(&self, record: ConsumingRecord) -> Result<(), RecordStoreError> {
        (**self).put(record)
    }

    fn remove(&self, record_id: RecordId) -> Result<bool, RecordStoreError> {
        (**self).remove(record_id)
    }

    fn list(&self) -> Result<Vec<ConsumingRecord>, RecordStoreError> {
        (**self).list()
    }
}
