use std::collections::HashMap;
use std::sync::RwLock;

use lotledger_core::{Entity, RecordId};
use lotledger_records::ConsumingRecord;

use super::r#trait::{RecordStore, RecordStoreError};

/// In-memory record store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<RecordId, ConsumingRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, record_id: RecordId) -> Result<Option<ConsumingRecord>, RecordStoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| RecordStoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(records.get(&record_id).cloned())
    }

    fn put(&self, record: ConsumingRecord) -> Result<(), RecordStoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RecordStoreError::Unavailable("lock poisoned".to_string()))?;
        records.insert(*record.id(), record);
        Ok(())
    }

    fn remove(&self, record_id: RecordId) -> Result<bool, RecordStoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RecordStoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(records.remove(&record_id).is_some())
    }

    fn list(&self) -> Result<Vec<ConsumingRecord>, RecordStoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| RecordStoreError::Unavailable("lock poisoned".to_string()))?;
        let mut all: Vec<ConsumingRecord> = records.values().cloned().collect();
        all.sort_by_key(|r| *r.record_id().as_uuid());
        Ok(all)
    }
}
