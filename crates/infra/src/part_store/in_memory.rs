use std::collections::HashMap;
use std::sync::RwLock;

use lotledger_core::{ExpectedVersion, PartId};
use lotledger_parts::Part;

use super::r#trait::{PartStore, PartStoreError, StoredPart};

/// In-memory versioned part store.
///
/// Intended for tests/dev. The write lock makes each conditional write atomic,
/// which is exactly the contract a remote backend provides via its own
/// conditional-set primitive.
#[derive(Debug, Default)]
pub struct InMemoryPartStore {
    parts: RwLock<HashMap<PartId, StoredPart>>,
}

impl InMemoryPartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PartStore for InMemoryPartStore {
    fn get(&self, part_id: PartId) -> Result<StoredPart, PartStoreError> {
        let parts = self
            .parts
            .read()
            .map_err(|_| PartStoreError::Unavailable("lock poisoned".to_string()))?;

        parts
            .get(&part_id)
            .cloned()
            .ok_or(PartStoreError::NotFound(part_id))
    }

    fn list(&self) -> Result<Vec<StoredPart>, PartStoreError> {
        let parts = self
            .parts
            .read()
            .map_err(|_| PartStoreError::Unavailable("lock poisoned".to_string()))?;

        let mut all: Vec<StoredPart> = parts.values().cloned().collect();
        all.sort_by_key(|s| *s.part.id.as_uuid());
        Ok(all)
    }

    fn insert(&self, part: Part) -> Result<StoredPart, PartStoreError> {
        let mut parts = self
            .parts
            .write()
            .map_err(|_| PartStoreError::Unavailable("lock poisoned".to_string()))?;

        if parts.contains_key(&part.id) {
            return Err(PartStoreError::AlreadyExists(part.id));
        }

        let stored = StoredPart { part, version: 1 };
        parts.insert(stored.part.id, stored.clone());
        Ok(stored)
    }

    fn put(&self, part: Part, expected: ExpectedVersion) -> Result<StoredPart, PartStoreError> {
        let mut parts = self
            .parts
            .write()
            .map_err(|_| PartStoreError::Unavailable("lock poisoned".to_string()))?;

        let current = parts
            .get(&part.id)
            .ok_or(PartStoreError::NotFound(part.id))?;

        if !expected.matches(current.version) {
            return Err(PartStoreError::VersionConflict {
                part_id: part.id,
                expected,
                actual: current.version,
            });
        }

        let stored = StoredPart {
            version: current.version + 1,
            part,
        };
        parts.insert(stored.part.id, stored.clone());
        Ok(stored)
    }
}
