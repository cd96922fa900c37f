use thiserror::Error;

use lotledger_core::{ExpectedVersion, PartId, StockError};
use lotledger_parts::Part;
use std::sync::Arc;

/// A part together with its store version.
///
/// The version stamps every read so the subsequent write can be conditioned
/// on it. Versions are per part, monotonically increasing, assigned by the
/// store on every committed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPart {
    pub part: Part,
    pub version: u64,
}

/// Part store operation error.
///
/// These are **storage errors** (missing keys, lost conditional writes,
/// unreachable backend), as opposed to domain errors (insufficient stock).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartStoreError {
    #[error("part not found: {0}")]
    NotFound(PartId),

    #[error("part already exists: {0}")]
    AlreadyExists(PartId),

    /// The conditional write lost: someone else committed first.
    #[error("version conflict for part {part_id} (expected {expected:?}, actual {actual})")]
    VersionConflict {
        part_id: PartId,
        expected: ExpectedVersion,
        actual: u64,
    },

    /// The backend did not answer within its deadline.
    #[error("part store unavailable: {0}")]
    Unavailable(String),
}

impl From<PartStoreError> for StockError {
    fn from(value: PartStoreError) -> Self {
        match value {
            PartStoreError::NotFound(id) => StockError::not_found(format!("part {id}")),
            PartStoreError::AlreadyExists(id) => {
                StockError::validation(format!("part {id} already exists"))
            }
            PartStoreError::VersionConflict { part_id, .. } => {
                StockError::ConcurrentModification { part_id }
            }
            PartStoreError::Unavailable(msg) => StockError::Unavailable(msg),
        }
    }
}

/// Versioned key-value store for parts.
///
/// The remote backend offers get/set on `parts/{id}` with no multi-key
/// transaction, so correctness hangs entirely on `put` being a **conditional
/// write**: it commits only if the stored version still matches `expected`.
/// Implementations must:
/// - assign versions monotonically per part (no reuse, no gaps required)
/// - reject `put` with `VersionConflict` when the version moved
/// - surface timeouts as `Unavailable` rather than blocking indefinitely
pub trait PartStore: Send + Sync {
    fn get(&self, part_id: PartId) -> Result<StoredPart, PartStoreError>;

    fn list(&self) -> Result<Vec<StoredPart>, PartStoreError>;

    /// Create a new part at version 1. Fails if the id is taken.
    fn insert(&self, part: Part) -> Result<StoredPart, PartStoreError>;

    /// Conditional write of the full part state.
    fn put(&self, part: Part, expected: ExpectedVersion) -> Result<StoredPart, PartStoreError>;
}

impl<S> PartStore for Arc<S>
where
    S: PartStore + ?Sized,
{
    fn get(&self, part_id: PartId) -> Result<StoredPart, PartStoreError> {
        (**self).get(part_id)
    }

    fn list(&self) -> Result<Vec<StoredPart>, PartStoreError> {
        (**self).list()
    }

    fn insert(&self, part: Part) -> Result<StoredPart, PartStoreError> {
        (**self).insert(part)
    }

    fn put(&self, part: Part, expected: ExpectedVersion) -> Result<StoredPart, PartStoreError> {
        (**self).put(part, expected)
    }
}
