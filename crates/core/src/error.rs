//! Stock domain error model.

use thiserror::Error;

use crate::id::{PartId, VehicleModelId};

/// Result type used across the stock domain.
pub type StockResult<T> = Result<T, StockError>;

/// Domain-level error for stock operations.
///
/// Every variant is scoped to a single submission; none is fatal to the
/// process. A rejected submission must leave prior state fully intact, with
/// the single exception of [`StockError::PartialCompensation`], which is
/// inherently partial and carries what it needs for a deterministic retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockError {
    /// An unknown part, record, model or unit was referenced.
    #[error("not found: {0}")]
    NotFound(String),

    /// A deduction would have taken a part's quantity below zero.
    #[error("insufficient stock for part {part_id}: available {available}, requested {requested}")]
    InsufficientStock {
        part_id: PartId,
        available: i64,
        requested: i64,
    },

    /// A serial number already exists for the target vehicle model.
    #[error("duplicate serial number: {serial}")]
    DuplicateSerial { serial: String },

    /// Registering another unit would exceed the model's declared quantity.
    #[error("unit capacity exceeded for vehicle model {model_id}")]
    CapacityExceeded { model_id: VehicleModelId },

    /// A unit status transition that the state machine forbids.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// A restore sequence was interrupted mid-way. `restored` names the parts
    /// already credited so the caller can retry against the remainder.
    #[error("partial compensation: restored {} of {expected} parts", restored.len())]
    PartialCompensation {
        restored: Vec<PartId>,
        expected: usize,
    },

    /// A failed deduct phase could not be fully rolled back. `restored` names
    /// previous lines left credited; `held` carries lines still deducted with
    /// their quantities. The caller must charge `held` to the record so the
    /// taken stock stays accounted for.
    #[error("incomplete rollback: {} lines still deducted, {} left credited", held.len(), restored.len())]
    IncompleteRollback {
        restored: Vec<PartId>,
        held: Vec<(PartId, i64)>,
        expected: usize,
    },

    /// Conditional writes against a part kept losing; bounded retries exhausted.
    #[error("concurrent modification of part {part_id}")]
    ConcurrentModification { part_id: PartId },

    /// Conditional writes against a model's unit collection kept losing.
    #[error("concurrent registration against vehicle model {model_id}")]
    ConcurrentRegistration { model_id: VehicleModelId },

    /// A value failed validation (e.g. duplicate allocation line).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The backing store could not be reached within its deadline.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StockError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// True when retrying the same submission could succeed without any
    /// caller-side state change (transient store/concurrency failures).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StockError::ConcurrentModification { .. }
                | StockError::ConcurrentRegistration { .. }
                | StockError::Unavailable(_)
        )
    }
}
