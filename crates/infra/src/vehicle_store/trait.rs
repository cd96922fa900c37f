use thiserror::Error;

use lotledger_core::{ExpectedVersion, StockError, VehicleModelId, VehicleUnitId};
use lotledger_vehicles::{VehicleModel, VehicleUnit};
use std::sync::Arc;

/// A model's registered units together with the collection version.
///
/// The whole per-model collection is versioned as one value so that
/// duplicate-serial and capacity checks can be made race-free with a single
/// conditional write, the same discipline used for part quantities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUnits {
    pub units: Vec<VehicleUnit>,
    pub version: u64,
}

impl StoredUnits {
    pub fn empty() -> Self {
        Self {
            units: Vec::new(),
            version: 0,
        }
    }
}

/// Vehicle store operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VehicleStoreError {
    #[error("vehicle model not found: {0}")]
    ModelNotFound(VehicleModelId),

    #[error("vehicle unit not found: {0}")]
    UnitNotFound(VehicleUnitId),

    #[error("vehicle model already exists: {0}")]
    ModelExists(VehicleModelId),

    /// The conditional write of a model's unit collection lost.
    #[error("version conflict for units of model {model_id} (expected {expected:?}, actual {actual})")]
    VersionConflict {
        model_id: VehicleModelId,
        expected: ExpectedVersion,
        actual: u64,
    },

    #[error("vehicle store unavailable: {0}")]
    Unavailable(String),
}

impl From<VehicleStoreError> for StockError {
    fn from(value: VehicleStoreError) -> Self {
        match value {
            VehicleStoreError::ModelNotFound(id) => {
                StockError::not_found(format!("vehicle model {id}"))
            }
            VehicleStoreError::UnitNotFound(id) => {
                StockError::not_found(format!("vehicle unit {id}"))
            }
            VehicleStoreError::ModelExists(id) => {
                StockError::validation(format!("vehicle model {id} already exists"))
            }
            VehicleStoreError::VersionConflict { model_id, .. } => {
                StockError::ConcurrentRegistration { model_id }
            }
            VehicleStoreError::Unavailable(msg) => StockError::Unavailable(msg),
        }
    }
}

/// Storage for vehicle models and their serialized units
/// (`vehicleUnits/{modelId}/{id}` key space).
pub trait VehicleStore: Send + Sync {
    fn insert_model(&self, model: VehicleModel) -> Result<(), VehicleStoreError>;

    fn get_model(&self, model_id: VehicleModelId) -> Result<VehicleModel, VehicleStoreError>;

    /// Unconditional upsert of the model body (price edits, declared-quantity
    /// maintenance by sale transactions).
    fn put_model(&self, model: VehicleModel) -> Result<(), VehicleStoreError>;

    fn list_models(&self) -> Result<Vec<VehicleModel>, VehicleStoreError>;

    /// The versioned unit collection for a model (empty at version 0 when no
    /// unit was ever registered).
    fn units_for(&self, model_id: VehicleModelId) -> Result<StoredUnits, VehicleStoreError>;

    /// Conditional write of the full unit collection for a model.
    fn put_units(
        &self,
        model_id: VehicleModelId,
        units: Vec<VehicleUnit>,
        expected: ExpectedVersion,
    ) -> Result<StoredUnits, VehicleStoreError>;

    /// Locate a unit across models.
    fn find_unit(
        &self,
        unit_id: VehicleUnitId,
    ) -> Result<(VehicleModelId, VehicleUnit), VehicleStoreError>;
}

impl<V> VehicleStore for Arc<V>
where
    V: VehicleStore + ?Sized,
{
    fn insert_model(&self, model: VehicleModel) -> Result<(), VehicleStoreError> {
        (**self).insert_model(model)
    }

    fn get_model(&self, model_id: VehicleModelId) -> Result<VehicleModel, VehicleStoreError> {
        (**self).get_model(model_id)
    }

    fn put_model(&self, model: VehicleModel) -> Result<(), VehicleStoreError> {
        (**self).put_model(model)
    }

    fn list_models(&self) -> Result<Vec<VehicleModel>, VehicleStoreError> {
        (**self).list_models()
    }

    fn units_for(&self, model_id: VehicleModelId) -> Result<StoredUnits, VehicleStoreError> {
        (**self).units_for(model_id)
    }

    fn put_units(
        &self,
        model_id: VehicleModelId,
        units: Vec<VehicleUnit>,
        expected: ExpectedVersion,
    ) -> Result<StoredUnits, VehicleStoreError> {
        (**self).put_units(model_id, units, expected)
    }

    fn find_unit(
        &self,
        unit_id: VehicleUnitId,
    ) -> Result<(VehicleModelId, VehicleUnit), VehicleStoreError> {
        (**self).find_unit(unit_id)
    }
}
