use std::collections::HashMap;
use std::sync::RwLock;

use lotledger_core::{ExpectedVersion, VehicleModelId, VehicleUnitId};
use lotledger_vehicles::{VehicleModel, VehicleUnit};

use super::r#trait::{StoredUnits, VehicleStore, VehicleStoreError};

/// In-memory vehicle store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryVehicleStore {
    models: RwLock<HashMap<VehicleModelId, VehicleModel>>,
    units: RwLock<HashMap<VehicleModelId, StoredUnits>>,
}

impl InMemoryVehicleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> VehicleStoreError {
    VehicleStoreError::Unavailable("lock poisoned".to_string())
}

impl VehicleStore for InMemoryVehicleStore {
    fn insert_model(&self, model: VehicleModel) -> Result<(), VehicleStoreError> {
        let mut models = self.models.write().map_err(|_| poisoned())?;
        if models.contains_key(&model.id) {
            return Err(VehicleStoreError::ModelExists(model.id));
        }
        models.insert(model.id, model);
        Ok(())
    }

    fn get_model(&self, model_id: VehicleModelId) -> Result<VehicleModel, VehicleStoreError> {
        let models = self.models.read().map_err(|_| poisoned())?;
        models
            .get(&model_id)
            .cloned()
            .ok_or(VehicleStoreError::ModelNotFound(model_id))
    }

    fn put_model(&self, model: VehicleModel) -> Result<(), VehicleStoreError> {
        let mut models = self.models.write().map_err(|_| poisoned())?;
        if !models.contains_key(&model.id) {
            return Err(VehicleStoreError::ModelNotFound(model.id));
        }
        models.insert(model.id, model);
        Ok(())
    }

    fn list_models(&self) -> Result<Vec<VehicleModel>, VehicleStoreError> {
        let models = self.models.read().map_err(|_| poisoned())?;
        let mut all: Vec<VehicleModel> = models.values().cloned().collect();
        all.sort_by_key(|m| *m.id.as_uuid());
        Ok(all)
    }

    fn units_for(&self, model_id: VehicleModelId) -> Result<StoredUnits, VehicleStoreError> {
        {
            let models = self.models.read().map_err(|_| poisoned())?;
            if !models.contains_key(&model_id) {
                return Err(VehicleStoreError::ModelNotFound(model_id));
            }
        }
        let units = self.units.read().map_err(|_| poisoned())?;
        Ok(units.get(&model_id).cloned().unwrap_or_else(StoredUnits::empty))
    }

    fn put_units(
        &self,
        model_id: VehicleModelId,
        new_units: Vec<VehicleUnit>,
        expected: ExpectedVersion,
    ) -> Result<StoredUnits, VehicleStoreError> {
        {
            let models = self.models.read().map_err(|_| poisoned())?;
            if !models.contains_key(&model_id) {
                return Err(VehicleStoreError::ModelNotFound(model_id));
            }
        }
        let mut units = self.units.write().map_err(|_| poisoned())?;
        let current_version = units.get(&model_id).map(|s| s.version).unwrap_or(0);
        if !expected.matches(current_version) {
            return Err(VehicleStoreError::VersionConflict {
                model_id,
                expected,
                actual: current_version,
            });
        }
        let stored = StoredUnits {
            units: new_units,
            version: current_version + 1,
        };
        units.insert(model_id, stored.clone());
        Ok(stored)
    }

    fn find_unit(
        &self,
        unit_id: VehicleUnitId,
    ) -> Result<(VehicleModelId, VehicleUnit), VehicleStoreError> {
        let units = self.units.read().map_err(|_| poisoned())?;
        for (model_id, stored) in units.iter() {
            if let Some(unit) = stored.units.iter().find(|u| u.id == unit_id) {
                return Ok((*model_id, unit.clone()));
            }
        }
        Err(VehicleStoreError::UnitNotFound(unit_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotledger_vehicles::UnitSerials;

    fn model(quantity: i64) -> VehicleModel {
        VehicleModel::new(VehicleModelId::new(), "Volt S1", "VS1", 250_000, quantity).unwrap()
    }

    fn unit(model_id: VehicleModelId, motor: &str) -> VehicleUnit {
        let serials = UnitSerials::new(motor, format!("CH-{motor}"), None, None).unwrap();
        VehicleUnit::new(VehicleUnitId::new(), model_id, serials)
    }

    #[test]
    fn insert_model_rejects_duplicate_id() {
        let store = InMemoryVehicleStore::new();
        let m = model(5);
        store.insert_model(m.clone()).unwrap();

        let err = store.insert_model(m.clone()).unwrap_err();
        assert_eq!(err, VehicleStoreError::ModelExists(m.id));
    }

    #[test]
    fn units_start_empty_at_version_zero() {
        let store = InMemoryVehicleStore::new();
        let m = model(5);
        store.insert_model(m.clone()).unwrap();

        let stored = store.units_for(m.id).unwrap();
        assert!(stored.units.is_empty());
        assert_eq!(stored.version, 0);
    }

    #[test]
    fn put_units_bumps_version_and_enforces_expectation() {
        let store = InMemoryVehicleStore::new();
        let m = model(5);
        store.insert_model(m.clone()).unwrap();

        let u1 = unit(m.id, "M-001");
        let stored = store
            .put_units(m.id, vec![u1.clone()], ExpectedVersion::Exact(0))
            .unwrap();
        assert_eq!(stored.version, 1);

        // A writer that read the collection before the first write loses.
        let u2 = unit(m.id, "M-002");
        let err = store
            .put_units(m.id, vec![u2], ExpectedVersion::Exact(0))
            .unwrap_err();
        assert!(matches!(
            err,
            VehicleStoreError::VersionConflict { actual: 1, .. }
        ));
    }

    #[test]
    fn find_unit_searches_across_models() {
        let store = InMemoryVehicleStore::new();
        let m1 = model(5);
        let m2 = model(3);
        store.insert_model(m1.clone()).unwrap();
        store.insert_model(m2.clone()).unwrap();

        let u = unit(m2.id, "M-777");
        store
            .put_units(m2.id, vec![u.clone()], ExpectedVersion::Exact(0))
            .unwrap();

        let (found_model, found_unit) = store.find_unit(u.id).unwrap();
        assert_eq!(found_model, m2.id);
        assert_eq!(found_unit, u);

        let missing = VehicleUnitId::new();
        assert_eq!(
            store.find_unit(missing).unwrap_err(),
            VehicleStoreError::UnitNotFound(missing)
        );
    }

    #[test]
    fn put_model_requires_existing_model() {
        let store = InMemoryVehicleStore::new();
        let m = model(5);
        assert_eq!(
            store.put_model(m.clone()).unwrap_err(),
            VehicleStoreError::ModelNotFound(m.id)
        );
    }
}
