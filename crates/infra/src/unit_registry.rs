//! Vehicle unit registry.
//!
//! Serialized units hang off their model as one versioned collection, so the
//! duplicate-serial and capacity checks run against a snapshot and commit with
//! a version-conditioned write. A lost write means another clerk registered or
//! changed a unit in between; the loop re-reads and re-checks.
//!
//! The model's declared `quantity` and the number of registered unit rows are
//! maintained by different workflows and may drift apart; the registry does
//! not reconcile them, it only reports the gap.

use chrono::Utc;
use serde_json::Value as JsonValue;

use lotledger_core::{
    ExpectedVersion, StockError, StockResult, VehicleModelId, VehicleUnitId,
};
use lotledger_events::{EventBus, EventEnvelope};
use lotledger_vehicles::{
    UnitDeleted, UnitRegistered, UnitSerials, UnitStatus, UnitStatusChanged, VehicleEvent,
    VehicleModel, VehicleUnit,
};

use crate::MAX_CAS_RETRIES;
use crate::notify::publish_event;
use crate::vehicle_store::VehicleStore;

/// Vehicle model CRUD plus serialized unit registration and lifecycle.
#[derive(Debug, Clone)]
pub struct UnitRegistry<V, B> {
    store: V,
    bus: B,
}

impl<V, B> UnitRegistry<V, B>
where
    V: VehicleStore,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    pub fn new(store: V, bus: B) -> Self {
        Self { store, bus }
    }

    pub fn add_model(&self, model: VehicleModel) -> StockResult<VehicleModel> {
        self.store.insert_model(model.clone())?;
        Ok(model)
    }

    pub fn get_model(&self, model_id: VehicleModelId) -> StockResult<VehicleModel> {
        Ok(self.store.get_model(model_id)?)
    }

    pub fn list_models(&self) -> StockResult<Vec<VehicleModel>> {
        Ok(self.store.list_models()?)
    }

    /// Set a model's declared stock count. Registered unit rows are left
    /// untouched, so lowering the count below the registered row count is
    /// allowed and widens the reported divergence.
    pub fn adjust_model_quantity(
        &self,
        model_id: VehicleModelId,
        quantity: i64,
    ) -> StockResult<VehicleModel> {
        if quantity < 0 {
            return Err(StockError::validation(
                "vehicle model quantity cannot be negative",
            ));
        }
        let mut model = self.store.get_model(model_id)?;
        model.quantity = quantity;
        self.store.put_model(model.clone())?;
        Ok(model)
    }

    /// Register a serialized unit against a model.
    ///
    /// Rejects serials already present on the model's units and registration
    /// beyond the declared quantity. Both checks are validated against the
    /// collection snapshot whose version conditions the write, so two clerks
    /// racing the last slot or the same serial cannot both win.
    pub fn register_unit(
        &self,
        model_id: VehicleModelId,
        serials: UnitSerials,
    ) -> StockResult<VehicleUnit> {
        for attempt in 0..MAX_CAS_RETRIES {
            let model = self.store.get_model(model_id)?;
            let stored = self.store.units_for(model_id)?;

            for existing in &stored.units {
                if let Some(serial) = existing.serials.conflict_with(&serials) {
                    return Err(StockError::DuplicateSerial {
                        serial: serial.to_string(),
                    });
                }
            }
            if stored.units.len() as i64 >= model.quantity {
                return Err(StockError::CapacityExceeded { model_id });
            }

            let unit = VehicleUnit::new(VehicleUnitId::new(), model_id, serials.clone());
            let mut units = stored.units;
            units.push(unit.clone());

            match self
                .store
                .put_units(model_id, units, ExpectedVersion::Exact(stored.version))
            {
                Ok(committed) => {
                    let event = VehicleEvent::UnitRegistered(UnitRegistered {
                        unit_id: unit.id,
                        model_id,
                        motor_no: unit.serials.motor_no.clone(),
                        occurred_at: Utc::now(),
                    });
                    publish_event(&self.bus, *model_id.as_uuid(), committed.version, &event);
                    return Ok(unit);
                }
                Err(crate::vehicle_store::VehicleStoreError::VersionConflict { .. }) => {
                    tracing::debug!(%model_id, attempt, "unit registration lost, retrying");
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(StockError::ConcurrentRegistration { model_id })
    }

    /// Change a unit's lifecycle status. Sold is terminal.
    pub fn set_status(
        &self,
        unit_id: VehicleUnitId,
        status: UnitStatus,
    ) -> StockResult<VehicleUnit> {
        let (model_id, _) = self.store.find_unit(unit_id)?;

        for attempt in 0..MAX_CAS_RETRIES {
            let stored = self.store.units_for(model_id)?;
            let mut units = stored.units;
            let unit = units
                .iter_mut()
                .find(|u| u.id == unit_id)
                .ok_or_else(|| StockError::not_found(format!("vehicle unit {unit_id}")))?;
            unit.set_status(status)?;
            let updated = unit.clone();

            match self
                .store
                .put_units(model_id, units, ExpectedVersion::Exact(stored.version))
            {
                Ok(committed) => {
                    let event = VehicleEvent::UnitStatusChanged(UnitStatusChanged {
                        unit_id,
                        model_id,
                        status,
                        occurred_at: Utc::now(),
                    });
                    publish_event(&self.bus, *model_id.as_uuid(), committed.version, &event);
                    return Ok(updated);
                }
                Err(crate::vehicle_store::VehicleStoreError::VersionConflict { .. }) => {
                    tracing::debug!(%unit_id, attempt, "unit status write lost, retrying");
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(StockError::ConcurrentRegistration { model_id })
    }

    /// Remove a unit row. The model's declared quantity is deliberately left
    /// alone; the removal shows up in [`UnitRegistry::stock_divergence`].
    ///
    /// The write is conditioned on the collection version like every other
    /// unit mutation, so a registration or status change that commits between
    /// the read and the write is never overwritten; the delete re-reads and
    /// retries instead.
    pub fn delete_unit(&self, unit_id: VehicleUnitId) -> StockResult<()> {
        let (model_id, _) = self.store.find_unit(unit_id)?;

        for attempt in 0..MAX_CAS_RETRIES {
            let stored = self.store.units_for(model_id)?;
            let version = stored.version;
            let units: Vec<VehicleUnit> = stored
                .units
                .into_iter()
                .filter(|u| u.id != unit_id)
                .collect();

            match self
                .store
                .put_units(model_id, units, ExpectedVersion::Exact(version))
            {
                Ok(committed) => {
                    let event = VehicleEvent::UnitDeleted(UnitDeleted {
                        unit_id,
                        model_id,
                        occurred_at: Utc::now(),
                    });
                    publish_event(&self.bus, *model_id.as_uuid(), committed.version, &event);
                    return Ok(());
                }
                Err(crate::vehicle_store::VehicleStoreError::VersionConflict { .. }) => {
                    tracing::debug!(%unit_id, attempt, "unit delete lost, retrying");
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(StockError::ConcurrentRegistration { model_id })
    }

    pub fn units_for(&self, model_id: VehicleModelId) -> StockResult<Vec<VehicleUnit>> {
        Ok(self.store.units_for(model_id)?.units)
    }

    /// Declared quantity minus registered unit rows. Positive means fewer
    /// rows than declared stock, negative means more.
    pub fn stock_divergence(&self, model_id: VehicleModelId) -> StockResult<i64> {
        let model = self.store.get_model(model_id)?;
        let stored = self.store.units_for(model_id)?;
        Ok(model.quantity - stored.units.len() as i64)
    }
}
