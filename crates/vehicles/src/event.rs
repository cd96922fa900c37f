use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lotledger_core::{VehicleModelId, VehicleUnitId};
use lotledger_events::Event;

use crate::unit::UnitStatus;

/// Event: UnitRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRegistered {
    pub unit_id: VehicleUnitId,
    pub model_id: VehicleModelId,
    pub motor_no: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: UnitStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStatusChanged {
    pub unit_id: VehicleUnitId,
    pub model_id: VehicleModelId,
    pub status: UnitStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: UnitDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDeleted {
    pub unit_id: VehicleUnitId,
    pub model_id: VehicleModelId,
    pub occurred_at: DateTime<Utc>,
}

/// Notifications emitted by the unit registry after a committed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleEvent {
    UnitRegistered(UnitRegistered),
    UnitStatusChanged(UnitStatusChanged),
    UnitDeleted(UnitDeleted),
}

impl Event for VehicleEvent {
    fn event_type(&self) -> &'static str {
        match self {
            VehicleEvent::UnitRegistered(_) => "vehicles.unit.registered",
            VehicleEvent::UnitStatusChanged(_) => "vehicles.unit.status_changed",
            VehicleEvent::UnitDeleted(_) => "vehicles.unit.deleted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            VehicleEvent::UnitRegistered(e) => e.occurred_at,
            VehicleEvent::UnitStatusChanged(e) => e.occurred_at,
            VehicleEvent::UnitDeleted(e) => e.occurred_at,
        }
    }
}
