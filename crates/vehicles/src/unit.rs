use serde::{Deserialize, Serialize};

use lotledger_core::{Entity, StockError, StockResult, VehicleModelId, VehicleUnitId};

/// Unit lifecycle: `in-stock -> reserved -> sold`. Sold is terminal; no
/// transition leaves it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitStatus {
    InStock,
    Reserved,
    Sold,
}

impl core::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            UnitStatus::InStock => "in-stock",
            UnitStatus::Reserved => "reserved",
            UnitStatus::Sold => "sold",
        };
        f.write_str(s)
    }
}

/// The serial numbers stamped on one physical unit. Motor and chassis numbers
/// are the identifying pair; battery/controller numbers exist only on some
/// vehicle types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSerials {
    pub motor_no: String,
    pub chassis_no: String,
    pub battery_no: Option<String>,
    pub controller_no: Option<String>,
}

impl UnitSerials {
    pub fn new(
        motor_no: impl Into<String>,
        chassis_no: impl Into<String>,
        battery_no: Option<String>,
        controller_no: Option<String>,
    ) -> StockResult<Self> {
        let motor_no = motor_no.into();
        let chassis_no = chassis_no.into();
        if motor_no.trim().is_empty() {
            return Err(StockError::validation("motor number cannot be empty"));
        }
        if chassis_no.trim().is_empty() {
            return Err(StockError::validation("chassis number cannot be empty"));
        }
        Ok(Self {
            motor_no,
            chassis_no,
            battery_no,
            controller_no,
        })
    }

    /// The first serial clashing with `other`, if any. Motor number is the
    /// primary identifier; chassis is checked as well.
    pub fn conflict_with(&self, other: &UnitSerials) -> Option<&str> {
        if self.motor_no == other.motor_no {
            return Some(&self.motor_no);
        }
        if self.chassis_no == other.chassis_no {
            return Some(&self.chassis_no);
        }
        None
    }
}

/// An individually-serialized unit registered against a vehicle model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleUnit {
    pub id: VehicleUnitId,
    pub model_id: VehicleModelId,
    pub serials: UnitSerials,
    pub status: UnitStatus,
}

impl VehicleUnit {
    /// A freshly registered unit is in stock.
    pub fn new(id: VehicleUnitId, model_id: VehicleModelId, serials: UnitSerials) -> Self {
        Self {
            id,
            model_id,
            serials,
            status: UnitStatus::InStock,
        }
    }

    /// Apply a status change, enforcing that `sold` is terminal.
    pub fn set_status(&mut self, status: UnitStatus) -> StockResult<()> {
        if self.status == UnitStatus::Sold {
            return Err(StockError::InvalidTransition {
                from: self.status.to_string(),
                to: status.to_string(),
            });
        }
        self.status = status;
        Ok(())
    }
}

impl Entity for VehicleUnit {
    type Id = VehicleUnitId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
