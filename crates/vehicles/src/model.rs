use serde::{Deserialize, Serialize};

use lotledger_core::{Entity, StockError, StockResult, VehicleModelId};

/// A vehicle model with its declared aggregate stock count.
///
/// `quantity` is maintained by sale/purchase transactions independently of the
/// serialized unit rows registered against the model. The two counters are
/// not reconciled automatically; `UnitRegistry::stock_divergence` makes the
/// gap observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleModel {
    pub id: VehicleModelId,
    pub name: String,
    pub model_code: String,
    /// Price in smallest currency unit.
    pub price: u64,
    /// Declared stock count. Caps how many units may be registered.
    pub quantity: i64,
}

impl VehicleModel {
    pub fn new(
        id: VehicleModelId,
        name: impl Into<String>,
        model_code: impl Into<String>,
        price: u64,
        quantity: i64,
    ) -> StockResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StockError::validation("vehicle model name cannot be empty"));
        }
        if quantity < 0 {
            return Err(StockError::validation(
                "vehicle model quantity cannot be negative",
            ));
        }
        Ok(Self {
            id,
            name,
            model_code: model_code.into(),
            price,
            quantity,
        })
    }
}

impl Entity for VehicleModel {
    type Id = VehicleModelId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_declared_quantity() {
        let err =
            VehicleModel::new(VehicleModelId::new(), "City 110", "C110", 8_500_000, -1).unwrap_err();
        assert!(matches!(err, StockError::Validation(_)));
    }

    #[test]
    fn rejects_blank_name() {
        let err = VehicleModel::new(VehicleModelId::new(), " ", "C110", 8_500_000, 5).unwrap_err();
        assert!(matches!(err, StockError::Validation(_)));
    }
}
