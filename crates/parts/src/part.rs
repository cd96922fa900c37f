use serde::{Deserialize, Serialize};

use lotledger_core::{Entity, PartId, StockError, StockResult};

/// A spare part with its authoritative quantity-on-hand.
///
/// `quantity` is the contended value of the whole system. It is never mutated
/// in place: [`Part::with_delta`] produces the candidate next state, and the
/// part store commits it only through a version-conditioned write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub name: String,
    /// Category/location metadata for the parts counter (free-form).
    pub category: String,
    pub location: String,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
    /// Quantity on hand. Invariant: never negative.
    pub quantity: i64,
    /// Reorder threshold; purely advisory, read by dashboards.
    pub min_stock: i64,
}

impl Part {
    pub fn new(
        id: PartId,
        name: impl Into<String>,
        category: impl Into<String>,
        location: impl Into<String>,
        unit_price: u64,
        quantity: i64,
        min_stock: i64,
    ) -> StockResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StockError::validation("part name cannot be empty"));
        }
        if quantity < 0 {
            return Err(StockError::validation(
                "part cannot be created with negative quantity",
            ));
        }
        if min_stock < 0 {
            return Err(StockError::validation("min_stock cannot be negative"));
        }
        Ok(Self {
            id,
            name,
            category: category.into(),
            location: location.into(),
            unit_price,
            quantity,
            min_stock,
        })
    }

    /// Compute the next state after a signed stock delta.
    ///
    /// Deductions that would take the quantity below zero are rejected with
    /// [`StockError::InsufficientStock`]; the negative value is computed during
    /// validation but never becomes observable state.
    pub fn with_delta(&self, delta: i64) -> StockResult<Part> {
        let next = self.quantity.checked_add(delta).ok_or_else(|| {
            StockError::validation(format!(
                "stock delta {delta} overflows quantity of part {}",
                self.id
            ))
        })?;
        if next < 0 {
            return Err(StockError::InsufficientStock {
                part_id: self.id,
                available: self.quantity,
                requested: delta.saturating_neg(),
            });
        }
        let mut part = self.clone();
        part.quantity = next;
        Ok(part)
    }

    pub fn is_below_minimum(&self) -> bool {
        self.quantity < self.min_stock
    }
}

impl Entity for Part {
    type Id = PartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_part(quantity: i64) -> Part {
        Part::new(PartId::new(), "Brake pad", "brakes", "A-12", 4_500, quantity, 2).unwrap()
    }

    #[test]
    fn creation_rejects_negative_quantity() {
        let err = Part::new(PartId::new(), "Chain", "drive", "B-3", 1_200, -1, 0).unwrap_err();
        assert!(matches!(err, StockError::Validation(_)));
    }

    #[test]
    fn creation_rejects_blank_name() {
        let err = Part::new(PartId::new(), "  ", "drive", "B-3", 1_200, 5, 0).unwrap_err();
        assert!(matches!(err, StockError::Validation(_)));
    }

    #[test]
    fn with_delta_applies_positive_and_negative() {
        let part = test_part(10);
        assert_eq!(part.with_delta(5).unwrap().quantity, 15);
        assert_eq!(part.with_delta(-10).unwrap().quantity, 0);
        // Original untouched.
        assert_eq!(part.quantity, 10);
    }

    #[test]
    fn with_delta_rejects_overdraw_naming_the_shortfall() {
        let part = test_part(9);
        match part.with_delta(-999).unwrap_err() {
            StockError::InsufficientStock {
                part_id,
                available,
                requested,
            } => {
                assert_eq!(part_id, part.id);
                assert_eq!(available, 9);
                assert_eq!(requested, 999);
            }
            e => panic!("expected InsufficientStock, got {e:?}"),
        }
    }

    #[test]
    fn with_delta_rejects_overflowing_sum() {
        let part = test_part(1);
        assert!(matches!(
            part.with_delta(i64::MAX).unwrap_err(),
            StockError::Validation(_)
        ));
        // i64::MIN does not overflow the sum; it is an ordinary overdraw.
        assert!(matches!(
            test_part(0).with_delta(i64::MIN).unwrap_err(),
            StockError::InsufficientStock { .. }
        ));
    }

    #[test]
    fn below_minimum_flag() {
        let part = test_part(1);
        assert!(part.is_below_minimum());
        assert!(!test_part(2).is_below_minimum());
    }

    proptest! {
        /// Applying any sequence of deltas, keeping only the accepted ones,
        /// never yields a negative quantity and always equals the initial
        /// quantity plus the sum of accepted deltas.
        #[test]
        fn accepted_deltas_reconcile(initial in 0i64..1_000, deltas in proptest::collection::vec(-50i64..50, 0..64)) {
            let mut part = test_part(initial);
            let mut accepted_sum = 0i64;

            for delta in deltas {
                if let Ok(next) = part.with_delta(delta) {
                    accepted_sum += delta;
                    part = next;
                }
                prop_assert!(part.quantity >= 0);
            }

            prop_assert_eq!(part.quantity, initial + accepted_sum);
        }
    }
}
