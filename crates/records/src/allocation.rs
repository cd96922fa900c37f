use serde::{Deserialize, Serialize};

use lotledger_core::{PartId, StockError, StockResult, ValueObject};
use lotledger_parts::Part;

/// One line item inside a consuming record: a part, how many, and the unit
/// price captured at allocation time (the sale price must not drift if the
/// part is later repriced).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub part_id: PartId,
    pub quantity: i64,
    /// Price snapshot in smallest currency unit.
    pub unit_price: u64,
}

impl Allocation {
    pub fn new(part_id: PartId, quantity: i64, unit_price: u64) -> Self {
        Self {
            part_id,
            quantity,
            unit_price,
        }
    }

    /// Snapshot the part's current price into a new line.
    pub fn for_part(part: &Part, quantity: i64) -> Self {
        Self::new(part.id, quantity, part.unit_price)
    }

    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(self.quantity.max(0) as u64)
    }
}

impl ValueObject for Allocation {}

/// An ordered set of allocation lines with unique part ids.
///
/// A line that repeats a part would make the intended quantity ambiguous, so
/// duplicates are rejected here, before any stock phase runs. The empty set is
/// valid: a record without parts has no stock impact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct AllocationSet {
    lines: Vec<Allocation>,
}

impl AllocationSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(lines: Vec<Allocation>) -> StockResult<Self> {
        for (idx, line) in lines.iter().enumerate() {
            if line.quantity <= 0 {
                return Err(StockError::validation(format!(
                    "allocation line {idx} has non-positive quantity {}",
                    line.quantity
                )));
            }
            if lines[..idx].iter().any(|l| l.part_id == line.part_id) {
                return Err(StockError::validation(format!(
                    "allocation repeats part {}",
                    line.part_id
                )));
            }
        }
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[Allocation] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Quantity this set holds for a given part (0 when absent).
    pub fn quantity_of(&self, part_id: PartId) -> i64 {
        self.lines
            .iter()
            .find(|l| l.part_id == part_id)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    /// Drop lines for the given parts, keeping order. Used after a partially
    /// completed restore so a retry releases exactly the remainder.
    pub fn without_parts(&self, parts: &[PartId]) -> Self {
        Self {
            lines: self
                .lines
                .iter()
                .filter(|l| !parts.contains(&l.part_id))
                .cloned()
                .collect(),
        }
    }

    /// Add quantities line-wise. Parts already present keep their price
    /// snapshot and gain the extra quantity; new parts are appended. Used to
    /// charge stock that an interrupted rollback left deducted back onto the
    /// record's snapshot.
    pub fn merged_with(&self, extra: &[Allocation]) -> Self {
        let mut lines = self.lines.clone();
        for add in extra {
            match lines.iter_mut().find(|l| l.part_id == add.part_id) {
                Some(line) => line.quantity += add.quantity,
                None => lines.push(add.clone()),
            }
        }
        Self { lines }
    }

    pub fn total(&self) -> u64 {
        self.lines.iter().map(Allocation::line_total).sum()
    }
}
