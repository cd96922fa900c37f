use serde::{Deserialize, Serialize};

use lotledger_core::{Entity, RecordId, VehicleModelId, VehicleUnitId};

use crate::allocation::AllocationSet;

/// Consuming record lifecycle status. Status changes carry no stock impact;
/// stock moves only through allocation commit/release.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Open,
    Completed,
    Cancelled,
}

/// Service order body (workshop job consuming spare parts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub customer_name: String,
    pub vehicle_desc: String,
    /// Labor in smallest currency unit, billed on top of part totals.
    pub labor_charge: u64,
    pub notes: Option<String>,
}

/// Vehicle sale body (may bundle spare parts/accessories as allocations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSale {
    pub model_id: VehicleModelId,
    /// The serialized unit handed over, once one is picked.
    pub unit_id: Option<VehicleUnitId>,
    pub buyer_name: String,
    pub sale_price: u64,
}

/// The two kinds of records that consume part stock. Tagged so the allocation
/// machinery is written once and reused across both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordDetails {
    ServiceOrder(ServiceOrder),
    VehicleSale(VehicleSale),
}

/// A record that reserves/consumes part stock.
///
/// `committed` is the previous-allocation snapshot captured at the last
/// successful commit. It is what the next edit or delete compensates against;
/// nothing else in the system remembers what this record took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumingRecord {
    id: RecordId,
    status: RecordStatus,
    details: RecordDetails,
    committed: AllocationSet,
}

impl ConsumingRecord {
    pub fn new(id: RecordId, details: RecordDetails) -> Self {
        Self {
            id,
            status: RecordStatus::Open,
            details,
            committed: AllocationSet::empty(),
        }
    }

    pub fn record_id(&self) -> RecordId {
        self.id
    }

    pub fn status(&self) -> RecordStatus {
        self.status
    }

    pub fn details(&self) -> &RecordDetails {
        &self.details
    }

    /// Snapshot of the allocation applied at the last successful commit.
    pub fn committed(&self) -> &AllocationSet {
        &self.committed
    }

    pub fn set_status(&mut self, status: RecordStatus) {
        self.status = status;
    }

    pub fn set_details(&mut self, details: RecordDetails) {
        self.details = details;
    }

    /// Replace the snapshot after the allocation engine committed `set`.
    pub fn commit_allocation(&mut self, set: AllocationSet) {
        self.committed = set;
    }

    /// Shrink the snapshot to the lines a partially-failed restore has not
    /// yet credited back, so a retry is exact rather than double-crediting.
    pub fn trim_committed(&mut self, restored: &[lotledger_core::PartId]) {
        self.committed = self.committed.without_parts(restored);
    }
}

impl Entity for ConsumingRecord {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::{Allocation, AllocationSet};
    use lotledger_core::PartId;

    fn service_details() -> RecordDetails {
        RecordDetails::ServiceOrder(ServiceOrder {
            customer_name: "R. Doshi".to_string(),
            vehicle_desc: "2019 scooter, 12k km".to_string(),
            labor_charge: 30_000,
            notes: None,
        })
    }

    #[test]
    fn new_record_starts_open_with_empty_snapshot() {
        let rec = ConsumingRecord::new(RecordId::new(), service_details());
        assert_eq!(rec.status(), RecordStatus::Open);
        assert!(rec.committed().is_empty());
    }

    #[test]
    fn commit_replaces_the_snapshot() {
        let mut rec = ConsumingRecord::new(RecordId::new(), service_details());
        let a = PartId::new();
        let set = AllocationSet::new(vec![Allocation::new(a, 3, 100)]).unwrap();

        rec.commit_allocation(set.clone());
        assert_eq!(rec.committed(), &set);

        rec.commit_allocation(AllocationSet::empty());
        assert!(rec.committed().is_empty());
    }

    #[test]
    fn trim_drops_restored_lines_only() {
        let mut rec = ConsumingRecord::new(RecordId::new(), service_details());
        let a = PartId::new();
        let b = PartId::new();
        rec.commit_allocation(
            AllocationSet::new(vec![
                Allocation::new(a, 3, 100),
                Allocation::new(b, 2, 200),
            ])
            .unwrap(),
        );

        rec.trim_committed(&[a]);
        assert_eq!(rec.committed().quantity_of(a), 0);
        assert_eq!(rec.committed().quantity_of(b), 2);
    }

    #[test]
    fn details_round_trip_with_variant_tag() {
        let rec = ConsumingRecord::new(RecordId::new(), service_details());
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"type\":\"service_order\""));
        let back: ConsumingRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
