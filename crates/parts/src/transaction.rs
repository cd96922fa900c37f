use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lotledger_core::{PartId, RecordId, TransactionId};

/// Why a stock delta happened.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    /// Stock bought in from a supplier.
    Purchase,
    /// Direct over-the-counter sale.
    Sale,
    /// Consumed by a service order or vehicle sale.
    ServiceConsume,
    /// Credited back when a consuming record is edited or deleted.
    ServiceRestore,
    /// Manual correction by back-office staff.
    ManualAdjust,
}

/// One immutable ledger entry: a single signed quantity delta for one part.
///
/// Entries are append-only. The `quantity_before`/`quantity_after` pair is the
/// observed state at commit time, so the ledger alone can reconcile any part:
/// `quantity == initial_quantity + Σ deltas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTransaction {
    pub id: TransactionId,
    pub part_id: PartId,
    pub delta: i64,
    pub quantity_before: i64,
    pub quantity_after: i64,
    pub kind: TransactionKind,
    pub occurred_at: DateTime<Utc>,
    /// The consuming record that caused this delta, if any. Groups the
    /// entries needed to reconstruct a record's net effect on stock.
    pub source_record_id: Option<RecordId>,
    pub notes: Option<String>,
}

impl StockTransaction {
    /// Entry-level consistency: the recorded before/after pair must agree
    /// with the delta.
    pub fn is_consistent(&self) -> bool {
        self.quantity_before + self.delta == self.quantity_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_kebab_case() {
        let json = serde_json::to_string(&TransactionKind::ServiceConsume).unwrap();
        assert_eq!(json, "\"service-consume\"");
        let json = serde_json::to_string(&TransactionKind::ServiceRestore).unwrap();
        assert_eq!(json, "\"service-restore\"");
        let json = serde_json::to_string(&TransactionKind::ManualAdjust).unwrap();
        assert_eq!(json, "\"manual-adjust\"");
    }

    #[test]
    fn consistency_check() {
        let tx = StockTransaction {
            id: TransactionId::new(),
            part_id: PartId::new(),
            delta: -3,
            quantity_before: 10,
            quantity_after: 7,
            kind: TransactionKind::ServiceConsume,
            occurred_at: Utc::now(),
            source_record_id: Some(RecordId::new()),
            notes: None,
        };
        assert!(tx.is_consistent());

        let broken = StockTransaction {
            quantity_after: 8,
            ..tx
        };
        assert!(!broken.is_consistent());
    }
}
