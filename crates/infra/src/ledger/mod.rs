//! Append-only transaction ledger boundary.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryLedger;
pub use r#trait::{LedgerError, TransactionLedger};

use lotledger_core::PartId;
use lotledger_parts::StockTransaction;

/// Per-part signed sum over a slice of ledger entries, first-seen part order.
///
/// Summing a record's entries yields its net outstanding effect on each part
/// (negative while stock is held). This is the reconciliation fallback when
/// no allocation snapshot is at hand.
pub fn net_effect(entries: &[StockTransaction]) -> Vec<(PartId, i64)> {
    let mut totals: Vec<(PartId, i64)> = Vec::new();
    for tx in entries {
        match totals.iter_mut().find(|(id, _)| *id == tx.part_id) {
            Some((_, sum)) => *sum += tx.delta,
            None => totals.push((tx.part_id, tx.delta)),
        }
    }
    totals
}
