use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lotledger_core::{PartId, RecordId};
use lotledger_events::Event;

use crate::transaction::TransactionKind;

/// Event: PartCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartCreated {
    pub part_id: PartId,
    pub name: String,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockAdjusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjusted {
    pub part_id: PartId,
    pub delta: i64,
    /// Quantity on hand after the delta committed.
    pub quantity: i64,
    pub kind: TransactionKind,
    pub source_record_id: Option<RecordId>,
    pub occurred_at: DateTime<Utc>,
}

/// Notifications emitted by the part store after a committed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartEvent {
    PartCreated(PartCreated),
    StockAdjusted(StockAdjusted),
}

impl Event for PartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PartEvent::PartCreated(_) => "parts.part.created",
            PartEvent::StockAdjusted(_) => "parts.part.stock_adjusted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PartEvent::PartCreated(e) => e.occurred_at,
            PartEvent::StockAdjusted(e) => e.occurred_at,
        }
    }
}
