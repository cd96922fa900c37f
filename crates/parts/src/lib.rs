//! Parts domain module.
//!
//! This crate contains business rules for spare-part stock, implemented purely
//! as deterministic domain logic (no IO, no storage). The non-negative
//! quantity invariant lives here; the infra layer decides when a computed
//! next state may actually commit.

pub mod event;
pub mod part;
pub mod transaction;

pub use event::{PartCreated, PartEvent, StockAdjusted};
pub use part::Part;
pub use transaction::{StockTransaction, TransactionKind};
