//! Storage boundaries and services for the stock ledger.
//!
//! The backend is a plain key-value store with per-key conditional writes and
//! no transactions. Everything in this crate is built around that constraint:
//!
//! - [`part_store`], [`vehicle_store`], [`record_store`]: versioned storage
//!   traits with in-memory implementations for tests/dev
//! - [`ledger`]: append-only audit log of stock deltas
//! - [`inventory`]: the single write path for part quantities (bounded
//!   optimistic retry over the conditional put)
//! - [`engine`]: compensating allocation (restore/validate/deduct) for
//!   records that consume parts
//! - [`record_manager`]: record CRUD glued to the engine
//! - [`unit_registry`]: serialized vehicle units with race-free serial and
//!   capacity checks

pub mod engine;
pub mod inventory;
pub mod ledger;
mod notify;
pub mod part_store;
pub mod record_manager;
pub mod record_store;
pub mod unit_registry;
pub mod vehicle_store;


pub use engine::AllocationEngine;
pub use inventory::PartInventory;
pub use record_manager::{RecordManager, RecordSubmission};
pub use unit_registry::UnitRegistry;

/// How many times an optimistic write loop re-reads after losing a
/// conditional write before giving up with a concurrency error.
pub(crate) const MAX_CAS_RETRIES: u32 = 5;
