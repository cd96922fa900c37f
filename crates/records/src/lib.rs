//! Consuming records domain module.
//!
//! Service orders and vehicle sales share one allocation shape so the
//! compensating stock protocol is written once. This crate holds the pure
//! record/allocation model; the commit protocol itself lives in infra.

pub mod allocation;
pub mod record;

pub use allocation::{Allocation, AllocationSet};
pub use record::{ConsumingRecord, RecordDetails, RecordStatus, ServiceOrder, VehicleSale};
