//! Vehicle inventory domain module.
//!
//! Vehicle stock is tracked twice in the source data model: an aggregate
//! `quantity` on the model, and individually-serialized unit rows capped by
//! it. This crate models both, including the unit status state machine.

pub mod event;
pub mod model;
pub mod unit;

pub use event::{UnitDeleted, UnitRegistered, UnitStatusChanged, VehicleEvent};
pub use model::VehicleModel;
pub use unit::{UnitSerials, UnitStatus, VehicleUnit};
