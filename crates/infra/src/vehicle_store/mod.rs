//! Vehicle model and unit storage boundary.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryVehicleStore;
pub use r#trait::{StoredUnits, VehicleStore, VehicleStoreError};
