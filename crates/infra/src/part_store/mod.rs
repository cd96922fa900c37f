//! Versioned part storage boundary.
//!
//! This module defines an infrastructure-facing abstraction over the
//! `parts/{id}` key space without making any storage assumptions. The one
//! hard requirement is the conditional write; everything above builds its
//! correctness on that.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryPartStore;
pub use r#trait::{PartStore, PartStoreError, StoredPart};
