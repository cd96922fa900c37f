//! `lotledger-events` — change notification channel.
//!
//! Explicit pub/sub abstraction replacing the source system's implicit
//! reactive push propagation. Stores publish here after their writes commit.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
