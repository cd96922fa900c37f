//! Event publishing/subscription abstraction (mechanics only).
//!
//! The reactive push channel of the source system is modeled here as an
//! explicit pub/sub bus, decoupled from the storage write path so tests can
//! assert on emitted notifications without a live network dependency.
//!
//! The bus makes minimal assumptions:
//!
//! - **Transport-agnostic**: in-memory channels here; a remote push transport
//!   satisfies the same trait.
//! - **At-least-once delivery**: notifications may arrive more than once;
//!   consumers must be idempotent (envelope sequence numbers make that cheap).
//! - **No persistence**: the part store and ledger are the source of truth,
//!   the bus is for distribution only.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to a notification stream.
///
/// Each subscription gets a copy of every message published to the bus
/// (broadcast semantics). Subscriptions are designed for single-threaded
/// consumption; spin up one per consumer thread.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic pub/sub bus.
///
/// Sits between the stores and their observers:
///
/// ```text
/// apply_delta → PartStore (conditional write) → Ledger (append) → EventBus (publish)
///                                                                     ├─ dashboards
///                                                                     ├─ reorder alerts
///                                                                     └─ exports
/// ```
///
/// Notifications are published only after the store write committed; a failed
/// publish never invalidates the write (the store is authoritative).
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
