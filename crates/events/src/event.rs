use chrono::{DateTime, Utc};

/// A domain-agnostic notification event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **versioned** (schema evolution)
/// - emitted *after* the corresponding store write committed
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "parts.stock_adjusted").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the change occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
