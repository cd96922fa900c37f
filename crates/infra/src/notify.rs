//! Best-effort change notification publishing.
//!
//! Notifications go out after a store write committed. The store is
//! authoritative; a failed serialization or publish is logged and swallowed
//! so the write path never depends on subscriber health.

use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use lotledger_events::{Event, EventBus, EventEnvelope};

pub(crate) fn publish_event<B, E>(bus: &B, subject_id: Uuid, sequence_number: u64, event: &E)
where
    B: EventBus<EventEnvelope<JsonValue>>,
    E: Event + Serialize,
{
    let subject_type = event.event_type();
    let payload = match serde_json::to_value(event) {
        Ok(payload) => payload,
        Err(error) => {
            tracing::warn!(%subject_id, subject_type, %error, "failed to serialize notification");
            return;
        }
    };
    let envelope = EventEnvelope::new(
        Uuid::now_v7(),
        subject_id,
        subject_type,
        sequence_number,
        payload,
    );
    if let Err(error) = bus.publish(envelope) {
        tracing::warn!(%subject_id, subject_type, ?error, "failed to publish notification");
    }
}
