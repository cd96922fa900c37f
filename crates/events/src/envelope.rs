use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope for a published notification, carrying subject metadata.
///
/// Subscribers (dashboards, reorder alerts, exports) receive envelopes and
/// deserialize the payload by `subject_type`. The envelope is the unit pushed
/// on the change-notification channel after a store write commits.
///
/// Notes:
/// - `sequence_number` is monotonically increasing per subject, so consumers
///   can drop duplicates and detect gaps.
/// - `payload` is the domain-agnostic event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,

    subject_id: Uuid,
    subject_type: String,

    /// Monotonically increasing position in the subject's change stream.
    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        subject_id: Uuid,
        subject_type: impl Into<String>,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            subject_id,
            subject_type: subject_type.into(),
            sequence_number,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn subject_id(&self) -> Uuid {
        self.subject_id
    }

    pub fn subject_type(&self) -> &str {
        &self.subject_type
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
