//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity - they are defined entirely by their
/// attribute values and are immutable once constructed. An `Allocation` line
/// or a unit-price snapshot is a value object; a `Part` is an entity.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
