//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are replaced wholesale rather than
/// mutated (e.g. a restaurant's address).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
