//! Entity trait: identity that survives state changes.

/// Entity marker + minimal interface.
///
/// Two entities are the same entity when their ids are equal, whatever
/// their other fields hold.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    fn same_identity_as(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
