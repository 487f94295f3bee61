//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Registries key their records by `id()`, so an entity's identifier must stay
/// stable for as long as it is stored.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
