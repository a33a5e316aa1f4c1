//! Aggregate root trait for domain models that own a lifecycle.

/// Aggregate root marker + minimal interface.
///
/// Kept intentionally small: an identity plus a monotonically increasing
/// version that counts successful operations. A failed operation leaves the
/// version alone even if it applied part of its changes.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Incremented once per successful lifecycle operation; never by a
    /// rejected one.
    fn version(&self) -> u64;
}
