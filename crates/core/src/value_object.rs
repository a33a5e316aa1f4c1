//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects carry no identity and are compared by their attribute values.
/// Read-only views handed out by the domain (card snapshots, display settings)
/// implement this so they can be cloned and compared freely by callers.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct DisplaySettings {
///     currency: String,
/// }
///
/// impl ValueObject for DisplaySettings {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
