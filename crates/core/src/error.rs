//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every failure the card core can report. The interactive shell renders these
/// as text and re-prompts; nothing here is retried automatically.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field value failed validation (empty text, negative number, bad date).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The operation is not allowed in the card's current lifecycle status.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// No card is registered under the requested identifier.
    #[error("card {0} not found")]
    NotFound(String),

    /// A card with the same identifier is already registered.
    #[error("card {0} already exists")]
    Duplicate(String),

    /// The operator declined a confirmation step.
    #[error("cancelled: {0}")]
    Cancelled(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::Duplicate(id.into())
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_identifier() {
        assert_eq!(DomainError::not_found("A1").to_string(), "card A1 not found");
        assert_eq!(
            DomainError::duplicate("A1").to_string(),
            "card A1 already exists"
        );
    }

    #[test]
    fn constructors_pick_matching_variant() {
        assert!(matches!(
            DomainError::validation("x"),
            DomainError::Validation(m) if m == "x"
        ));
        assert!(matches!(
            DomainError::invalid_state("x"),
            DomainError::InvalidState(_)
        ));
        assert!(matches!(DomainError::cancelled("x"), DomainError::Cancelled(_)));
    }
}
