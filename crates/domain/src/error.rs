//! Error types for the domain layer
//!
//! `DomainError` covers construction of value types (ids, descriptors).
//! `LedgerError` covers the storage rules a ring enforces; every variant
//! carries what a UI needs to show a specific message.

use thiserror::Error;

/// Unified error type for domain value construction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for SlotKind {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "pact" => Ok(Self::Pact),
    ///             _ => Err(DomainError::parse(format!("Unknown slot kind: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// Violations of the ring's storage rules.
///
/// A ledger operation that returns one of these leaves the ledger unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Requested level is below the spell's base level or above the ring's
    /// ceiling. `min == 0` marks a cantrip, which has no slot to store.
    #[error("Invalid level {requested}: {}", allowed_levels(.min, .max))]
    InvalidLevel { requested: u8, min: u8, max: u8 },

    /// Storing would exceed the ring's level budget
    #[error("Insufficient capacity: {required} levels required, {available} available")]
    InsufficientCapacity { required: u32, available: u32 },

    /// No entry at the given index
    #[error("No stored spell at index {index} (ring holds {len})")]
    NotFound { index: usize, len: usize },

    /// The document revision cannot advance any further
    #[error("Ring revision {revision} cannot be advanced")]
    RevisionExhausted { revision: u64 },
}

fn allowed_levels(min: &u8, max: &u8) -> String {
    let (min, max) = (*min, *max);
    if min == 0 {
        "cantrips cannot be stored".to_string()
    } else if min > max {
        format!("a level {min} spell is above the ring's limit of level {max}")
    } else {
        format!("must be between {min} and {max}")
    }
}

impl LedgerError {
    pub fn invalid_level(requested: u8, min: u8, max: u8) -> Self {
        Self::InvalidLevel {
            requested,
            min,
            max,
        }
    }

    pub fn insufficient_capacity(required: u32, available: u32) -> Self {
        Self::InsufficientCapacity {
            required,
            available,
        }
    }

    pub fn not_found(index: usize, len: usize) -> Self {
        Self::NotFound { index, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("spell name cannot be empty");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: spell name cannot be empty");
    }

    #[test]
    fn test_insufficient_capacity_message() {
        let err = LedgerError::insufficient_capacity(3, 1);
        assert_eq!(
            err.to_string(),
            "Insufficient capacity: 3 levels required, 1 available"
        );
    }

    #[test]
    fn test_invalid_level_message() {
        let err = LedgerError::invalid_level(2, 3, 5);
        assert_eq!(err.to_string(), "Invalid level 2: must be between 3 and 5");
    }

    #[test]
    fn test_invalid_level_message_for_unstorable_spells() {
        assert_eq!(
            LedgerError::invalid_level(6, 6, 5).to_string(),
            "Invalid level 6: a level 6 spell is above the ring's limit of level 5"
        );
        assert_eq!(
            LedgerError::invalid_level(1, 0, 5).to_string(),
            "Invalid level 1: cantrips cannot be stored"
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = LedgerError::not_found(4, 2);
        assert!(matches!(err, LedgerError::NotFound { index: 4, len: 2 }));
        assert!(err.to_string().contains("index 4"));
    }
}
