//! # Error Types
//!
//! Domain-specific error types for priceright-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  priceright-core errors (this file)                                    │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  priceright-store errors (separate crate)                              │
//! │  └── StoreError       - Storage failures (never corrupt blobs)         │
//! │                                                                         │
//! │  App errors                                                            │
//! │  ├── CollaboratorError - AI advisor / checkout gateway failures        │
//! │  └── ApiError          - What a command caller sees (serialized)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A corrupt persisted blob is NOT an error anywhere in this hierarchy: the
//! store quarantines it and reports "no saved state".

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout was requested for an empty inventory.
    #[error("Cannot check out an empty inventory")]
    EmptyCheckout,

    /// An inventory item carries amounts that violate
    /// `finalPrice = totalCost + profitAmount` or are negative.
    #[error("Inventory item {id} has inconsistent amounts")]
    InconsistentItem { id: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Each variant names the offending field so callers can render a
/// field-level message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is negative, NaN or infinite.
    #[error("{field} must be a non-negative number")]
    NotNonNegative { field: String },

    /// Text that does not parse as a finite number.
    #[error("{field} must be a number")]
    NotANumber { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Returns the name of the field this error is about.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::NotNonNegative { field }
            | ValidationError::NotANumber { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "itemName".to_string(),
        };
        assert_eq!(err.to_string(), "itemName is required");

        let err = ValidationError::TooShort {
            field: "productCategory".to_string(),
            min: 3,
        };
        assert_eq!(
            err.to_string(),
            "productCategory must be at least 3 characters"
        );
    }

    #[test]
    fn test_validation_error_field() {
        let err = ValidationError::NotNonNegative {
            field: "customs".to_string(),
        };
        assert_eq!(err.field(), "customs");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "itemName".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_core_error_messages() {
        assert_eq!(
            CoreError::EmptyCheckout.to_string(),
            "Cannot check out an empty inventory"
        );
    }
}
