//! # Validation Module
//!
//! Input validation for PriceRight.
//!
//! ## What Gets Validated Where
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Cost fields (setField)                                                │
//! │  └── never rejected: clamped to 0 by pricing::parse_amount             │
//! │                                                                         │
//! │  Save to inventory                                                     │
//! │  └── validate_item_name  → ValidationError, state unchanged            │
//! │                                                                         │
//! │  Margin advisor                                                        │
//! │  ├── validate_product_category (request side)                          │
//! │  └── validate_margin_suggestion (response side → malformed output)     │
//! │                                                                         │
//! │  Persisted blobs                                                       │
//! │  └── validate_amount inside Persisted::check → quarantine on failure   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::MarginSuggestion;
use crate::{MAX_ITEM_NAME_LEN, MIN_CATEGORY_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Upper bound of a suggested margin fraction (10.0 = 1000 %).
pub const MAX_SUGGESTED_MARGIN: f64 = 10.0;

const MAX_CATEGORY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an inventory item name.
///
/// ## Rules
/// - At least 1 non-whitespace character
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use priceright_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Ceramic mug").is_ok());
/// assert!(validate_item_name("").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "itemName".to_string(),
        });
    }

    if name.chars().count() > MAX_ITEM_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "itemName".to_string(),
            max: MAX_ITEM_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates the product category sent to the margin advisor.
///
/// ## Returns
/// The trimmed category.
pub fn validate_product_category(category: &str) -> ValidationResult<String> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "productCategory".to_string(),
        });
    }

    let len = category.chars().count();
    if len < MIN_CATEGORY_LEN {
        return Err(ValidationError::TooShort {
            field: "productCategory".to_string(),
            min: MIN_CATEGORY_LEN,
        });
    }

    if len > MAX_CATEGORY_LEN {
        return Err(ValidationError::TooLong {
            field: "productCategory".to_string(),
            max: MAX_CATEGORY_LEN,
        });
    }

    Ok(category.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stored amount: finite and non-negative.
pub fn validate_amount(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::NotNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates the shape of an advisor's answer.
///
/// ## Rules
/// - `profitMargin` is a finite fraction in `0.0..=10.0`
pub fn validate_margin_suggestion(suggestion: &MarginSuggestion) -> ValidationResult<()> {
    let m = suggestion.profit_margin;
    if !m.is_finite() || !(0.0..=MAX_SUGGESTED_MARGIN).contains(&m) {
        return Err(ValidationError::OutOfRange {
            field: "profitMargin".to_string(),
            min: 0.0,
            max: MAX_SUGGESTED_MARGIN,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("A").is_ok());
        assert!(validate_item_name("Handmade candle").is_ok());

        let err = validate_item_name("").unwrap_err();
        assert_eq!(err.field(), "itemName");
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_product_category() {
        assert_eq!(validate_product_category("  toys ").unwrap(), "toys");
        assert!(matches!(
            validate_product_category("tv"),
            Err(ValidationError::TooShort { min: 3, .. })
        ));
        assert!(matches!(
            validate_product_category(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_product_category(&"y".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("customs", 0.0).is_ok());
        assert!(validate_amount("customs", 12.5).is_ok());
        assert!(validate_amount("customs", -0.01).is_err());
        assert!(validate_amount("customs", f64::NAN).is_err());
        assert!(validate_amount("customs", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_margin_suggestion() {
        let ok = MarginSuggestion { profit_margin: 0.15, reasoning: "ok".into() };
        assert!(validate_margin_suggestion(&ok).is_ok());

        let negative = MarginSuggestion { profit_margin: -0.2, reasoning: String::new() };
        assert!(validate_margin_suggestion(&negative).is_err());

        let absurd = MarginSuggestion { profit_margin: 15.0, reasoning: String::new() };
        assert!(validate_margin_suggestion(&absurd).is_err());

        let nan = MarginSuggestion { profit_margin: f64::NAN, reasoning: String::new() };
        assert!(validate_margin_suggestion(&nan).is_err());
    }
}
