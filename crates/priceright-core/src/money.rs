//! # Money Module
//!
//! Integer minor-unit money for the places where fractions must stop:
//! checkout `unit_amount` and formatted display strings.
//!
//! ## Where Floats End
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cost fields, margins, PricingResult ... f64 (user-entered decimals)   │
//! │                                │                                        │
//! │                                ▼                                        │
//! │                  Money::from_amount(x) = round(x × 100)                 │
//! │                                │                                        │
//! │            ┌───────────────────┴───────────────────┐                    │
//! │            ▼                                       ▼                    │
//! │   Checkout unit_amount (i64 cents)        "$187.50" display text       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use priceright_core::money::Money;
//!
//! let price = Money::from_amount(187.5);
//! assert_eq!(price.cents(), 18750);
//! assert_eq!(price.to_string(), "$187.50");
//! assert_eq!(price.format_with("€"), "€187.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// A monetary value in the smallest currency unit (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount to cents: `round(amount × 100)`, halves
    /// away from zero.
    ///
    /// The product is rounded as the float it is, so an amount stored just
    /// below a half cent (1.005 is 1.00499..) rounds down. Non-finite input
    /// becomes zero.
    ///
    /// ## Example
    /// ```rust
    /// use priceright_core::money::Money;
    ///
    /// assert_eq!(Money::from_amount(187.5).cents(), 18750);
    /// assert_eq!(Money::from_amount(1.005).cents(), 100);
    /// assert_eq!(Money::from_amount(f64::NAN).cents(), 0);
    /// ```
    pub fn from_amount(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        Money((amount * 100.0).round() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Formats with an arbitrary currency symbol, e.g. `"£12.34"`.
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders in the base currency, e.g. `$12.34`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with("$"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_amount_rounds_to_cents() {
        assert_eq!(Money::from_amount(187.5).cents(), 18750);
        assert_eq!(Money::from_amount(0.014).cents(), 1);
        assert_eq!(Money::from_amount(0.5).cents(), 50);
        assert_eq!(Money::from_amount(0.125).cents(), 13);
        assert_eq!(Money::from_amount(1.005).cents(), 100);
        assert_eq!(Money::from_amount(19.999).cents(), 2000);
        assert_eq!(Money::from_amount(0.0).cents(), 0);
    }

    #[test]
    fn test_from_amount_non_finite() {
        assert!(Money::from_amount(f64::INFINITY).is_zero());
        assert!(Money::from_amount(f64::NAN).is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_cents(17250).format_with("€"), "€172.50");
        assert_eq!(Money::from_cents(7).format_with("C$"), "C$0.07");
    }
}
