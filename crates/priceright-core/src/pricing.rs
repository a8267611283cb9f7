//! # Cost Aggregator
//!
//! Turns itemized costs plus a margin into `{totalCost, profitAmount, finalPrice}`.
//!
//! ## Margin-on-Cost
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  baseCost + packaging + localShipping + overseasShipment + customs     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  totalCost ────────────┬──────────────────────────────┐                │
//! │                        │                              │                │
//! │                        ▼                              ▼                │
//! │        profitAmount = totalCost × margin / 100   finalPrice =          │
//! │        (markup on COST, not on revenue)          totalCost + profit    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Example: costs summing to 150 at 25 % → profit 37.5, price 187.5.
//! A "25 % margin on revenue" would instead give 200; that is not what this
//! module computes.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::currency::{rate_of, CurrencyCode};
use crate::money::Money;

/// Clamps a raw amount: negative, NaN and infinite values contribute 0.
#[inline]
pub fn clamp_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parses a form-style numeric input.
///
/// Mirrors how a number field behaves: unparseable text is 0, negatives
/// are clamped to 0. Never fails.
///
/// ## Example
/// ```rust
/// use priceright_core::pricing::parse_amount;
///
/// assert_eq!(parse_amount("12.5"), 12.5);
/// assert_eq!(parse_amount("abc"), 0.0);
/// assert_eq!(parse_amount("-4"), 0.0);
/// ```
pub fn parse_amount(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map(clamp_amount).unwrap_or(0.0)
}

// =============================================================================
// Cost Line Items
// =============================================================================

/// Itemized costs and the desired margin, all in the base currency.
///
/// `profit_margin` is a percentage (25.0 = 25 %).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct CostLineItems {
    pub base_cost: f64,
    pub packaging: f64,
    pub local_shipping: f64,
    pub overseas_shipment: f64,
    pub customs: f64,
    pub profit_margin: f64,
}

impl CostLineItems {
    /// Returns a copy with every field clamped by [`clamp_amount`].
    pub fn sanitized(&self) -> Self {
        CostLineItems {
            base_cost: clamp_amount(self.base_cost),
            packaging: clamp_amount(self.packaging),
            local_shipping: clamp_amount(self.local_shipping),
            overseas_shipment: clamp_amount(self.overseas_shipment),
            customs: clamp_amount(self.customs),
            profit_margin: clamp_amount(self.profit_margin),
        }
    }

    /// Sum of the five cost fields (margin excluded).
    pub fn total_cost(&self) -> f64 {
        self.base_cost + self.packaging + self.local_shipping + self.overseas_shipment + self.customs
    }
}

// =============================================================================
// Pricing Result
// =============================================================================

/// Derived pricing. Never stored on its own; always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricingResult {
    pub total_cost: f64,
    pub profit_amount: f64,
    pub final_price: f64,
}

impl PricingResult {
    /// Multiplies every component by `rate`.
    pub fn scaled(&self, rate: f64) -> Self {
        PricingResult {
            total_cost: self.total_cost * rate,
            profit_amount: self.profit_amount * rate,
            final_price: self.final_price * rate,
        }
    }

    /// The three components rounded to minor units.
    pub fn to_money(&self) -> (Money, Money, Money) {
        (
            Money::from_amount(self.total_cost),
            Money::from_amount(self.profit_amount),
            Money::from_amount(self.final_price),
        )
    }
}

/// Computes the base-currency pricing for a set of line items.
///
/// Pure: identical input always gives identical output. Negative or
/// non-finite fields contribute 0.
pub fn aggregate(items: &CostLineItems) -> PricingResult {
    let items = items.sanitized();
    let total_cost = items.total_cost();
    let profit_amount = total_cost * (items.profit_margin / 100.0);

    PricingResult {
        total_cost,
        profit_amount,
        final_price: total_cost + profit_amount,
    }
}

/// [`aggregate`] scaled into a display currency.
///
/// Display values are for rendering only; persist the unscaled result.
pub fn display_aggregate(items: &CostLineItems, code: CurrencyCode) -> PricingResult {
    aggregate(items).scaled(rate_of(code))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn default_items() -> CostLineItems {
        CostLineItems {
            base_cost: 100.0,
            packaging: 5.0,
            local_shipping: 10.0,
            overseas_shipment: 20.0,
            customs: 15.0,
            profit_margin: 25.0,
        }
    }

    #[test]
    fn test_default_scenario() {
        let result = aggregate(&default_items());
        assert_eq!(result.total_cost, 150.0);
        assert_eq!(result.profit_amount, 37.5);
        assert_eq!(result.final_price, 187.5);
    }

    #[test]
    fn test_all_zero_is_zero() {
        let result = aggregate(&CostLineItems::default());
        assert_eq!(result, PricingResult::default());
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let items = CostLineItems {
            base_cost: 12.34,
            packaging: 0.99,
            local_shipping: 3.5,
            overseas_shipment: 17.25,
            customs: 2.1,
            profit_margin: 33.3,
        };
        assert_eq!(aggregate(&items), aggregate(&items));
    }

    #[test]
    fn test_final_price_is_cost_plus_profit() {
        let samples = [
            default_items(),
            CostLineItems { base_cost: 0.1, packaging: 0.2, profit_margin: 7.0, ..Default::default() },
            CostLineItems { customs: 1e6, profit_margin: 0.0, ..Default::default() },
            CostLineItems { overseas_shipment: 42.42, profit_margin: 250.0, ..Default::default() },
        ];
        for items in samples {
            let r = aggregate(&items);
            assert_eq!(r.final_price, r.total_cost + r.profit_amount);
        }
    }

    #[test]
    fn test_margin_is_on_cost_not_revenue() {
        let items = CostLineItems { base_cost: 100.0, profit_margin: 50.0, ..Default::default() };
        let r = aggregate(&items);
        assert_eq!(r.profit_amount, 50.0);
        assert_eq!(r.final_price, 150.0);
    }

    #[test]
    fn test_negative_and_nan_fields_contribute_zero() {
        let items = CostLineItems {
            base_cost: 100.0,
            packaging: -5.0,
            local_shipping: f64::NAN,
            overseas_shipment: f64::INFINITY,
            customs: 0.0,
            profit_margin: -10.0,
        };
        let r = aggregate(&items);
        assert_eq!(r.total_cost, 100.0);
        assert_eq!(r.profit_amount, 0.0);
        assert_eq!(r.final_price, 100.0);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("  7.25 "), 7.25);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("twelve"), 0.0);
        assert_eq!(parse_amount("-1"), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
    }

    #[test]
    fn test_display_conversion_round_trips() {
        let items = default_items();
        let base = aggregate(&items);
        for code in CurrencyCode::ALL {
            let rate = rate_of(code);
            let back = display_aggregate(&items, code).scaled(1.0 / rate);
            assert!((back.total_cost - base.total_cost).abs() < 1e-9, "{code}");
            assert!((back.profit_amount - base.profit_amount).abs() < 1e-9, "{code}");
            assert!((back.final_price - base.final_price).abs() < 1e-9, "{code}");
        }
    }

    #[test]
    fn test_display_in_base_currency_is_unchanged() {
        let items = default_items();
        assert_eq!(display_aggregate(&items, CurrencyCode::BASE), aggregate(&items));
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let items: CostLineItems = serde_json::from_str(r#"{"baseCost": 40}"#).unwrap();
        assert_eq!(items.base_cost, 40.0);
        assert_eq!(items.customs, 0.0);
        assert_eq!(items.profit_margin, 0.0);
    }

    #[test]
    fn test_to_money() {
        let (cost, profit, price) = aggregate(&default_items()).to_money();
        assert_eq!(cost.cents(), 15000);
        assert_eq!(profit.cents(), 3750);
        assert_eq!(price.cents(), 18750);
    }
}
