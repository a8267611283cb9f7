//! # Checkout Mapping
//!
//! Builds the payload handed to the external checkout collaborator.
//!
//! ## Line-Item Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InventoryItem                      CheckoutLineItem                   │
//! │  ─────────────                      ────────────────                   │
//! │  name            ─────────────────► name                               │
//! │  finalPrice      ── round(×100) ──► unit_amount (i64 minor units)      │
//! │  totalCost    ┐                                                        │
//! │  profitAmount ┴── formatted ──────► description                        │
//! │                                     currency = "usd"                   │
//! │                                     quantity = 1                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts go out in the base currency regardless of the display currency.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::currency::CurrencyCode;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::InventoryItem;

/// One line of a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutLineItem {
    pub name: String,
    pub description: String,
    /// Unit price in minor units of `currency`.
    pub unit_amount: i64,
    /// Lower-case ISO code, always the base currency.
    pub currency: String,
    pub quantity: u32,
}

impl CheckoutLineItem {
    /// Maps one saved item.
    pub fn from_item(item: &InventoryItem) -> Self {
        CheckoutLineItem {
            name: item.name.clone(),
            description: format!(
                "Total cost: {}, Profit: {}",
                Money::from_amount(item.total_cost),
                Money::from_amount(item.profit_amount)
            ),
            unit_amount: Money::from_amount(item.final_price).cents(),
            currency: CurrencyCode::BASE.code().to_ascii_lowercase(),
            quantity: 1,
        }
    }
}

/// Maps a whole ledger, preserving order.
pub fn line_items(items: &[InventoryItem]) -> Vec<CheckoutLineItem> {
    items.iter().map(CheckoutLineItem::from_item).collect()
}

/// Everything the checkout collaborator needs to open a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutRequest {
    pub line_items: Vec<CheckoutLineItem>,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutRequest {
    /// Builds a request for `items`, returning the buyer to `app_url` afterwards.
    ///
    /// Every item is re-checked so the collaborator never receives negative or
    /// inconsistent amounts.
    ///
    /// ## Example
    /// ```rust
    /// use priceright_core::checkout::CheckoutRequest;
    /// use priceright_core::InventoryItem;
    ///
    /// let item = InventoryItem {
    ///     id: 1,
    ///     name: "Lamp".into(),
    ///     total_cost: 150.0,
    ///     profit_amount: 37.5,
    ///     final_price: 187.5,
    /// };
    /// let req = CheckoutRequest::build(&[item], "http://localhost:9002/").unwrap();
    /// assert_eq!(req.line_items[0].unit_amount, 18750);
    /// assert_eq!(req.success_url, "http://localhost:9002/?payment_success=true");
    /// ```
    pub fn build(items: &[InventoryItem], app_url: &str) -> CoreResult<Self> {
        if items.is_empty() {
            return Err(CoreError::EmptyCheckout);
        }
        items.iter().try_for_each(InventoryItem::check)?;

        let origin = app_url.trim().trim_end_matches('/');
        Ok(CheckoutRequest {
            line_items: line_items(items),
            success_url: format!("{origin}/?payment_success=true"),
            cancel_url: format!("{origin}/?payment_cancelled=true"),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, name: &str, cost: f64, profit: f64) -> InventoryItem {
        InventoryItem {
            id,
            name: name.to_string(),
            total_cost: cost,
            profit_amount: profit,
            final_price: cost + profit,
        }
    }

    #[test]
    fn test_line_item_mapping() {
        let line = CheckoutLineItem::from_item(&item(1, "Teapot", 150.0, 37.5));
        assert_eq!(line.name, "Teapot");
        assert_eq!(line.unit_amount, 18750);
        assert_eq!(line.quantity, 1);
        assert_eq!(line.currency, "usd");
        assert_eq!(line.description, "Total cost: $150.00, Profit: $37.50");
    }

    #[test]
    fn test_unit_amount_rounds() {
        let line = CheckoutLineItem::from_item(&item(1, "Pen", 1.0, 0.336));
        assert_eq!(line.unit_amount, 134);
    }

    #[test]
    fn test_unit_amount_is_plain_round_of_cents() {
        for price in [1.005, 10.005, 0.285, 187.5, 2.675] {
            let line = CheckoutLineItem::from_item(&item(1, "Clip", price, 0.0));
            assert_eq!(line.unit_amount, (price * 100.0).round() as i64, "price {price}");
        }
        assert_eq!(CheckoutLineItem::from_item(&item(1, "Clip", 1.005, 0.0)).unit_amount, 100);
    }

    #[test]
    fn test_order_preserved() {
        let items = vec![item(1, "A", 1.0, 0.0), item(2, "B", 2.0, 0.0), item(3, "C", 3.0, 0.0)];
        let names: Vec<_> = line_items(&items).into_iter().map(|l| l.name).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn test_empty_checkout_rejected() {
        assert!(matches!(
            CheckoutRequest::build(&[], "http://localhost"),
            Err(CoreError::EmptyCheckout)
        ));
    }

    #[test]
    fn test_inconsistent_item_rejected() {
        let mut bad = item(9, "Odd", 10.0, 1.0);
        bad.final_price = 5.0;
        assert!(matches!(
            CheckoutRequest::build(&[bad], "http://localhost"),
            Err(CoreError::InconsistentItem { id: 9 })
        ));
    }

    #[test]
    fn test_redirect_urls() {
        let req = CheckoutRequest::build(&[item(1, "A", 1.0, 0.5)], "https://shop.example").unwrap();
        assert_eq!(req.success_url, "https://shop.example/?payment_success=true");
        assert_eq!(req.cancel_url, "https://shop.example/?payment_cancelled=true");
    }
}
