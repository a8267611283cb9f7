//! # Domain Types
//!
//! Core domain types used throughout PriceRight.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐         ┌──────────────────────┐             │
//! │  │ PersistedCalculator  │         │  InventorySnapshot   │             │
//! │  │ State                │         │  (Vec<InventoryItem>)│             │
//! │  │  ─────────────────   │  save   │  ─────────────────   │             │
//! │  │  values (USD)        │ ──────► │  id (i64, increasing)│             │
//! │  │  currency (display)  │  copy   │  name                │             │
//! │  │                      │         │  totalCost  (USD)    │             │
//! │  │  key: priceRight     │         │  profitAmount (USD)  │             │
//! │  │   CalculatorState    │         │  finalPrice (USD)    │             │
//! │  └──────────────────────┘         │  key: priceRight     │             │
//! │                                   │   Inventory          │             │
//! │                                   └──────────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Value Copies, Not References
//! A saved `InventoryItem` is a snapshot of the session's base-currency
//! pricing at save time. Later edits to the calculator never reach it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::currency::CurrencyCode;
use crate::error::{CoreError, ValidationError};
use crate::pricing::{CostLineItems, PricingResult};
use crate::validation::{validate_amount, validate_item_name};
use crate::{CALCULATOR_STATE_KEY, INVENTORY_STATE_KEY};

// =============================================================================
// Persisted Blob Contract
// =============================================================================

/// A value stored as one JSON blob under a fixed key.
///
/// `check` runs after deserialization; a failure means the stored blob is
/// schema-mismatched and gets quarantined like malformed JSON would.
pub trait Persisted: Serialize + DeserializeOwned {
    /// Storage key of this blob.
    const KEY: &'static str;

    /// Schema validation beyond what serde enforces.
    fn check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

// =============================================================================
// Calculator Values
// =============================================================================

/// Current form values of the calculator.
///
/// Every field falls back to its zero value when absent from stored JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct CalculatorValues {
    pub item_name: String,
    pub base_cost: f64,
    pub packaging: f64,
    pub local_shipping: f64,
    pub overseas_shipment: f64,
    pub customs: f64,
    /// Percentage, e.g. 25.0 for 25 %.
    pub profit_margin: f64,
}

impl CalculatorValues {
    /// The values a fresh or reset calculator starts with.
    pub fn initial() -> Self {
        CalculatorValues {
            item_name: String::new(),
            base_cost: 100.0,
            packaging: 5.0,
            local_shipping: 10.0,
            overseas_shipment: 20.0,
            customs: 15.0,
            profit_margin: 25.0,
        }
    }

    /// The cost portion of the form.
    pub fn line_items(&self) -> CostLineItems {
        CostLineItems {
            base_cost: self.base_cost,
            packaging: self.packaging,
            local_shipping: self.local_shipping,
            overseas_shipment: self.overseas_shipment,
            customs: self.customs,
            profit_margin: self.profit_margin,
        }
    }

    /// Mutable access to a numeric field; `None` for `ItemName`.
    pub fn amount_mut(&mut self, field: CalculatorField) -> Option<&mut f64> {
        match field {
            CalculatorField::ItemName => None,
            CalculatorField::BaseCost => Some(&mut self.base_cost),
            CalculatorField::Packaging => Some(&mut self.packaging),
            CalculatorField::LocalShipping => Some(&mut self.local_shipping),
            CalculatorField::OverseasShipment => Some(&mut self.overseas_shipment),
            CalculatorField::Customs => Some(&mut self.customs),
            CalculatorField::ProfitMargin => Some(&mut self.profit_margin),
        }
    }
}

/// One editable calculator field, named as in the stored JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum CalculatorField {
    ItemName,
    BaseCost,
    Packaging,
    LocalShipping,
    OverseasShipment,
    Customs,
    ProfitMargin,
}

impl CalculatorField {
    pub const ALL: [CalculatorField; 7] = [
        CalculatorField::ItemName,
        CalculatorField::BaseCost,
        CalculatorField::Packaging,
        CalculatorField::LocalShipping,
        CalculatorField::OverseasShipment,
        CalculatorField::Customs,
        CalculatorField::ProfitMargin,
    ];

    /// JSON / command name of the field.
    pub fn name(&self) -> &'static str {
        match self {
            CalculatorField::ItemName => "itemName",
            CalculatorField::BaseCost => "baseCost",
            CalculatorField::Packaging => "packaging",
            CalculatorField::LocalShipping => "localShipping",
            CalculatorField::OverseasShipment => "overseasShipment",
            CalculatorField::Customs => "customs",
            CalculatorField::ProfitMargin => "profitMargin",
        }
    }
}

impl fmt::Display for CalculatorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CalculatorField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalculatorField::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "field".to_string(),
                allowed: CalculatorField::ALL.iter().map(|f| f.name().to_string()).collect(),
            })
    }
}

// =============================================================================
// Persisted Calculator State
// =============================================================================

/// Everything the calculator session persists: form values plus display currency.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PersistedCalculatorState {
    #[serde(default)]
    pub values: CalculatorValues,
    #[serde(default)]
    pub currency: CurrencyCode,
}

impl Persisted for PersistedCalculatorState {
    const KEY: &'static str = CALCULATOR_STATE_KEY;

    /// Stored amounts must be non-negative; the session never writes anything else.
    fn check(&self) -> Result<(), CoreError> {
        let v = &self.values;
        validate_amount("baseCost", v.base_cost)?;
        validate_amount("packaging", v.packaging)?;
        validate_amount("localShipping", v.local_shipping)?;
        validate_amount("overseasShipment", v.overseas_shipment)?;
        validate_amount("customs", v.customs)?;
        validate_amount("profitMargin", v.profit_margin)?;
        Ok(())
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A priced item saved from the calculator. All amounts in base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryItem {
    /// Strictly increasing identifier (millisecond-derived).
    pub id: i64,
    pub name: String,
    pub total_cost: f64,
    pub profit_amount: f64,
    pub final_price: f64,
}

impl InventoryItem {
    /// Snapshots a base-currency pricing result under `name`.
    pub fn new(id: i64, name: impl Into<String>, pricing: &PricingResult) -> Self {
        InventoryItem {
            id,
            name: name.into(),
            total_cost: pricing.total_cost,
            profit_amount: pricing.profit_amount,
            final_price: pricing.final_price,
        }
    }

    /// Checks name, sign of amounts and `finalPrice = totalCost + profitAmount`.
    pub fn check(&self) -> Result<(), CoreError> {
        validate_item_name(&self.name)?;
        validate_amount("totalCost", self.total_cost)?;
        validate_amount("profitAmount", self.profit_amount)?;
        validate_amount("finalPrice", self.final_price)?;

        let expected = self.total_cost + self.profit_amount;
        let tolerance = 1e-6 * expected.abs().max(1.0);
        if (self.final_price - expected).abs() > tolerance {
            return Err(CoreError::InconsistentItem { id: self.id });
        }
        Ok(())
    }
}

/// The inventory ledger's persisted form: the ordered item list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventorySnapshot(pub Vec<InventoryItem>);

impl Persisted for InventorySnapshot {
    const KEY: &'static str = INVENTORY_STATE_KEY;

    fn check(&self) -> Result<(), CoreError> {
        self.0.iter().try_for_each(InventoryItem::check)
    }
}

// =============================================================================
// Inventory Summary
// =============================================================================

/// Aggregate totals over a ledger. Derived on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventorySummary {
    pub total_cost: f64,
    pub total_profit: f64,
    pub total_revenue: f64,
}

impl InventorySummary {
    /// Sums cost, profit and price over `items`.
    pub fn from_items(items: &[InventoryItem]) -> Self {
        items.iter().fold(InventorySummary::default(), |acc, item| InventorySummary {
            total_cost: acc.total_cost + item.total_cost,
            total_profit: acc.total_profit + item.profit_amount,
            total_revenue: acc.total_revenue + item.final_price,
        })
    }
}

// =============================================================================
// Margin Suggestion
// =============================================================================

/// Output of the margin advisor collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MarginSuggestion {
    /// Suggested margin as a fraction (0.15 = 15 %).
    pub profit_margin: f64,
    /// Free-text rationale.
    pub reasoning: String,
}

impl MarginSuggestion {
    /// The suggestion in percentage units, rounded to two decimals.
    ///
    /// ## Example
    /// ```rust
    /// use priceright_core::MarginSuggestion;
    ///
    /// let s = MarginSuggestion { profit_margin: 0.18, reasoning: String::new() };
    /// assert_eq!(s.percent(), 18.0);
    /// ```
    pub fn percent(&self) -> f64 {
        (self.profit_margin * 100.0 * 100.0).round() / 100.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
