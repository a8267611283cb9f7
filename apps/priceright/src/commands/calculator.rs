//! # Calculator Commands
//!
//! Commands that read or edit the calculator session.
//!
//! ## Calculator Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Pricing an Item                                      │
//! │                                                                         │
//! │  set baseCost 80 ──► set customs 12 ──► suggest ceramics ──► apply      │
//! │        │                   │                   │               │        │
//! │        ▼                   ▼                   ▼               ▼        │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  CalculatorView  (values, edit state, base + display pricing)    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  currency EUR ──► display only, base pricing unchanged                 │
//! │  set itemName Teapot ──► save ──► item appended, calculator reset      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use priceright_core::{
    CalculatorField, CalculatorValues, CurrencyCode, InventoryItem, MarginSuggestion,
    PricingResult, ValidationError,
};

use crate::collaborators::{request_margin_suggestion, MarginAdvisor};
use crate::error::ApiError;
use crate::state::{CalculatorSession, DisplayPricing, EditState, InventoryLedger};

/// Pricing amounts rendered with the display currency symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedPricing {
    pub total_cost: String,
    pub profit_amount: String,
    pub final_price: String,
}

impl From<&DisplayPricing> for FormattedPricing {
    fn from(display: &DisplayPricing) -> Self {
        let (cost, profit, price) = display.result.to_money();
        FormattedPricing {
            total_cost: cost.format_with(display.symbol),
            profit_amount: profit.format_with(display.symbol),
            final_price: price.format_with(display.symbol),
        }
    }
}

/// Everything a client needs to render the calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorView {
    pub values: CalculatorValues,
    pub edit_state: EditState,
    /// Base-currency result; this is what `save` snapshots.
    pub base: PricingResult,
    pub display: DisplayPricing,
    pub formatted: FormattedPricing,
}

impl From<&CalculatorSession> for CalculatorView {
    fn from(session: &CalculatorSession) -> Self {
        let display = session.display_pricing();
        CalculatorView {
            values: session.values().clone(),
            edit_state: session.edit_state(),
            base: session.pricing(),
            formatted: FormattedPricing::from(&display),
            display,
        }
    }
}

/// Reply to `suggest`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub suggestion: MarginSuggestion,
    /// The margin `apply` would set, in percent.
    pub percent: f64,
}

/// Reply to `save`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItemResponse {
    pub item: InventoryItem,
    pub inventory_count: usize,
    pub calculator: CalculatorView,
}

/// `show`
pub fn show(session: &CalculatorSession) -> CalculatorView {
    debug!("show command");
    CalculatorView::from(session)
}

/// `set <field> <value>`
///
/// Numeric fields take any text; unparseable or negative input becomes 0.
pub fn set_field(session: &mut CalculatorSession, field: CalculatorField, value: &str) -> CalculatorView {
    debug!(field = %field, "set command");
    session.set_field(field, value);
    CalculatorView::from(&*session)
}

/// `currency <CODE>`
pub fn set_currency(session: &mut CalculatorSession, code: CurrencyCode) -> CalculatorView {
    debug!(currency = %code, "currency command");
    session.set_currency(code);
    CalculatorView::from(&*session)
}

/// `margin <percent>`
///
/// Text is rejected; a negative percent is clamped to zero.
pub fn set_margin(session: &mut CalculatorSession, raw: &str) -> Result<CalculatorView, ApiError> {
    debug!(raw = %raw, "margin command");
    let percent: f64 = raw
        .trim()
        .parse()
        .ok()
        .filter(|p: &f64| p.is_finite())
        .ok_or_else(|| ValidationError::NotANumber {
            field: CalculatorField::ProfitMargin.name().to_string(),
        })?;

    session.apply_suggested_margin(percent);
    Ok(CalculatorView::from(&*session))
}

/// `suggest <category>`
///
/// Asks the advisor only; the session is not touched until `apply`.
pub async fn suggest(
    advisor: Option<&dyn MarginAdvisor>,
    category: &str,
) -> Result<SuggestionResponse, ApiError> {
    debug!(category = %category, "suggest command");
    let suggestion = request_margin_suggestion(advisor, category).await?;

    Ok(SuggestionResponse {
        percent: suggestion.percent(),
        suggestion,
    })
}

/// `apply`
pub fn apply_suggestion(
    session: &mut CalculatorSession,
    suggestion: Option<&MarginSuggestion>,
) -> Result<CalculatorView, ApiError> {
    let suggestion = suggestion.ok_or_else(|| {
        ApiError::validation("No margin suggestion to apply. Run 'suggest <category>' first.")
    })?;

    debug!(margin = suggestion.profit_margin, "apply command");
    session.apply_suggestion(suggestion);
    Ok(CalculatorView::from(&*session))
}

/// `reset`
pub fn reset(session: &mut CalculatorSession) -> CalculatorView {
    debug!("reset command");
    session.reset();
    CalculatorView::from(&*session)
}

/// `save`
///
/// ## Returns
/// * `Ok(SavedItemResponse)` - The new item and the reset calculator
/// * `Err(ApiError)` - `VALIDATION_ERROR` when the item name is missing
pub fn save(
    session: &mut CalculatorSession,
    ledger: &mut InventoryLedger,
) -> Result<SavedItemResponse, ApiError> {
    debug!("save command");
    let item = session.save(ledger)?;

    Ok(SavedItemResponse {
        item,
        inventory_count: ledger.len(),
        calculator: CalculatorView::from(&*session),
    })
}
