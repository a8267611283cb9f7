//! # Calculator Session
//!
//! Current form values plus display currency, persisted on every change.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Edit State                                   │
//! │                                                                         │
//! │                 set_field / apply_suggested_margin                      │
//! │   ┌─────────┐ ─────────────────────────────────────► ┌─────────┐       │
//! │   │  Clean  │                                        │  Dirty  │       │
//! │   └─────────┘ ◄───────────────────────────────────── └─────────┘       │
//! │     ▲    │              reset / successful save          │  │          │
//! │     │    │ set_currency (display only, stays Clean)      │  │          │
//! │     └────┘                                               └──┘          │
//! │                                                 set_field / currency   │
//! │                                                                         │
//! │  initialize() always starts Clean, with loaded or default values.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Base vs Display
//! Values and [`CalculatorSession::pricing`] are always in the base currency.
//! [`CalculatorSession::display_pricing`] scales for rendering only; a save
//! snapshots the base result no matter which currency is selected.

use serde::Serialize;
use tracing::{debug, info, warn};

use priceright_core::pricing::{clamp_amount, parse_amount};
use priceright_core::validation::validate_item_name;
use priceright_core::{
    aggregate, CalculatorField, CalculatorValues, CurrencyCode, InventoryItem, MarginSuggestion,
    PersistedCalculatorState, PricingResult, ValidationError,
};
use priceright_store::{slots, StateStore};

use crate::state::{InventoryLedger, Persister};

/// Whether the form has been edited since the last load/reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditState {
    Clean,
    Dirty,
}

/// Pricing scaled into the selected display currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPricing {
    pub currency: CurrencyCode,
    pub symbol: &'static str,
    pub rate: f64,
    pub result: PricingResult,
}

/// The calculator session. Owns the `priceRightCalculatorState` slot.
#[derive(Debug)]
pub struct CalculatorSession {
    values: CalculatorValues,
    currency: CurrencyCode,
    edit_state: EditState,
    persister: Persister,
}

impl CalculatorSession {
    /// Creates a session with default values, without touching the store.
    pub fn new(persister: Persister) -> Self {
        CalculatorSession {
            values: CalculatorValues::initial(),
            currency: CurrencyCode::BASE,
            edit_state: EditState::Clean,
            persister,
        }
    }

    /// Restores the session from the store, falling back to defaults.
    pub async fn initialize(store: &dyn StateStore, persister: Persister) -> Self {
        let mut session = CalculatorSession::new(persister);

        match slots::load::<PersistedCalculatorState, _>(store).await {
            Ok(Some(saved)) => {
                session.values = saved.values;
                session.currency = saved.currency;
                info!(currency = %session.currency, "Calculator state restored");
            }
            Ok(None) => debug!("No saved calculator state, using defaults"),
            Err(e) => warn!(error = %e, "Could not read calculator state, using defaults"),
        }

        session
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Sets one field from raw form input.
    ///
    /// Numeric fields never fail: unparseable or negative input becomes 0.
    pub fn set_field(&mut self, field: CalculatorField, raw: &str) {
        match self.values.amount_mut(field) {
            Some(amount) => *amount = parse_amount(raw),
            None => self.values.item_name = raw.to_string(),
        }
        debug!(field = %field, "Calculator field updated");
        self.touch();
    }

    /// Overwrites the margin (percentage units, 18.0 = 18 %).
    pub fn apply_suggested_margin(&mut self, percent: f64) {
        self.values.profit_margin = clamp_amount(percent);
        debug!(margin = self.values.profit_margin, "Margin applied");
        self.touch();
    }

    /// Applies an advisor suggestion, converting its fraction to percent.
    pub fn apply_suggestion(&mut self, suggestion: &MarginSuggestion) {
        self.apply_suggested_margin(suggestion.percent());
    }

    /// Changes the display currency. Values are not touched.
    pub fn set_currency(&mut self, currency: CurrencyCode) {
        self.currency = currency;
        debug!(currency = %currency, "Display currency changed");
        self.persist();
    }

    /// Back to defaults; removes the saved calculator state.
    pub fn reset(&mut self) {
        self.values = CalculatorValues::initial();
        self.currency = CurrencyCode::BASE;
        self.edit_state = EditState::Clean;
        self.persister.clear::<PersistedCalculatorState>();
        debug!("Calculator reset");
    }

    /// Saves the current item into `ledger` and resets the session.
    ///
    /// ## Returns
    /// * `Ok(item)` - The appended item (base-currency amounts)
    /// * `Err(ValidationError)` - Name missing or too long; nothing changed
    pub fn save(&mut self, ledger: &mut InventoryLedger) -> Result<InventoryItem, ValidationError> {
        validate_item_name(&self.values.item_name)?;

        let pricing = self.pricing();
        let item = InventoryItem::new(ledger.next_id(), self.values.item_name.trim(), &pricing);
        ledger.append(item.clone());

        info!(id = item.id, name = %item.name, price = item.final_price, "Item saved to inventory");
        self.reset();
        Ok(item)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn values(&self) -> &CalculatorValues {
        &self.values
    }

    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    pub fn edit_state(&self) -> EditState {
        self.edit_state
    }

    pub fn is_dirty(&self) -> bool {
        self.edit_state == EditState::Dirty
    }

    /// Base-currency pricing of the current values.
    pub fn pricing(&self) -> PricingResult {
        aggregate(&self.values.line_items())
    }

    /// Pricing in the selected display currency.
    pub fn display_pricing(&self) -> DisplayPricing {
        let rate = self.currency.rate();
        DisplayPricing {
            currency: self.currency,
            symbol: self.currency.symbol(),
            rate,
            result: self.pricing().scaled(rate),
        }
    }

    fn touch(&mut self) {
        self.edit_state = EditState::Dirty;
        self.persist();
    }

    fn persist(&self) {
        self.persister.save(&PersistedCalculatorState {
            values: self.values.clone(),
            currency: self.currency,
        });
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use priceright_core::CALCULATOR_STATE_KEY;
    use priceright_store::MemoryStateStore;
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryStateStore>, CalculatorSession, InventoryLedger) {
        let store = Arc::new(MemoryStateStore::new());
        let persister = Persister::spawn(store.clone());
        let session = CalculatorSession::new(persister.clone());
        let ledger = InventoryLedger::new(persister);
        (store, session, ledger)
    }

    #[tokio::test]
    async fn test_defaults() {
        let (_, session, _) = setup();
        assert_eq!(session.currency(), CurrencyCode::Usd);
        assert_eq!(session.edit_state(), EditState::Clean);
        let p = session.pricing();
        assert_eq!((p.total_cost, p.profit_amount, p.final_price), (150.0, 37.5, 187.5));
    }

    #[tokio::test]
    async fn test_set_field_marks_dirty_and_clamps() {
        let (_, mut session, _) = setup();

        session.set_field(CalculatorField::Customs, "-20");
        assert!(session.is_dirty());
        assert_eq!(session.values().customs, 0.0);

        session.set_field(CalculatorField::Packaging, "oops");
        assert_eq!(session.values().packaging, 0.0);

        session.set_field(CalculatorField::ItemName, "Teapot");
        assert_eq!(session.values().item_name, "Teapot");
    }

    #[tokio::test]
    async fn test_currency_is_display_only() {
        let (_, mut session, _) = setup();
        session.set_currency(CurrencyCode::Eur);

        assert_eq!(session.edit_state(), EditState::Clean);
        assert_eq!(session.values(), &CalculatorValues::initial());
        assert_eq!(session.pricing().final_price, 187.5);

        let display = session.display_pricing();
        assert_eq!(display.symbol, "€");
        assert!((display.result.final_price - 187.5 * display.rate).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_apply_suggestion_uses_percent() {
        let (_, mut session, _) = setup();
        session.apply_suggestion(&MarginSuggestion {
            profit_margin: 0.18,
            reasoning: "steady".into(),
        });
        assert_eq!(session.values().profit_margin, 18.0);
        assert!(session.is_dirty());
    }

    #[tokio::test]
    async fn test_save_with_empty_name_changes_nothing() {
        let (_, mut session, mut ledger) = setup();
        session.set_field(CalculatorField::BaseCost, "80");
        let before = session.values().clone();

        let err = session.save(&mut ledger).unwrap_err();
        assert_eq!(err.field(), "itemName");
        assert!(ledger.is_empty());
        assert_eq!(session.values(), &before);
        assert!(session.is_dirty());
    }

    #[tokio::test]
    async fn test_save_snapshots_base_currency_and_resets() {
        let (_, mut session, mut ledger) = setup();
        session.set_currency(CurrencyCode::Jpy);
        session.set_field(CalculatorField::ItemName, "  Lamp ");

        let item = session.save(&mut ledger).unwrap();
        assert_eq!(item.name, "Lamp");
        assert_eq!(item.total_cost, 150.0);
        assert_eq!(item.profit_amount, 37.5);
        assert_eq!(item.final_price, 187.5);

        assert_eq!(ledger.items(), &[item]);
        assert_eq!(session.values(), &CalculatorValues::initial());
        assert_eq!(session.currency(), CurrencyCode::BASE);
        assert_eq!(session.edit_state(), EditState::Clean);
    }

    #[tokio::test]
    async fn test_saved_item_is_a_copy() {
        let (_, mut session, mut ledger) = setup();
        session.set_field(CalculatorField::ItemName, "Vase");
        session.save(&mut ledger).unwrap();

        session.set_field(CalculatorField::BaseCost, "9999");
        assert_eq!(ledger.items()[0].total_cost, 150.0);
    }

    #[tokio::test]
    async fn test_changes_persist_and_restore() {
        let (store, mut session, _) = setup();
        session.set_field(CalculatorField::ItemName, "Scarf");
        session.set_field(CalculatorField::ProfitMargin, "40");
        session.set_currency(CurrencyCode::Gbp);
        session.persister.flush().await;

        let restored = CalculatorSession::initialize(store.as_ref(), Persister::spawn(store.clone())).await;
        assert_eq!(restored.values().item_name, "Scarf");
        assert_eq!(restored.values().profit_margin, 40.0);
        assert_eq!(restored.currency(), CurrencyCode::Gbp);
        assert_eq!(restored.edit_state(), EditState::Clean);
    }

    #[tokio::test]
    async fn test_reset_clears_slot() {
        let (store, mut session, _) = setup();
        session.set_field(CalculatorField::Customs, "1");
        session.reset();
        session.persister.flush().await;

        assert_eq!(store.read(CALCULATOR_STATE_KEY).await.unwrap(), None);
        assert_eq!(session.values(), &CalculatorValues::initial());
    }

    #[tokio::test]
    async fn test_corrupt_state_gives_defaults() {
        let store = Arc::new(MemoryStateStore::new());
        store.write(CALCULATOR_STATE_KEY, "not json at all").await.unwrap();

        let session = CalculatorSession::initialize(store.as_ref(), Persister::spawn(store.clone())).await;
        assert_eq!(session.values(), &CalculatorValues::initial());
        assert_eq!(session.currency(), CurrencyCode::Usd);
        assert_eq!(store.read(CALCULATOR_STATE_KEY).await.unwrap(), None);
    }
}
