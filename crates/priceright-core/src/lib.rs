//! # priceright-core: Pure Pricing Logic for PriceRight
//!
//! This crate is the **heart** of PriceRight. It contains the cost/profit/price
//! computation, the currency display rule and the inventory value types as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PriceRight Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Commands (apps/priceright)                   │   │
//! │  │    set, currency, suggest, save, inventory, checkout ...        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │      Calculator Session  ·  Inventory Ledger  ·  Persister      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ priceright-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │ currency │ │ pricing  │ │  types   │ │ validation       │  │   │
//! │  │   │ USD, EUR │ │aggregate │ │Inventory │ │ checkout, money  │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 priceright-store (State Store)                  │   │
//! │  │              keyed JSON blobs, quarantine on load               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`currency`] - Static currency table (symbol + USD rate)
//! - [`pricing`] - Cost aggregation and display conversion
//! - [`money`] - Integer minor-unit money for checkout and formatting
//! - [`types`] - Calculator, inventory and collaborator value types
//! - [`checkout`] - Line-item mapping handed to the checkout collaborator
//! - [`validation`] - Field and collaborator-output validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, no hidden state
//! 2. **Base Currency First**: every amount is computed in USD and only
//!    scaled for display afterwards
//! 3. **Clamp, Don't Reject**: negative or garbage cost inputs contribute 0
//!
//! ## Example Usage
//!
//! ```rust
//! use priceright_core::pricing::{aggregate, CostLineItems};
//!
//! let items = CostLineItems {
//!     base_cost: 100.0,
//!     packaging: 5.0,
//!     local_shipping: 10.0,
//!     overseas_shipment: 20.0,
//!     customs: 15.0,
//!     profit_margin: 25.0,
//! };
//!
//! let result = aggregate(&items);
//! assert_eq!(result.total_cost, 150.0);
//! assert_eq!(result.profit_amount, 37.5);
//! assert_eq!(result.final_price, 187.5);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod currency;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use currency::CurrencyCode;
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use pricing::{aggregate, display_aggregate, CostLineItems, PricingResult};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key of the calculator blob.
///
/// Kept identical to the key the web calculator wrote so existing saved
/// state carries over.
pub const CALCULATOR_STATE_KEY: &str = "priceRightCalculatorState";

/// Storage key of the inventory blob. Distinct from the calculator key.
pub const INVENTORY_STATE_KEY: &str = "priceRightInventory";

/// Maximum length of an inventory item name.
pub const MAX_ITEM_NAME_LEN: usize = 200;

/// Minimum length of a product category sent to the margin advisor.
pub const MIN_CATEGORY_LEN: usize = 3;
