//! # State Module
//!
//! The mutable state behind the command loop.
//!
//! Each state type owns exactly one storage slot and nothing else, so the
//! calculator and the inventory never write over each other.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │ CalculatorSession│   │ InventoryLedger  │   │    AppConfig     │    │
//! │  │                  │   │                  │   │                  │    │
//! │  │ values, currency │   │ items, last_id   │   │ db path, urls    │    │
//! │  │ Clean / Dirty    │   │                  │   │ (read-only)      │    │
//! │  └────────┬─────────┘   └────────┬─────────┘   └──────────────────┘    │
//! │           │ priceRightCalculatorState │ priceRightInventory             │
//! │           └───────────┬──────────┘                                     │
//! │                       ▼                                                 │
//! │              ┌──────────────────┐                                       │
//! │              │    Persister     │  queued, coalesced writes             │
//! │              └────────┬─────────┘                                       │
//! │                       ▼                                                 │
//! │              dyn StateStore (SQLite / memory)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
mod ledger;
mod persister;
mod session;

pub use config::AppConfig;
pub use ledger::InventoryLedger;
pub use persister::Persister;
pub use session::{CalculatorSession, DisplayPricing, EditState};
