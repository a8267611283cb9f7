//! # priceright-store: State Store for PriceRight
//!
//! Durable key → JSON blob storage with quarantine of unreadable blobs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PriceRight Data Flow                             │
//! │                                                                         │
//! │  Calculator Session / Inventory Ledger                                 │
//! │       │  (through the persister queue)                                  │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 priceright-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │    slots      │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ StateStore    │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ load / save   │    │ 001_state_   │  │   │
//! │  │   │ WAL           │    │ quarantine    │    │   slots.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/com.priceright.app/priceright.db          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Opening the state database (file or in-memory)
//! - [`migrations`] - Embedded database migrations
//! - [`slots`] - `StateStore` trait, SQLite/in-memory stores, typed load/save
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use priceright_core::PersistedCalculatorState;
//! use priceright_store::{slots, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("priceright.db")).await?;
//! let store = db.state_store();
//!
//! // None when absent or quarantined
//! let state: Option<PersistedCalculatorState> = slots::load(&store).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod slots;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};
pub use slots::{MemoryStateStore, SqliteStateStore, StateStore};
