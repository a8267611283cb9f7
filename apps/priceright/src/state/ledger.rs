//! # Inventory Ledger
//!
//! Ordered list of saved priced items.
//!
//! ## Ledger Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Operations                                    │
//! │                                                                         │
//! │  Command          Ledger Call           Change           Persisted?     │
//! │  ───────          ───────────           ──────           ──────────     │
//! │  save ──────────► append(item) ───────► push to end      yes            │
//! │  remove <id> ───► remove(id) ─────────► first match out  if removed     │
//! │  clear ─────────► clear() ────────────► empty            yes ([])       │
//! │  inventory ─────► summary() ──────────► (read only)      no             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Id Policy
//! `next_id()` returns `max(now_ms, last_id + 1)`. The clock gives ids a
//! meaningful order across sessions; the `+ 1` keeps two saves in the same
//! millisecond (or a clock step backwards) from colliding. `last_id` is
//! seeded from the largest id loaded at startup.

use chrono::Utc;
use tracing::{debug, info, warn};

use priceright_core::{InventoryItem, InventorySnapshot, InventorySummary};
use priceright_store::{slots, StateStore};

use crate::state::Persister;

/// The inventory ledger. Owns the `priceRightInventory` slot.
#[derive(Debug)]
pub struct InventoryLedger {
    items: Vec<InventoryItem>,
    last_id: i64,
    persister: Persister,
}

impl InventoryLedger {
    /// Creates an empty ledger.
    pub fn new(persister: Persister) -> Self {
        InventoryLedger {
            items: Vec::new(),
            last_id: 0,
            persister,
        }
    }

    /// Restores the ledger from the store.
    ///
    /// Absent or quarantined state gives an empty ledger. A failing store is
    /// logged and also gives an empty ledger.
    pub async fn initialize(store: &dyn StateStore, persister: Persister) -> Self {
        let mut ledger = InventoryLedger::new(persister);

        match slots::load::<InventorySnapshot, _>(store).await {
            Ok(Some(InventorySnapshot(items))) => {
                ledger.last_id = items.iter().map(|i| i.id).max().unwrap_or(0);
                ledger.items = items;
                info!(items = ledger.items.len(), "Inventory restored");
            }
            Ok(None) => debug!("No saved inventory, starting empty"),
            Err(e) => warn!(error = %e, "Could not read saved inventory, starting empty"),
        }

        ledger
    }

    /// Returns a fresh id, strictly greater than every id seen so far.
    ///
    /// Saturates at `i64::MAX` once a stored id has reached it.
    pub fn next_id(&mut self) -> i64 {
        let id = Utc::now().timestamp_millis().max(self.last_id.saturating_add(1));
        self.last_id = id;
        id
    }

    /// Adds `item` at the end.
    pub fn append(&mut self, item: InventoryItem) {
        debug!(id = item.id, name = %item.name, "Appending inventory item");
        self.last_id = self.last_id.max(item.id);
        self.items.push(item);
        self.persist();
    }

    /// Removes the first item with `id`.
    ///
    /// ## Returns
    /// `true` if an item was removed; `false` (and no write) otherwise.
    pub fn remove(&mut self, id: i64) -> bool {
        let Some(pos) = self.items.iter().position(|i| i.id == id) else {
            debug!(id, "No inventory item to remove");
            return false;
        };

        self.items.remove(pos);
        self.persist();
        true
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        info!(items = self.items.len(), "Clearing inventory");
        self.items.clear();
        self.persist();
    }

    /// Totals over the current items.
    pub fn summary(&self) -> InventorySummary {
        InventorySummary::from_items(&self.items)
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn persist(&self) {
        self.persister.save(&InventorySnapshot(self.items.clone()));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
