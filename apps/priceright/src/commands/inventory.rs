//! # Inventory Commands
//!
//! Listing, removing, clearing and checking out saved items.
//!
//! Totals are always derived from the current items; nothing here stores
//! a summary.

use serde::Serialize;
use tracing::{debug, info};

use priceright_core::{InventoryItem, InventorySummary, Money};

use crate::collaborators::{start_checkout, CheckoutGateway};
use crate::error::ApiError;
use crate::state::InventoryLedger;

/// Ledger contents plus derived totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryResponse {
    pub items: Vec<InventoryItem>,
    pub summary: InventorySummary,
    /// Summary rendered in the base currency, e.g. `"$247.50"`.
    pub total_revenue: String,
}

impl From<&InventoryLedger> for InventoryResponse {
    fn from(ledger: &InventoryLedger) -> Self {
        let summary = ledger.summary();
        InventoryResponse {
            items: ledger.items().to_vec(),
            total_revenue: Money::from_amount(summary.total_revenue).to_string(),
            summary,
        }
    }
}

/// Reply to `remove`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResponse {
    pub removed: bool,
    pub inventory: InventoryResponse,
}

/// Reply to `checkout`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// Where the buyer should be sent.
    pub url: String,
    pub item_count: usize,
}

/// `inventory`
pub fn list(ledger: &InventoryLedger) -> InventoryResponse {
    debug!("inventory command");
    InventoryResponse::from(ledger)
}

/// `remove <id>`
///
/// An unknown id is not an error; `removed` is `false` and nothing is written.
pub fn remove(ledger: &mut InventoryLedger, raw_id: &str) -> Result<RemoveResponse, ApiError> {
    let id: i64 = raw_id
        .trim()
        .parse()
        .map_err(|_| ApiError::validation(format!("id must be a whole number, got '{}'", raw_id.trim())))?;

    debug!(id, "remove command");
    let removed = ledger.remove(id);

    Ok(RemoveResponse {
        removed,
        inventory: InventoryResponse::from(&*ledger),
    })
}

/// `clear`
pub fn clear(ledger: &mut InventoryLedger) -> InventoryResponse {
    debug!("clear command");
    ledger.clear();
    InventoryResponse::from(&*ledger)
}

/// `checkout`
///
/// The ledger is not modified; a completed payment is confirmed out of band.
pub async fn checkout(
    gateway: Option<&dyn CheckoutGateway>,
    ledger: &InventoryLedger,
    app_url: &str,
) -> Result<CheckoutResponse, ApiError> {
    debug!(items = ledger.len(), "checkout command");
    let url = start_checkout(gateway, ledger.items(), app_url).await?;

    info!(items = ledger.len(), "Checkout ready");
    Ok(CheckoutResponse {
        url,
        item_count: ledger.len(),
    })
}
