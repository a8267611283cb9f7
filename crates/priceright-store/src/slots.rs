//! # State Slots
//!
//! Keyed JSON blobs and the typed load/save layer on top of them.
//!
//! ## Load Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load::<T>(store)                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.read(T::KEY) ──── None ─────────────────────► Ok(None)          │
//! │       │                                                                 │
//! │       ▼ Some(payload)                                                   │
//! │  serde_json::from_str::<T> ── Err ──┐                                  │
//! │       │                             │                                  │
//! │       ▼ Ok(value)                   ▼                                  │
//! │  value.check() ────────── Err ──► QUARANTINE                           │
//! │       │                           ├── warn!(key, reason)               │
//! │       ▼ Ok                        ├── store.remove(T::KEY)             │
//! │  Ok(Some(value))                  └── Ok(None)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A corrupt blob never aborts startup and never survives to the next load.
//! Only genuine storage failures come back as `Err`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use priceright_core::Persisted;
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// StateStore Trait
// =============================================================================

/// Raw key → string storage.
///
/// Writes to one key are last-writer-wins; callers that need ordering
/// serialize their writes (the app's persister does).
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Returns the payload under `key`, if any.
    async fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replaces the payload under `key`.
    async fn write(&self, key: &str, payload: &str) -> StoreResult<()>;

    /// Deletes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

// =============================================================================
// SQLite Store
// =============================================================================

/// `StateStore` over the `state_slots` table.
#[derive(Debug, Clone)]
pub struct SqliteStateStore {
    pool: SqlitePool,
}

impl SqliteStateStore {
    /// Creates a new SqliteStateStore.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStateStore { pool }
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM state_slots WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(payload)
    }

    async fn write(&self, key: &str, payload: &str) -> StoreResult<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO state_slots (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = payload.len(), "Slot written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM state_slots WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key = %key, "Slot removed");
        Ok(())
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Process-local `StateStore` for tests and throwaway runs.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, payload: &str) -> StoreResult<()> {
        self.slots
            .write()
            .await
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.slots.write().await.remove(key);
        Ok(())
    }
}

// =============================================================================
// Typed Access
// =============================================================================

/// Loads the blob stored under `T::KEY`.
///
/// ## Returns
/// * `Ok(Some(value))` - Blob present, parsed and checked
/// * `Ok(None)` - Absent, or present but malformed (now removed)
/// * `Err(StoreError)` - The store itself failed
pub async fn load<T, S>(store: &S) -> StoreResult<Option<T>>
where
    T: Persisted,
    S: StateStore + ?Sized,
{
    let Some(payload) = store.read(T::KEY).await? else {
        debug!(key = T::KEY, "No stored state");
        return Ok(None);
    };

    let reason = match serde_json::from_str::<T>(&payload) {
        Ok(value) => match value.check() {
            Ok(()) => return Ok(Some(value)),
            Err(e) => e.to_string(),
        },
        Err(e) => e.to_string(),
    };

    warn!(key = T::KEY, reason = %reason, "Discarding unreadable stored state");
    store.remove(T::KEY).await?;
    Ok(None)
}

/// Serializes `value` and writes it under `T::KEY`.
pub async fn save<T, S>(store: &S, value: &T) -> StoreResult<()>
where
    T: Persisted,
    S: StateStore + ?Sized,
{
    let payload = serde_json::to_string(value).map_err(|e| StoreError::encode(T::KEY, e))?;
    store.write(T::KEY, &payload).await
}

/// Removes the blob stored under `T::KEY`.
pub async fn clear<T, S>(store: &S) -> StoreResult<()>
where
    T: Persisted,
    S: StateStore + ?Sized,
{
    store.remove(T::KEY).await
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use priceright_core::{
        CalculatorValues, CurrencyCode, InventoryItem, InventorySnapshot, PersistedCalculatorState,
        CALCULATOR_STATE_KEY, INVENTORY_STATE_KEY,
    };

    async fn sqlite_store() -> SqliteStateStore {
        Database::new(DbConfig::in_memory()).await.unwrap().state_store()
    }

    fn calculator_state() -> PersistedCalculatorState {
        PersistedCalculatorState {
            values: CalculatorValues::initial(),
            currency: CurrencyCode::Gbp,
        }
    }

    #[tokio::test]
    async fn test_sqlite_read_write_remove() {
        let store = sqlite_store().await;

        assert_eq!(store.read("k").await.unwrap(), None);
        store.write("k", "1").await.unwrap();
        store.write("k", "2").await.unwrap();
        assert_eq!(store.read("k").await.unwrap().as_deref(), Some("2"));

        store.remove("k").await.unwrap();
        assert_eq!(store.read("k").await.unwrap(), None);

        // absent key
        store.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_read_write_remove() {
        let store = MemoryStateStore::new();

        store.write("k", "a").await.unwrap();
        assert_eq!(store.read("k").await.unwrap().as_deref(), Some("a"));
        store.remove("k").await.unwrap();
        assert_eq!(store.read("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let store = sqlite_store().await;
        let state = calculator_state();

        save(&store, &state).await.unwrap();
        let loaded: Option<PersistedCalculatorState> = load(&store).await.unwrap();
        assert_eq!(loaded, Some(state));
    }

    #[tokio::test]
    async fn test_absent_loads_none() {
        let store = MemoryStateStore::new();
        let loaded: Option<InventorySnapshot> = load(&store).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_is_quarantined() {
        let store = sqlite_store().await;
        store.write(CALCULATOR_STATE_KEY, "{not json").await.unwrap();

        let loaded: Option<PersistedCalculatorState> = load(&store).await.unwrap();
        assert!(loaded.is_none());
        assert_eq!(store.read(CALCULATOR_STATE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_quarantined() {
        let store = MemoryStateStore::new();
        store
            .write(CALCULATOR_STATE_KEY, r#"{"values": {"baseCost": -10}}"#)
            .await
            .unwrap();
        store
            .write(INVENTORY_STATE_KEY, r#"{"items": "not an array"}"#)
            .await
            .unwrap();

        let calc: Option<PersistedCalculatorState> = load(&store).await.unwrap();
        let inv: Option<InventorySnapshot> = load(&store).await.unwrap();
        assert!(calc.is_none());
        assert!(inv.is_none());
        assert_eq!(store.read(CALCULATOR_STATE_KEY).await.unwrap(), None);
        assert_eq!(store.read(INVENTORY_STATE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_quarantine_leaves_other_slot_alone() {
        let store = MemoryStateStore::new();
        let snapshot = InventorySnapshot(vec![InventoryItem {
            id: 1,
            name: "Mug".into(),
            total_cost: 10.0,
            profit_amount: 2.0,
            final_price: 12.0,
        }]);
        save(&store, &snapshot).await.unwrap();
        store.write(CALCULATOR_STATE_KEY, "garbage").await.unwrap();

        let calc: Option<PersistedCalculatorState> = load(&store).await.unwrap();
        let inv: Option<InventorySnapshot> = load(&store).await.unwrap();
        assert!(calc.is_none());
        assert_eq!(inv, Some(snapshot));
    }

    #[tokio::test]
    async fn test_clear_removes_slot() {
        let store = MemoryStateStore::new();
        save(&store, &calculator_state()).await.unwrap();

        clear::<PersistedCalculatorState, _>(&store).await.unwrap();
        assert_eq!(store.read(CALCULATOR_STATE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_load_through_trait_object() {
        let store: Box<dyn StateStore> = Box::new(MemoryStateStore::new());
        save(store.as_ref(), &calculator_state()).await.unwrap();

        let loaded: Option<PersistedCalculatorState> = load(store.as_ref()).await.unwrap();
        assert!(loaded.is_some());
    }
}
