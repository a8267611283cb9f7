//! # Persister
//!
//! Fire-and-forget writes to the state store.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Persister Flow                                       │
//! │                                                                         │
//! │  session.set_field(..)        ledger.append(..)                         │
//! │       │ save(&state)               │ save(&snapshot)                    │
//! │       ▼                            ▼                                    │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        unbounded mpsc  (send never blocks, never fails loudly)  │   │
//! │  └────────────────────────────────┬────────────────────────────────┘   │
//! │                                   ▼                                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  worker task                                                    │   │
//! │  │  1. recv one op, then drain whatever else is queued            │   │
//! │  │  2. keep only the last op per key (up to each Flush marker)    │   │
//! │  │  3. store.write / store.remove                                 │   │
//! │  │  4. failures → warn!, never back to the caller                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are serialized at the call site, so a queued write is a snapshot
//! of the state at the time of the mutation. In-memory state stays
//! authoritative; the store only matters at the next startup.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

use priceright_core::Persisted;
use priceright_store::StateStore;

/// Queued store operations.
#[derive(Debug)]
enum PersistOp {
    /// Replace the payload under `key`.
    Write { key: &'static str, payload: String },
    /// Delete `key`.
    Remove { key: &'static str },
    /// Acknowledge once every earlier op is applied.
    Flush(oneshot::Sender<()>),
}

/// Handle for queueing writes. Cheap to clone; all clones share one worker.
#[derive(Debug, Clone)]
pub struct Persister {
    tx: mpsc::UnboundedSender<PersistOp>,
}

impl Persister {
    /// Starts the worker on the current tokio runtime.
    pub fn spawn(store: Arc<dyn StateStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            run(store, rx).await;
        });

        Persister { tx }
    }

    /// Queues a write of `value` under `T::KEY`.
    pub fn save<T: Persisted>(&self, value: &T) {
        match serde_json::to_string(value) {
            Ok(payload) => self.send(PersistOp::Write {
                key: T::KEY,
                payload,
            }),
            Err(e) => warn!(key = T::KEY, error = %e, "Could not encode state, write skipped"),
        }
    }

    /// Queues removal of `T::KEY`.
    pub fn clear<T: Persisted>(&self) {
        self.send(PersistOp::Remove { key: T::KEY });
    }

    /// Waits until every op queued before this call has been applied.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(PersistOp::Flush(ack_tx));

        if ack_rx.await.is_err() {
            debug!("Persister worker gone before flush completed");
        }
    }

    fn send(&self, op: PersistOp) {
        if self.tx.send(op).is_err() {
            warn!("Persister worker stopped, state write dropped");
        }
    }
}

// =============================================================================
// Worker
// =============================================================================

async fn run(store: Arc<dyn StateStore>, mut rx: mpsc::UnboundedReceiver<PersistOp>) {
    debug!("Persister started");

    while let Some(first) = rx.recv().await {
        let mut batch = vec![first];
        while let Ok(op) = rx.try_recv() {
            batch.push(op);
        }
        apply_batch(store.as_ref(), batch).await;
    }

    debug!("Persister stopped");
}

/// Applies one drained batch, coalescing writes between flush markers.
async fn apply_batch(store: &dyn StateStore, batch: Vec<PersistOp>) {
    let mut pending: Vec<(&'static str, Option<String>)> = Vec::new();

    for op in batch {
        match op {
            PersistOp::Write { key, payload } => stage(&mut pending, key, Some(payload)),
            PersistOp::Remove { key } => stage(&mut pending, key, None),
            PersistOp::Flush(ack) => {
                apply(store, std::mem::take(&mut pending)).await;
                // Receiver may have given up waiting
                let _ = ack.send(());
            }
        }
    }

    apply(store, pending).await;
}

/// Stages an op, dropping any earlier staged op on the same key.
fn stage(pending: &mut Vec<(&'static str, Option<String>)>, key: &'static str, value: Option<String>) {
    if let Some(pos) = pending.iter().position(|(k, _)| *k == key) {
        pending.remove(pos);
        trace!(key, "Coalesced superseded write");
    }
    pending.push((key, value));
}

async fn apply(store: &dyn StateStore, ops: Vec<(&'static str, Option<String>)>) {
    for (key, value) in ops {
        let result = match value {
            Some(payload) => store.write(key, &payload).await,
            None => store.remove(key).await,
        };

        if let Err(e) = result {
            warn!(key, error = %e, "State write failed");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use priceright_core::{
        CalculatorValues, CurrencyCode, InventorySnapshot, PersistedCalculatorState,
        CALCULATOR_STATE_KEY, INVENTORY_STATE_KEY,
    };
    use priceright_store::{MemoryStateStore, StoreError, StoreResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn state(base_cost: f64) -> PersistedCalculatorState {
        PersistedCalculatorState {
            values: CalculatorValues {
                base_cost,
                ..CalculatorValues::initial()
            },
            currency: CurrencyCode::Usd,
        }
    }

    #[tokio::test]
    async fn test_save_then_flush_is_durable() {
        let store = Arc::new(MemoryStateStore::new());
        let persister = Persister::spawn(store.clone());

        persister.save(&state(42.0));
        persister.flush().await;

        let raw = store.read(CALCULATOR_STATE_KEY).await.unwrap().unwrap();
        let loaded: PersistedCalculatorState = serde_json::from_str(&raw).unwrap();
        assert_eq!(loaded.values.base_cost, 42.0);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = Arc::new(MemoryStateStore::new());
        let persister = Persister::spawn(store.clone());

        for cost in [1.0, 2.0, 3.0, 4.0] {
            persister.save(&state(cost));
        }
        persister.flush().await;

        let raw = store.read(CALCULATOR_STATE_KEY).await.unwrap().unwrap();
        assert!(raw.contains("\"baseCost\":4.0"));
    }

    #[tokio::test]
    async fn test_clear_after_save_removes() {
        let store = Arc::new(MemoryStateStore::new());
        let persister = Persister::spawn(store.clone());

        persister.save(&state(1.0));
        persister.save(&InventorySnapshot::default());
        persister.clear::<PersistedCalculatorState>();
        persister.flush().await;

        assert_eq!(store.read(CALCULATOR_STATE_KEY).await.unwrap(), None);
        assert_eq!(store.read(INVENTORY_STATE_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_stage_keeps_last_per_key() {
        let mut pending = Vec::new();
        stage(&mut pending, "a", Some("1".into()));
        stage(&mut pending, "b", Some("x".into()));
        stage(&mut pending, "a", None);

        assert_eq!(pending, vec![("b", Some("x".to_string())), ("a", None)]);
    }

    struct FailingStore {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl StateStore for FailingStore {
        async fn read(&self, _key: &str) -> StoreResult<Option<String>> {
            Ok(None)
        }

        async fn write(&self, _key: &str, _payload: &str) -> StoreResult<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Internal("disk full".into()))
        }

        async fn remove(&self, _key: &str) -> StoreResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_write_failures_are_swallowed() {
        let store = Arc::new(FailingStore {
            attempts: AtomicUsize::new(0),
        });
        let persister = Persister::spawn(store.clone());

        persister.save(&state(5.0));
        persister.flush().await;
        persister.save(&state(6.0));
        persister.flush().await;

        assert_eq!(store.attempts.load(Ordering::SeqCst), 2);
    }
}
