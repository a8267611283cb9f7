//! # Database Handle
//!
//! Opens the SQLite file that backs the state slots.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Opening the State Database                         │
//! │                                                                         │
//! │  DbConfig::new(path)          DbConfig::in_memory()                     │
//! │  (platform data dir)          (tests, single connection, no idle reap)  │
//! │           │                            │                                │
//! │           └──────────┬─────────────────┘                                │
//! │                      ▼                                                  │
//! │  Database::new ── mode=rwc, WAL ──► SqlitePool ──► migrations           │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  db.state_store() ──► SqliteStateStore ──► state_slots                  │
//! │                                                                         │
//! │  Two slots and one writer task: a small pool is plenty.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::migrations;
use crate::slots::SqliteStateStore;

const FILE_POOL_SIZE: u32 = 4;

/// Where the state database lives.
#[derive(Debug, Clone)]
pub struct DbConfig {
    path: PathBuf,
    in_memory: bool,
}

impl DbConfig {
    /// A database file at `path`, created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: path.into(),
            in_memory: false,
        }
    }

    /// A private in-memory database. Contents vanish with the handle.
    pub fn in_memory() -> Self {
        DbConfig {
            path: PathBuf::from(":memory:"),
            in_memory: true,
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

/// Handle to the open state database. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database and applies pending migrations.
    pub async fn new(config: DbConfig) -> StoreResult<Self> {
        info!(path = %config.path.display(), "Opening state database");

        let url = format!("sqlite://{}?mode=rwc", config.path.display());
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        // Every :memory: connection is its own database, so keep exactly one
        // and never let it be reaped.
        let pool_options = if config.in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(FILE_POOL_SIZE)
                .idle_timeout(Some(Duration::from_secs(600)))
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        debug!(in_memory = config.in_memory, "Pool created");

        migrations::run_migrations(&pool).await?;

        Ok(Database { pool })
    }

    /// The keyed slot store over this database.
    pub fn state_store(&self) -> SqliteStateStore {
        SqliteStateStore::new(self.pool.clone())
    }

    /// Closes the pool. Store calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing state database");
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::StateStore;

    #[tokio::test]
    async fn test_in_memory_starts_with_no_slots() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM state_slots")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_file_database_keeps_slots_across_reopen() {
        let path = std::env::temp_dir().join(format!(
            "priceright-pool-{}-{}.db",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.state_store().write("priceRightInventory", "[]").await.unwrap();
        db.close().await;

        // Reopening reruns migrations; already-applied ones are skipped.
        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let payload = db.state_store().read("priceRightInventory").await.unwrap();
        assert_eq!(payload.as_deref(), Some("[]"));
        db.close().await;

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_config_paths() {
        assert_eq!(DbConfig::new("/tmp/pr.db").path(), &PathBuf::from("/tmp/pr.db"));
        assert_eq!(DbConfig::in_memory().path(), &PathBuf::from(":memory:"));
    }
}
