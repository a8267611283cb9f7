//! # Schema Migrations
//!
//! The `state_slots` schema is embedded at compile time from
//! `migrations/sqlite/` and applied every time a database is opened.
//! Applied files are recorded in `_sqlx_migrations` and skipped on reopen.
//!
//! New schema goes in a new `NNN_description.sql` file; applied files are
//! never edited.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::StoreResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies pending migrations in filename order.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    MIGRATOR.run(pool).await?;
    info!(embedded = MIGRATOR.migrations.len(), "State schema up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_migrations_are_recorded_once() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(applied as usize, MIGRATOR.migrations.len());
    }
}
