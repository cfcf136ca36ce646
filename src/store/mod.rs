//! SQLite-backed persistence.
//!
//! Every relation gets its own module of parameterized queries. The functions are generic
//! over [`sqlx::Executor`] so they run against the pool or inside a transaction alike.

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;
use tracing::info;

pub mod comments;
pub mod follows;
pub mod likes;
pub mod posts;
pub mod users;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("store call exceeded {0:?}")]
    TimedOut(Duration),
}

/// Handle to the relational store plus the per-call deadline.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
    timeout: Duration,
}

impl Store {
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Opens (creating if needed) the database file and applies pending migrations.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(sqlx::Error::from)?;

        info!(database_url, "store ready");

        Ok(Self::new(pool, timeout))
    }

    /// Private in-memory database. A single connection that never expires, since each
    /// SQLite `:memory:` connection is its own database.
    pub async fn in_memory(timeout: Duration) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(sqlx::Error::from)?;

        Ok(Self::new(pool, timeout))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Opens a transaction that takes the write lock up front.
    pub async fn begin_write(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        begin_write(&self.pool).await
    }

    /// Runs `work` under the store deadline. On expiry the future is dropped, which rolls
    /// back any transaction it had open.
    pub async fn bounded<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<StoreError>,
    {
        match tokio::time::timeout(self.timeout, work).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::TimedOut(self.timeout).into()),
        }
    }

    /// [`Store::bounded`] for a single query future.
    pub async fn run<T, F>(&self, query: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        self.bounded(async { query.await.map_err(StoreError::from) })
            .await
    }
}

/// `BEGIN IMMEDIATE` so a read-then-write transaction waits on `busy_timeout` for the
/// write lock instead of failing when its WAL snapshot goes stale.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bounded_reports_timeout() {
        let store = Store::in_memory(Duration::from_millis(10)).await.unwrap();

        let result: Result<(), StoreError> = store
            .bounded(async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(StoreError::TimedOut(_))));
    }

    #[tokio::test]
    async fn bounded_passes_through_results() {
        let store = Store::in_memory(Duration::from_secs(1)).await.unwrap();

        let value: i64 = store
            .bounded(async {
                let v: i64 = sqlx::query_scalar("SELECT 41 + 1")
                    .fetch_one(store.pool())
                    .await?;
                Ok::<_, StoreError>(v)
            })
            .await
            .unwrap();

        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn run_maps_query_errors() {
        let store = Store::in_memory(Duration::from_secs(1)).await.unwrap();

        let result = store
            .run(sqlx::query("SELECT * FROM no_such_table").execute(store.pool()))
            .await;

        assert!(matches!(result, Err(StoreError::Sqlx(_))));
    }

    #[tokio::test]
    async fn migrations_enforce_foreign_keys() {
        let store = Store::in_memory(Duration::from_secs(1)).await.unwrap();

        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(store.pool())
            .await
            .unwrap();

        assert_eq!(enabled, 1);
    }
}
