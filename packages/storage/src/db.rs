// ABOUTME: Database connection management and storage initialization
// ABOUTME: Opens the SQLite pool, applies pragmas and migrations, and closes it on shutdown

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::storage::ItemStorage;
use crate::{StorageError, StorageResult};

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle to the item database. Constructed once at startup and passed to
/// whatever needs the store; call [`Database::close`] on shutdown.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    items: ItemStorage,
}

impl Database {
    /// Open (creating if needed) the database file at `path` and migrate it
    pub async fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StorageError::Io)?;
        }

        debug!("Connecting to database: {}", path.display());

        // Pragmas set here apply to every connection the pool opens
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(StorageError::Sqlx)?;

        info!("Database connection established: {}", path.display());

        Self::from_pool(pool).await
    }

    /// A private in-memory database. One connection, so every query sees the same data.
    pub async fn open_in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(StorageError::Sqlx)?;

        info!("In-memory database opened");

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, running migrations first
    pub async fn from_pool(pool: SqlitePool) -> StorageResult<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(StorageError::Migration)?;

        debug!("Database migrations completed");

        let items = ItemStorage::new(pool.clone());
        Ok(Self { pool, items })
    }

    pub fn items(&self) -> &ItemStorage {
        &self.items
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection. Clones of this handle stop working too.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection closed");
    }
}
