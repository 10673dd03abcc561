// ABOUTME: Item store for the task list, backed by SQLite
// ABOUTME: Owns the pool lifecycle, migrations, and every query against the items table

pub mod db;
pub mod storage;
pub mod types;

use std::env;
use std::path::PathBuf;

use thiserror::Error;

// Re-export main types
pub use db::Database;
pub use storage::ItemStorage;
pub use types::{Filter, Item, ItemCounts, ParseFilterError, MAX_TEXT_LENGTH};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Item not found: {0}")]
    NotFound(i64),
    #[error("Item text is empty")]
    EmptyText,
    #[error("Item text exceeds {max} characters (got {len})")]
    TextTooLong { len: usize, max: usize },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Get the path to the Tasklist directory (~/.tasklist)
pub fn tasklist_dir() -> PathBuf {
    // HOME first so tests can redirect it
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".tasklist")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tasklist")
    }
}

/// Default database location (~/.tasklist/tasklist.db)
pub fn default_database_path() -> PathBuf {
    tasklist_dir().join("tasklist.db")
}
