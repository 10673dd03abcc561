// ABOUTME: Item storage layer using SQLite
// ABOUTME: Each operation is a single statement against the items table

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::debug;

use crate::types::{Filter, Item, ItemCounts, MAX_TEXT_LENGTH};
use crate::{StorageError, StorageResult};

const SELECT_ALL: &str =
    "SELECT id, text, completed, created_at FROM items ORDER BY created_at DESC, id DESC";
const SELECT_BY_COMPLETED: &str = "SELECT id, text, completed, created_at FROM items \
     WHERE completed = ? ORDER BY created_at DESC, id DESC";

#[derive(Clone)]
pub struct ItemStorage {
    pool: SqlitePool,
}

impl ItemStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new, not-yet-completed item.
    ///
    /// The text is stored exactly as given; only the emptiness check looks at
    /// the trimmed form.
    pub async fn create(&self, text: &str) -> StorageResult<Item> {
        validate_text(text)?;

        let now = Utc::now();
        debug!("Creating item ({} chars)", text.chars().count());

        let result =
            sqlx::query("INSERT INTO items (text, completed, created_at) VALUES (?, 0, ?)")
                .bind(text)
                .bind(now)
                .execute(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        self.get(result.last_insert_rowid()).await
    }

    /// Items matching the filter, newest first. Always re-read from the database.
    pub async fn list(&self, filter: Filter) -> StorageResult<Vec<Item>> {
        debug!("Listing items (filter: {})", filter);

        let rows = match filter.completed() {
            None => sqlx::query(SELECT_ALL).fetch_all(&self.pool).await,
            Some(completed) => {
                sqlx::query(SELECT_BY_COMPLETED)
                    .bind(completed)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_item).collect()
    }

    /// Number of items matching the filter
    pub async fn count(&self, filter: Filter) -> StorageResult<i64> {
        let count = match filter.completed() {
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items")
                    .fetch_one(&self.pool)
                    .await
            }
            Some(completed) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items WHERE completed = ?")
                    .bind(completed)
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(StorageError::Sqlx)?;

        Ok(count)
    }

    /// Active and completed totals as two independent counts
    pub async fn counts(&self) -> StorageResult<ItemCounts> {
        let active = self.count(Filter::Active).await?;
        let completed = self.count(Filter::Completed).await?;
        Ok(ItemCounts { active, completed })
    }

    pub async fn get(&self, id: i64) -> StorageResult<Item> {
        debug!("Fetching item: {}", id);

        let row = sqlx::query("SELECT id, text, completed, created_at FROM items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(r) => row_to_item(&r),
            None => Err(StorageError::NotFound(id)),
        }
    }

    /// Persist a new `completed` value, touching no other column
    pub async fn set_completed(&self, id: i64, completed: bool) -> StorageResult<()> {
        debug!("Setting item {} completed = {}", id, completed);

        let result = sqlx::query("UPDATE items SET completed = ? WHERE id = ?")
            .bind(completed)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id));
        }
        Ok(())
    }

    /// Flip `completed` and return the item as written.
    ///
    /// Read then write with no version check: concurrent toggles on the same
    /// id are last-write-wins.
    pub async fn toggle(&self, id: i64) -> StorageResult<Item> {
        let mut item = self.get(id).await?;
        item.completed = !item.completed;
        self.set_completed(id, item.completed).await?;
        Ok(item)
    }

    pub async fn delete(&self, id: i64) -> StorageResult<()> {
        debug!("Deleting item: {}", id);

        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id));
        }
        Ok(())
    }

    /// Remove every completed item. Returns how many went; zero is fine.
    pub async fn delete_where_completed(&self) -> StorageResult<u64> {
        let result = sqlx::query("DELETE FROM items WHERE completed = 1")
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        debug!("Cleared {} completed items", result.rows_affected());
        Ok(result.rows_affected())
    }
}

/// Reject text that is blank once trimmed or longer than [`MAX_TEXT_LENGTH`]
pub fn validate_text(text: &str) -> StorageResult<()> {
    if text.trim().is_empty() {
        return Err(StorageError::EmptyText);
    }
    let len = text.chars().count();
    if len > MAX_TEXT_LENGTH {
        return Err(StorageError::TextTooLong {
            len,
            max: MAX_TEXT_LENGTH,
        });
    }
    Ok(())
}

fn row_to_item(row: &SqliteRow) -> StorageResult<Item> {
    Ok(Item {
        id: row.try_get("id")?,
        text: row.try_get("text")?,
        completed: row.try_get("completed")?,
        created_at: row.try_get("created_at")?,
    })
}
