// ABOUTME: Integration tests for item storage operations
// ABOUTME: Covers filtering, ordering, counts, toggling, deletion, and id stability

use pretty_assertions::assert_eq;
use tasklist_storage::{Database, Filter, Item, ItemStorage, StorageError};
use tempfile::TempDir;

/// Helper to create an in-memory database for testing
async fn create_test_db() -> Database {
    Database::open_in_memory().await.unwrap()
}

async fn seed(storage: &ItemStorage, texts: &[&str]) -> Vec<Item> {
    let mut items = Vec::new();
    for text in texts {
        items.push(storage.create(text).await.unwrap());
    }
    items
}

fn texts(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.text.as_str()).collect()
}

#[tokio::test]
async fn test_create_item() {
    let db = create_test_db().await;
    let storage = db.items();

    let item = storage.create("Buy milk").await.unwrap();

    assert_eq!(item.text, "Buy milk");
    assert!(!item.completed);
    assert!(item.id > 0);

    let fetched = storage.get(item.id).await.unwrap();
    assert_eq!(fetched, item);
}

#[tokio::test]
async fn test_create_keeps_text_verbatim() {
    let db = create_test_db().await;
    let storage = db.items();

    let item = storage.create("  Buy milk  ").await.unwrap();
    let fetched = storage.get(item.id).await.unwrap();

    assert_eq!(fetched.text, "  Buy milk  ");
}

#[tokio::test]
async fn test_create_blank_text_creates_nothing() {
    let db = create_test_db().await;
    let storage = db.items();
    storage.create("existing").await.unwrap();

    let result = storage.create("   ").await;

    assert!(matches!(result, Err(StorageError::EmptyText)));
    assert_eq!(storage.count(Filter::All).await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_rejects_overlong_text() {
    let db = create_test_db().await;
    let storage = db.items();

    let result = storage.create(&"a".repeat(141)).await;
    assert!(matches!(result, Err(StorageError::TextTooLong { .. })));

    let item = storage.create(&"a".repeat(140)).await.unwrap();
    assert_eq!(item.text.chars().count(), 140);
}

#[tokio::test]
async fn test_duplicate_text_allowed() {
    let db = create_test_db().await;
    let storage = db.items();

    let first = storage.create("same").await.unwrap();
    let second = storage.create("same").await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(storage.count(Filter::All).await.unwrap(), 2);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let db = create_test_db().await;
    let storage = db.items();
    seed(storage, &["first", "second", "third"]).await;

    let items = storage.list(Filter::All).await.unwrap();

    assert_eq!(texts(&items), vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_list_ties_broken_by_id() {
    let db = create_test_db().await;
    let storage = db.items();

    // Force identical timestamps
    let stamp = "2024-01-01T00:00:00+00:00";
    for text in ["a", "b", "c"] {
        sqlx::query("INSERT INTO items (text, completed, created_at) VALUES (?, 0, ?)")
            .bind(text)
            .bind(stamp)
            .execute(db.pool())
            .await
            .unwrap();
    }

    let items = storage.list(Filter::All).await.unwrap();
    assert_eq!(texts(&items), vec!["c", "b", "a"]);
}

#[tokio::test]
async fn test_list_filters() {
    let db = create_test_db().await;
    let storage = db.items();
    let items = seed(storage, &["a", "b", "c", "d"]).await;
    storage.set_completed(items[0].id, true).await.unwrap();
    storage.set_completed(items[2].id, true).await.unwrap();

    let active = storage.list(Filter::Active).await.unwrap();
    let completed = storage.list(Filter::Completed).await.unwrap();
    let all = storage.list(Filter::All).await.unwrap();

    assert_eq!(texts(&active), vec!["d", "b"]);
    assert!(active.iter().all(|i| !i.completed));
    assert_eq!(texts(&completed), vec!["c", "a"]);
    assert!(completed.iter().all(|i| i.completed));
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn test_counts_add_up() {
    let db = create_test_db().await;
    let storage = db.items();
    let items = seed(storage, &["a", "b", "c", "d", "e"]).await;
    for item in &items[..3] {
        storage.set_completed(item.id, true).await.unwrap();
    }

    let counts = storage.counts().await.unwrap();

    assert_eq!(counts.active, 2);
    assert_eq!(counts.completed, 3);
    assert_eq!(counts.all(), storage.count(Filter::All).await.unwrap());
}

#[tokio::test]
async fn test_get_missing_item() {
    let db = create_test_db().await;

    let result = db.items().get(999).await;

    assert!(matches!(result, Err(StorageError::NotFound(999))));
}

#[tokio::test]
async fn test_toggle_twice_restores_state() {
    let db = create_test_db().await;
    let storage = db.items();
    let item = storage.create("flip me").await.unwrap();

    let once = storage.toggle(item.id).await.unwrap();
    assert!(once.completed);
    assert!(storage.get(item.id).await.unwrap().completed);

    let twice = storage.toggle(item.id).await.unwrap();
    assert!(!twice.completed);
    assert_eq!(storage.get(item.id).await.unwrap(), item);
}

#[tokio::test]
async fn test_toggle_missing_item() {
    let db = create_test_db().await;
    let storage = db.items();

    for _ in 0..2 {
        let result = storage.toggle(42).await;
        assert!(matches!(result, Err(StorageError::NotFound(42))));
    }
}

#[tokio::test]
async fn test_set_completed_missing_item() {
    let db = create_test_db().await;

    let result = db.items().set_completed(7, true).await;

    assert!(matches!(result, Err(StorageError::NotFound(7))));
}

#[tokio::test]
async fn test_delete_item() {
    let db = create_test_db().await;
    let storage = db.items();
    let item = storage.create("doomed").await.unwrap();

    storage.delete(item.id).await.unwrap();

    assert!(matches!(
        storage.get(item.id).await,
        Err(StorageError::NotFound(_))
    ));
    assert!(matches!(
        storage.delete(item.id).await,
        Err(StorageError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_deleted_ids_not_reused() {
    let db = create_test_db().await;
    let storage = db.items();
    let items = seed(storage, &["a", "b"]).await;
    let max_id = items.iter().map(|i| i.id).max().unwrap();

    storage.delete(items[1].id).await.unwrap();
    let next = storage.create("c").await.unwrap();

    assert!(next.id > max_id);
    assert!(items.iter().all(|i| i.id != next.id));
}

#[tokio::test]
async fn test_delete_where_completed() {
    let db = create_test_db().await;
    let storage = db.items();
    let items = seed(storage, &["c1", "a1", "c2", "a2", "c3"]).await;
    for item in items.iter().filter(|i| i.text.starts_with('c')) {
        storage.set_completed(item.id, true).await.unwrap();
    }

    let removed = storage.delete_where_completed().await.unwrap();

    assert_eq!(removed, 3);
    let remaining = storage.list(Filter::All).await.unwrap();
    assert_eq!(texts(&remaining), vec!["a2", "a1"]);

    // Nothing left to clear: no error, nothing changes
    let removed_again = storage.delete_where_completed().await.unwrap();
    assert_eq!(removed_again, 0);
    assert_eq!(storage.list(Filter::All).await.unwrap(), remaining);
}

#[tokio::test]
async fn test_file_database_persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("tasklist.db");

    let db = Database::open(&path).await.unwrap();
    let item = db.items().create("survives restart").await.unwrap();
    db.items().toggle(item.id).await.unwrap();
    db.close().await;

    let reopened = Database::open(&path).await.unwrap();
    let fetched = reopened.items().get(item.id).await.unwrap();
    assert_eq!(fetched.text, "survives restart");
    assert!(fetched.completed);
    reopened.close().await;
}
