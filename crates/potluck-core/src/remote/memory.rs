//! In-process remote store
//!
//! Backs the [`RemoteStore`] contract with a plain `Vec<Item>` behind a
//! mutex. Ids and `created_at` values are assigned here, the same way the
//! real service assigns them server-side; timestamps are synthetic and
//! strictly increasing so ordering tests stay deterministic.
//!
//! Each operation has a failure switch and a call counter, which is what
//! lets the test suite assert properties like "add with a blank actor name
//! never calls create".

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::DateTime;
use uuid::Uuid;

use super::{RemoteError, RemoteResult, RemoteStore};
use crate::models::{Item, NewItem};

/// Epoch base for synthetic timestamps
const TIMESTAMP_BASE: i64 = 1_700_000_000;

/// In-memory implementation of [`RemoteStore`] with failure injection
#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    rows: Mutex<Vec<Item>>,
    next_seq: AtomicI64,

    fail_fetch: AtomicBool,
    fail_insert: AtomicBool,
    fail_update: AtomicBool,
    fail_delete: AtomicBool,

    fetch_calls: AtomicUsize,
    insert_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `list_all` calls fail
    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `create` calls fail
    pub fn set_fail_insert(&self, fail: bool) {
        self.fail_insert.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `set_completed`/`rename` calls fail
    pub fn set_fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `remove` calls fail
    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Current row count, bypassing the trait (test convenience)
    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// The id of the most recently inserted row, if any (test convenience)
    pub fn last_inserted_id(&self) -> Option<Uuid> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .max_by_key(|item| item.created_at)
            .map(|item| item.id)
    }
}

#[async_trait::async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn list_all(&self) -> RemoteResult<Vec<Item>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(RemoteError::Fetch("injected failure".to_string()));
        }

        let mut items = self.rows.lock().unwrap().clone();
        items.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(items)
    }

    async fn create(&self, item: NewItem) -> RemoteResult<()> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(RemoteError::Insert("injected failure".to_string()));
        }
        if item.task_name.trim().is_empty() || item.author_name.trim().is_empty() {
            return Err(RemoteError::Insert("blank field rejected".to_string()));
        }

        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let row = Item {
            id: Uuid::new_v4(),
            created_at: DateTime::from_timestamp(TIMESTAMP_BASE + seq, 0)
                .expect("synthetic timestamp in range"),
            task_name: item.task_name,
            is_completed: item.is_completed,
            author_name: item.author_name,
        };
        self.rows.lock().unwrap().push(row);
        Ok(())
    }

    async fn set_completed(&self, id: Uuid, completed: bool) -> RemoteResult<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(RemoteError::Update("injected failure".to_string()));
        }

        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.is_completed = completed;
                Ok(())
            }
            None => Err(RemoteError::Update(format!("no row matched id {}", id))),
        }
    }

    async fn rename(&self, id: Uuid, task_name: &str) -> RemoteResult<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(RemoteError::Update("injected failure".to_string()));
        }

        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.task_name = task_name.to_string();
                Ok(())
            }
            None => Err(RemoteError::Update(format!("no row matched id {}", id))),
        }
    }

    async fn remove(&self, id: Uuid) -> RemoteResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(RemoteError::Delete("injected failure".to_string()));
        }

        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|item| item.id != id);
        if rows.len() == before {
            return Err(RemoteError::Delete(format!("no row matched id {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_identity_and_orders() {
        let store = MemoryRemoteStore::new();
        store.create(NewItem::new("first", "Alex")).await.unwrap();
        store.create(NewItem::new("second", "Beck")).await.unwrap();

        let items = store.list_all().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].task_name, "first");
        assert_eq!(items[1].task_name, "second");
        assert!(items[0].created_at < items[1].created_at);
        assert_ne!(items[0].id, items[1].id);
        assert!(!items[0].is_completed);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        let store = MemoryRemoteStore::new();
        let err = store.create(NewItem::new("  ", "Alex")).await.unwrap_err();
        assert!(matches!(err, RemoteError::Insert(_)));
        assert_eq!(store.row_count(), 0);
    }

    #[tokio::test]
    async fn test_set_completed_unmatched_id_fails() {
        let store = MemoryRemoteStore::new();
        let err = store.set_completed(Uuid::new_v4(), true).await.unwrap_err();
        assert!(matches!(err, RemoteError::Update(_)));
    }

    #[tokio::test]
    async fn test_remove_unmatched_id_fails() {
        let store = MemoryRemoteStore::new();
        let err = store.remove(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, RemoteError::Delete(_)));
    }

    #[tokio::test]
    async fn test_failure_injection_and_counters() {
        let store = MemoryRemoteStore::new();

        store.set_fail_fetch(true);
        assert!(store.list_all().await.is_err());
        store.set_fail_fetch(false);
        assert!(store.list_all().await.is_ok());
        assert_eq!(store.fetch_calls(), 2);

        store.set_fail_insert(true);
        assert!(store.create(NewItem::new("task", "Alex")).await.is_err());
        assert_eq!(store.insert_calls(), 1);
        assert_eq!(store.row_count(), 0);
    }

    #[tokio::test]
    async fn test_rename_replaces_text_only() {
        let store = MemoryRemoteStore::new();
        store.create(NewItem::new("old", "Alex")).await.unwrap();
        let id = store.last_inserted_id().unwrap();

        store.rename(id, "new").await.unwrap();

        let items = store.list_all().await.unwrap();
        assert_eq!(items[0].task_name, "new");
        assert_eq!(items[0].author_name, "Alex");
        assert!(!items[0].is_completed);
    }
}
