//! Synchronization controller
//!
//! `SyncController` reconciles the in-memory [`ItemCollection`] with the
//! remote store across the four mutation flows plus full reload. The update
//! policy is confirm-then-apply: local state changes only after the remote
//! call has succeeded, so there is no rollback path.
//!
//! The one asymmetry is deliberate and load-bearing: a successful add
//! re-fetches the whole collection, because the create call does not return
//! the server-assigned `id`/`created_at`; toggle, rename, and delete apply
//! a targeted local patch instead, since the caller already knows every
//! field that changed.
//!
//! Consumers read three values and nothing else: the ordered item snapshot,
//! the loading flag, and the current error message. Remote failures never
//! propagate past this layer; each is converted into exactly one fixed
//! user-facing message.
//!
//! Internal state sits behind a std mutex that is never held across an
//! await, so operations on different items may interleave freely. The
//! controller does not deduplicate concurrent operations on the same item;
//! the per-item busy gate is the presentation layer's job.

use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::collection::ItemCollection;
use crate::models::{Item, NewItem};
use crate::remote::RemoteStore;

/// Message shown when a reload fails
pub const LOAD_FAILED: &str = "Could not load the list. Please try again.";
/// Message shown when an add fails at the remote call
pub const ADD_FAILED: &str = "Failed to add item. Please try again.";
/// Message shown when a toggle or rename fails
pub const UPDATE_FAILED: &str = "Failed to update item.";
/// Message shown when a delete fails
pub const DELETE_FAILED: &str = "Failed to delete item.";

/// Precondition rejection: add was attempted with no acting-user name
///
/// This is not a remote failure and never enters the error signal; the
/// caller surfaces it immediately (a prompt), and no remote call happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a display name is required before adding items")]
pub struct MissingActorName;

/// The three UI-facing values, guarded together
struct ViewState {
    items: ItemCollection,
    loading: bool,
    error: Option<String>,
}

/// Reconciles local list state with the remote collection
pub struct SyncController<S> {
    store: S,
    state: Mutex<ViewState>,
}

impl<S: RemoteStore> SyncController<S> {
    /// Build a controller around an injected remote store
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: Mutex::new(ViewState {
                items: ItemCollection::new(),
                loading: false,
                error: None,
            }),
        }
    }

    /// Full reload: replace the collection wholesale from the remote store
    ///
    /// On failure the prior collection is left untouched and the load
    /// message is set. A successful reload clears any pending error.
    pub async fn load(&self) {
        self.set_loading(true);

        match self.store.list_all().await {
            Ok(items) => {
                debug!("reload fetched {} item(s)", items.len());
                let mut state = self.state.lock().unwrap();
                state.items.replace_all(items);
                state.error = None;
                state.loading = false;
            }
            Err(e) => {
                warn!("reload failed: {}", e);
                let mut state = self.state.lock().unwrap();
                state.error = Some(LOAD_FAILED.to_string());
                state.loading = false;
            }
        }
    }

    /// Add a new entry authored by `author_name`
    ///
    /// Rejected before any remote call when the actor name is blank. Task
    /// text is trimmed; blank text is declined without a remote call (the
    /// input widget is the primary guard). On remote success the whole
    /// collection is re-fetched, because the server-assigned identity
    /// fields are unknown until then.
    pub async fn add(&self, task_name: &str, author_name: &str) -> Result<(), MissingActorName> {
        let author = author_name.trim();
        if author.is_empty() {
            return Err(MissingActorName);
        }

        let task = task_name.trim();
        if task.is_empty() {
            debug!("add declined: blank task text");
            return Ok(());
        }

        if let Err(e) = self.store.create(NewItem::new(task, author)).await {
            warn!("add failed: {}", e);
            self.set_error(ADD_FAILED);
            return Ok(());
        }

        self.load().await;
        Ok(())
    }

    /// Flip the completion flag on one entry
    ///
    /// `currently_completed` is the caller's view of the flag; the remote
    /// store receives its negation, and on success the same negation is
    /// patched locally without a reload.
    pub async fn toggle(&self, id: Uuid, currently_completed: bool) {
        let target = !currently_completed;

        if let Err(e) = self.store.set_completed(id, target).await {
            warn!("toggle failed for {}: {}", id, e);
            self.set_error(UPDATE_FAILED);
            return;
        }

        self.state.lock().unwrap().items.patch_completed(id, target);
    }

    /// Replace the task text on one entry
    ///
    /// Blank text after trimming is declined without a remote call.
    pub async fn rename(&self, id: Uuid, task_name: &str) {
        let task = task_name.trim();
        if task.is_empty() {
            debug!("rename declined: blank task text");
            return;
        }

        if let Err(e) = self.store.rename(id, task).await {
            warn!("rename failed for {}: {}", id, e);
            self.set_error(UPDATE_FAILED);
            return;
        }

        self.state.lock().unwrap().items.patch_task_name(id, task);
    }

    /// Delete one entry
    ///
    /// The remote call is issued regardless of whether the id is present
    /// locally; whether deleting a nonexistent row succeeds is the remote
    /// store's concern.
    pub async fn delete(&self, id: Uuid) {
        if let Err(e) = self.store.remove(id).await {
            warn!("delete failed for {}: {}", id, e);
            self.set_error(DELETE_FAILED);
            return;
        }

        self.state.lock().unwrap().items.remove_by_id(id);
    }

    /// Ordered snapshot of the collection (`created_at` ascending)
    pub fn items(&self) -> Vec<Item> {
        self.state.lock().unwrap().items.ordered()
    }

    /// Whether a reload is in flight
    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    /// The current error message, if one is pending
    pub fn error(&self) -> Option<String> {
        self.state.lock().unwrap().error.clone()
    }

    /// Drop the current error message (user dismissal)
    pub fn dismiss_error(&self) {
        self.state.lock().unwrap().error = None;
    }

    fn set_loading(&self, loading: bool) {
        self.state.lock().unwrap().loading = loading;
    }

    fn set_error(&self, message: &str) {
        self.state.lock().unwrap().error = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::remote::memory::MemoryRemoteStore;

    async fn seeded(tasks: &[&str]) -> (Arc<MemoryRemoteStore>, SyncController<Arc<MemoryRemoteStore>>) {
        let store = Arc::new(MemoryRemoteStore::new());
        for task in tasks {
            store.create(NewItem::new(*task, "Alex")).await.unwrap();
        }
        let controller = SyncController::new(Arc::clone(&store));
        (store, controller)
    }

    #[tokio::test]
    async fn test_load_replaces_collection_in_order() {
        let (_store, controller) = seeded(&["first", "second"]).await;

        controller.load().await;

        let items = controller.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].task_name, "first");
        assert_eq!(items[1].task_name, "second");
        assert!(!controller.is_loading());
        assert_eq!(controller.error(), None);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_prior_collection() {
        let (store, controller) = seeded(&["kept"]).await;
        controller.load().await;

        store.set_fail_fetch(true);
        controller.load().await;

        assert_eq!(controller.items().len(), 1);
        assert_eq!(controller.error(), Some(LOAD_FAILED.to_string()));
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_successful_load_clears_error() {
        let (store, controller) = seeded(&[]).await;
        store.set_fail_fetch(true);
        controller.load().await;
        assert!(controller.error().is_some());

        store.set_fail_fetch(false);
        controller.load().await;
        assert_eq!(controller.error(), None);
    }

    #[tokio::test]
    async fn test_add_with_blank_actor_is_rejected_before_remote() {
        let (store, controller) = seeded(&[]).await;

        let result = controller.add("Buy milk", "   ").await;
        assert_eq!(result, Err(MissingActorName));
        assert_eq!(store.insert_calls(), 0);
        assert!(controller.items().is_empty());
        // Precondition rejection, not a persisted error
        assert_eq!(controller.error(), None);
    }

    #[tokio::test]
    async fn test_add_with_blank_task_never_calls_create() {
        let (store, controller) = seeded(&[]).await;

        controller.add("   ", "Alex").await.unwrap();

        assert_eq!(store.insert_calls(), 0);
        assert!(controller.items().is_empty());
    }

    #[tokio::test]
    async fn test_add_trims_fields_and_reloads() {
        let (store, controller) = seeded(&[]).await;

        controller.add("  Buy milk  ", "  Alex  ").await.unwrap();

        // One reload after the create, nothing before
        assert_eq!(store.fetch_calls(), 1);
        let items = controller.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].task_name, "Buy milk");
        assert_eq!(items[0].author_name, "Alex");
        assert!(!items[0].is_completed);
    }

    #[tokio::test]
    async fn test_failed_add_sets_message_and_skips_reload() {
        let (store, controller) = seeded(&[]).await;
        store.set_fail_insert(true);

        controller.add("Buy milk", "Alex").await.unwrap();

        assert_eq!(controller.error(), Some(ADD_FAILED.to_string()));
        assert!(controller.items().is_empty());
        assert_eq!(store.fetch_calls(), 0);
    }

    #[tokio::test]
    async fn test_toggle_patches_locally_without_reload() {
        let (store, controller) = seeded(&["task"]).await;
        controller.load().await;
        let id = controller.items()[0].id;
        let fetches_before = store.fetch_calls();

        controller.toggle(id, false).await;

        assert!(controller.items()[0].is_completed);
        assert_eq!(store.fetch_calls(), fetches_before);
    }

    #[tokio::test]
    async fn test_double_toggle_restores_everything() {
        let (_store, controller) = seeded(&["task"]).await;
        controller.load().await;
        let before = controller.items()[0].clone();

        controller.toggle(before.id, false).await;
        controller.toggle(before.id, true).await;

        let after = controller.items()[0].clone();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_toggle_failure_leaves_local_state() {
        let (store, controller) = seeded(&["task"]).await;
        controller.load().await;
        let id = controller.items()[0].id;

        store.set_fail_update(true);
        controller.toggle(id, false).await;

        assert!(!controller.items()[0].is_completed);
        assert_eq!(controller.error(), Some(UPDATE_FAILED.to_string()));
    }

    #[tokio::test]
    async fn test_rename_with_blank_text_never_calls_remote() {
        let (store, controller) = seeded(&["keep me"]).await;
        controller.load().await;
        let id = controller.items()[0].id;
        let updates_before = store.update_calls();

        controller.rename(id, "   ").await;

        assert_eq!(store.update_calls(), updates_before);
        assert_eq!(controller.items()[0].task_name, "keep me");
    }

    #[tokio::test]
    async fn test_rename_trims_and_patches() {
        let (_store, controller) = seeded(&["old"]).await;
        controller.load().await;
        let id = controller.items()[0].id;

        controller.rename(id, "  new text  ").await;

        assert_eq!(controller.items()[0].task_name, "new text");
    }

    #[tokio::test]
    async fn test_rename_failure_leaves_local_state() {
        let (store, controller) = seeded(&["old"]).await;
        controller.load().await;
        let id = controller.items()[0].id;

        store.set_fail_update(true);
        controller.rename(id, "new").await;

        assert_eq!(controller.items()[0].task_name, "old");
        assert_eq!(controller.error(), Some(UPDATE_FAILED.to_string()));
    }

    #[tokio::test]
    async fn test_delete_removes_locally_on_success() {
        let (_store, controller) = seeded(&["gone"]).await;
        controller.load().await;
        let id = controller.items()[0].id;

        controller.delete(id).await;

        assert!(controller.items().is_empty());
        assert_eq!(controller.error(), None);
    }

    #[tokio::test]
    async fn test_delete_of_locally_absent_id_still_calls_remote() {
        let (store, controller) = seeded(&[]).await;
        controller.load().await;

        controller.delete(Uuid::new_v4()).await;

        assert_eq!(store.delete_calls(), 1);
        // The memory store reports an unmatched id as a failure
        assert_eq!(controller.error(), Some(DELETE_FAILED.to_string()));
        assert!(controller.items().is_empty());
    }

    #[tokio::test]
    async fn test_newer_error_overwrites_older() {
        let (store, controller) = seeded(&["task"]).await;
        controller.load().await;
        let id = controller.items()[0].id;

        store.set_fail_update(true);
        controller.toggle(id, false).await;
        assert_eq!(controller.error(), Some(UPDATE_FAILED.to_string()));

        store.set_fail_delete(true);
        controller.delete(id).await;
        assert_eq!(controller.error(), Some(DELETE_FAILED.to_string()));
    }

    #[tokio::test]
    async fn test_dismiss_error() {
        let (store, controller) = seeded(&[]).await;
        store.set_fail_fetch(true);
        controller.load().await;
        assert!(controller.error().is_some());

        controller.dismiss_error();
        assert_eq!(controller.error(), None);
    }
}
