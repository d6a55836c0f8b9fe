//! Remote store abstraction
//!
//! The controller only ever talks to the persisted collection through the
//! [`RemoteStore`] trait. Implementations:
//!
//! - [`http::HttpRemoteStore`] — the PostgREST-dialect adapter used in
//!   production
//! - [`memory::MemoryRemoteStore`] — in-process rows with failure injection,
//!   for tests and local experimentation
//!
//! Errors come in one category per operation ([`RemoteError`]). The payload
//! string is diagnostic only; user-facing wording is the controller's job.

pub mod http;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Item, NewItem};

/// Errors from remote store operations, one category per operation
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Listing the collection failed
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Inserting a new item failed
    #[error("insert failed: {0}")]
    Insert(String),

    /// Updating an existing item failed (including an unmatched id)
    #[error("update failed: {0}")]
    Update(String),

    /// Deleting an item failed (including an unmatched id)
    #[error("delete failed: {0}")]
    Delete(String),
}

/// Result type for remote store operations
pub type RemoteResult<T> = Result<T, RemoteError>;

/// CRUD access to the persisted `guest_list` collection
///
/// Each call is a single remote round trip. No batching, no retries, no
/// client-side timeout: suspension is bounded by the transport.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the full collection, ascending by `created_at`
    async fn list_all(&self) -> RemoteResult<Vec<Item>>;

    /// Insert one item; `id` and `created_at` are assigned by the store
    /// and not returned
    async fn create(&self, item: NewItem) -> RemoteResult<()>;

    /// Set the completion flag on one item
    ///
    /// An id that matches nothing is a failure, not a silent success.
    async fn set_completed(&self, id: Uuid, completed: bool) -> RemoteResult<()>;

    /// Replace the task text on one item
    async fn rename(&self, id: Uuid, task_name: &str) -> RemoteResult<()>;

    /// Delete one item
    ///
    /// An id that matches nothing is a failure, not a silent success.
    async fn remove(&self, id: Uuid) -> RemoteResult<()>;
}

// Lets a single store instance be shared between a controller and a test
// harness (or several controllers) without a wrapper type.
#[async_trait]
impl<S: RemoteStore + ?Sized> RemoteStore for Arc<S> {
    async fn list_all(&self) -> RemoteResult<Vec<Item>> {
        (**self).list_all().await
    }

    async fn create(&self, item: NewItem) -> RemoteResult<()> {
        (**self).create(item).await
    }

    async fn set_completed(&self, id: Uuid, completed: bool) -> RemoteResult<()> {
        (**self).set_completed(id, completed).await
    }

    async fn rename(&self, id: Uuid, task_name: &str) -> RemoteResult<()> {
        (**self).rename(id, task_name).await
    }

    async fn remove(&self, id: Uuid) -> RemoteResult<()> {
        (**self).remove(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories_display() {
        let fetch = RemoteError::Fetch("connection refused".to_string());
        let insert = RemoteError::Insert("503".to_string());
        let update = RemoteError::Update("no row matched".to_string());
        let delete = RemoteError::Delete("no row matched".to_string());

        assert!(fetch.to_string().starts_with("fetch failed"));
        assert!(insert.to_string().starts_with("insert failed"));
        assert!(update.to_string().starts_with("update failed"));
        assert!(delete.to_string().starts_with("delete failed"));
    }
}
