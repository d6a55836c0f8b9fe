//! Data models for potluck
//!
//! Defines the checklist entry (`Item`) and the insert payload (`NewItem`).
//! Field names match the remote `guest_list` collection exactly, so the
//! structs serialize straight onto the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One checklist entry
///
/// `id` and `created_at` are assigned by the remote store at creation and
/// never change; `created_at` is the sole sort key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Unique identifier (server-assigned)
    pub id: Uuid,
    /// Creation timestamp (server-assigned)
    pub created_at: DateTime<Utc>,
    /// The task text
    pub task_name: String,
    /// Whether the task has been checked off
    pub is_completed: bool,
    /// Display name of whoever added the item (immutable after creation)
    pub author_name: String,
}

/// Insert payload for a new entry
///
/// Deliberately has no `id` or `created_at`: those fields only exist once
/// the remote store has accepted the row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewItem {
    pub task_name: String,
    pub author_name: String,
    pub is_completed: bool,
}

impl NewItem {
    /// Build an insert payload; new entries always start unchecked
    pub fn new(task_name: impl Into<String>, author_name: impl Into<String>) -> Self {
        Self {
            task_name: task_name.into(),
            author_name: author_name.into(),
            is_completed: false,
        }
    }
}

/// Split one canonically ordered sequence into (pending, completed)
///
/// Both groups preserve the relative order of the input.
pub fn partition(items: &[Item]) -> (Vec<Item>, Vec<Item>) {
    items.iter().cloned().partition(|item| !item.is_completed)
}
