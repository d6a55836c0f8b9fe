//! In-memory item collection
//!
//! `ItemCollection` is the controller's private, id-indexed view of the
//! list. Consumers only ever see it as the canonically ordered sequence:
//! `created_at` ascending, ties broken by `id` so iteration is
//! deterministic.
//!
//! Local patches are idempotent against a missing id: patching or removing
//! an id that is not present is a no-op at this layer. Whether that id was
//! supposed to exist is the remote store's concern, not the collection's.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::Item;

/// Id-indexed set of items with canonical ordered iteration
#[derive(Debug, Default, Clone)]
pub struct ItemCollection {
    items: HashMap<Uuid, Item>,
}

impl ItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wholesale replacement, used after a reload
    pub fn replace_all(&mut self, items: Vec<Item>) {
        self.items = items.into_iter().map(|item| (item.id, item)).collect();
    }

    /// Set the completion flag on one item; no-op if the id is absent
    pub fn patch_completed(&mut self, id: Uuid, completed: bool) {
        if let Some(item) = self.items.get_mut(&id) {
            item.is_completed = completed;
        }
    }

    /// Set the task text on one item; no-op if the id is absent
    pub fn patch_task_name(&mut self, id: Uuid, task_name: impl Into<String>) {
        if let Some(item) = self.items.get_mut(&id) {
            item.task_name = task_name.into();
        }
    }

    /// Remove one item; no-op if the id is absent
    pub fn remove_by_id(&mut self, id: Uuid) {
        self.items.remove(&id);
    }

    /// Look up a single item
    pub fn get(&self, id: Uuid) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The canonically ordered sequence: `created_at` ascending, then `id`
    pub fn ordered(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self.items.values().cloned().collect();
        items.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn item(id: Uuid, task: &str, secs: i64) -> Item {
        Item {
            id,
            created_at: DateTime::from_timestamp(secs, 0).unwrap(),
            task_name: task.to_string(),
            is_completed: false,
            author_name: "Alex".to_string(),
        }
    }

    #[test]
    fn test_replace_all_and_ordering() {
        let mut coll = ItemCollection::new();
        let a = item(Uuid::new_v4(), "late", 30);
        let b = item(Uuid::new_v4(), "early", 10);
        let c = item(Uuid::new_v4(), "middle", 20);

        coll.replace_all(vec![a, b, c]);

        let ordered = coll.ordered();
        let names: Vec<_> = ordered.iter().map(|i| i.task_name.as_str()).collect();
        assert_eq!(names, vec!["early", "middle", "late"]);
    }

    #[test]
    fn test_ordering_tie_broken_by_id() {
        let mut coll = ItemCollection::new();
        let mut ids = [Uuid::new_v4(), Uuid::new_v4()];
        ids.sort();

        coll.replace_all(vec![item(ids[1], "second", 10), item(ids[0], "first", 10)]);

        let ordered = coll.ordered();
        assert_eq!(ordered[0].id, ids[0]);
        assert_eq!(ordered[1].id, ids[1]);
    }

    #[test]
    fn test_patch_completed() {
        let mut coll = ItemCollection::new();
        let id = Uuid::new_v4();
        coll.replace_all(vec![item(id, "task", 1)]);

        coll.patch_completed(id, true);
        assert!(coll.get(id).unwrap().is_completed);

        coll.patch_completed(id, false);
        assert!(!coll.get(id).unwrap().is_completed);
    }

    #[test]
    fn test_patch_task_name() {
        let mut coll = ItemCollection::new();
        let id = Uuid::new_v4();
        coll.replace_all(vec![item(id, "old", 1)]);

        coll.patch_task_name(id, "new");
        assert_eq!(coll.get(id).unwrap().task_name, "new");
    }

    #[test]
    fn test_patches_on_missing_id_are_noops() {
        let mut coll = ItemCollection::new();
        let id = Uuid::new_v4();
        coll.replace_all(vec![item(id, "task", 1)]);

        let absent = Uuid::new_v4();
        coll.patch_completed(absent, true);
        coll.patch_task_name(absent, "ghost");
        coll.remove_by_id(absent);

        assert_eq!(coll.len(), 1);
        let kept = coll.get(id).unwrap();
        assert_eq!(kept.task_name, "task");
        assert!(!kept.is_completed);
    }

    #[test]
    fn test_remove_by_id() {
        let mut coll = ItemCollection::new();
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        coll.replace_all(vec![item(id, "gone", 1), item(other, "kept", 2)]);

        coll.remove_by_id(id);

        assert_eq!(coll.len(), 1);
        assert!(coll.get(id).is_none());
        assert!(coll.get(other).is_some());
    }

    #[test]
    fn test_replace_all_discards_previous_items() {
        let mut coll = ItemCollection::new();
        let old = Uuid::new_v4();
        coll.replace_all(vec![item(old, "old", 1)]);

        let new = Uuid::new_v4();
        coll.replace_all(vec![item(new, "new", 2)]);

        assert!(coll.get(old).is_none());
        assert!(coll.get(new).is_some());
        assert_eq!(coll.len(), 1);
    }
}
