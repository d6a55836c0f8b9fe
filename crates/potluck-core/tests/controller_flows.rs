//! End-to-end controller flows against the in-memory remote store

use std::sync::Arc;

use potluck_core::controller::ADD_FAILED;
use potluck_core::{partition, MemoryRemoteStore, NewItem, RemoteStore, SyncController};

#[tokio::test]
async fn add_reload_toggle_round_trip() {
    let store = Arc::new(MemoryRemoteStore::new());
    let controller = SyncController::new(Arc::clone(&store));

    controller.load().await;
    assert!(controller.items().is_empty());

    // Add goes through create and then a single reload
    controller.add("Buy milk", "Alex").await.unwrap();
    let items = controller.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].task_name, "Buy milk");
    assert_eq!(items[0].author_name, "Alex");
    assert!(!items[0].is_completed);

    // Toggle patches locally; no further reload happens
    let fetches_before = store.fetch_calls();
    controller.toggle(items[0].id, items[0].is_completed).await;
    assert!(controller.items()[0].is_completed);
    assert_eq!(store.fetch_calls(), fetches_before);
}

#[tokio::test]
async fn failed_add_leaves_everything_alone() {
    let store = Arc::new(MemoryRemoteStore::new());
    let controller = SyncController::new(Arc::clone(&store));
    store.set_fail_insert(true);

    controller.add("Buy milk", "Alex").await.unwrap();

    assert!(controller.items().is_empty());
    assert_eq!(controller.error(), Some(ADD_FAILED.to_string()));
    // No reload is triggered after a failed create
    assert_eq!(store.fetch_calls(), 0);
}

#[tokio::test]
async fn reload_orders_by_creation_and_partitions_stably() {
    let store = Arc::new(MemoryRemoteStore::new());
    for task in ["first", "second", "third", "fourth"] {
        store.create(NewItem::new(task, "Alex")).await.unwrap();
    }
    let controller = SyncController::new(Arc::clone(&store));
    controller.load().await;

    // Complete the second and fourth entries
    let items = controller.items();
    controller.toggle(items[1].id, false).await;
    controller.toggle(items[3].id, false).await;

    let items = controller.items();
    assert!(items.windows(2).all(|w| w[0].created_at <= w[1].created_at));

    let (pending, completed) = partition(&items);
    let pending_names: Vec<_> = pending.iter().map(|i| i.task_name.as_str()).collect();
    let completed_names: Vec<_> = completed.iter().map(|i| i.task_name.as_str()).collect();
    assert_eq!(pending_names, vec!["first", "third"]);
    assert_eq!(completed_names, vec!["second", "fourth"]);
    assert_eq!(pending.len() + completed.len(), items.len());
}

#[tokio::test]
async fn two_item_grouping_scenario() {
    let store = Arc::new(MemoryRemoteStore::new());
    store.create(NewItem::new("earlier", "Alex")).await.unwrap();
    store.create(NewItem::new("later", "Beck")).await.unwrap();

    let controller = SyncController::new(Arc::clone(&store));
    controller.load().await;

    // Mark the second (later) item completed
    let later = controller
        .items()
        .into_iter()
        .find(|i| i.task_name == "later")
        .unwrap();
    controller.toggle(later.id, false).await;

    let (pending, completed) = partition(&controller.items());
    assert_eq!(pending.len(), 1);
    assert_eq!(completed.len(), 1);
    assert_eq!(pending[0].task_name, "earlier");
    assert_eq!(completed[0].task_name, "later");
}

#[tokio::test]
async fn interleaved_operations_on_different_items() {
    let store = Arc::new(MemoryRemoteStore::new());
    store.create(NewItem::new("one", "Alex")).await.unwrap();
    store.create(NewItem::new("two", "Beck")).await.unwrap();

    let controller = Arc::new(SyncController::new(Arc::clone(&store)));
    controller.load().await;
    let items = controller.items();

    // A toggle on one item and a rename on another may be in flight at the
    // same time; neither waits on the other.
    let c1 = Arc::clone(&controller);
    let c2 = Arc::clone(&controller);
    let (id_one, id_two) = (items[0].id, items[1].id);
    let t1 = tokio::spawn(async move { c1.toggle(id_one, false).await });
    let t2 = tokio::spawn(async move { c2.rename(id_two, "two, renamed").await });
    t1.await.unwrap();
    t2.await.unwrap();

    let items = controller.items();
    assert!(items[0].is_completed);
    assert_eq!(items[1].task_name, "two, renamed");
    assert_eq!(controller.error(), None);
}
