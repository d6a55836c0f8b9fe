//! Item command handlers
//!
//! Every one-shot command starts with a reload so prefix lookups and the
//! printed list reflect the current remote state.

use anyhow::{bail, Result};
use uuid::Uuid;

use potluck_core::{profile, FileKvStore, Item, MissingActorName, RemoteStore, SyncController};

use crate::output::Output;

/// List all items, grouped into pending and completed
pub async fn list<S: RemoteStore>(controller: &SyncController<S>, output: &Output) -> Result<()> {
    controller.load().await;
    if let Some(message) = controller.error() {
        bail!(message);
    }

    output.print_items(&controller.items());
    Ok(())
}

/// Add a new item under the saved display name
///
/// With no saved name, an interactive session prompts for one and saves it;
/// a scripted session (--json/--quiet) fails with a pointer to `name set`.
pub async fn add<S: RemoteStore>(
    controller: &SyncController<S>,
    config: &potluck_core::Config,
    task: String,
    output: &Output,
) -> Result<()> {
    let task = task.trim().to_string();
    if task.is_empty() {
        bail!("Task text cannot be empty.");
    }

    let kv = FileKvStore::new(config.profile_path());
    let author = match profile::load_display_name(&kv)? {
        Some(name) => name,
        None if output.should_prompt() => {
            let name = prompt_display_name()?;
            profile::save_display_name(&kv, &name)?;
            name.trim().to_string()
        }
        None => bail!("No display name set. Run `potluck name set <name>` first."),
    };

    if let Err(MissingActorName) = controller.add(&task, &author).await {
        bail!("No display name set. Run `potluck name set <name>` first.");
    }
    if let Some(message) = controller.error() {
        bail!(message);
    }

    output.success(&format!("Added '{}' as {}", task, author));
    Ok(())
}

/// Mark an item completed (or pending again)
pub async fn set_completed<S: RemoteStore>(
    controller: &SyncController<S>,
    id: String,
    completed: bool,
    output: &Output,
) -> Result<()> {
    controller.load().await;
    if let Some(message) = controller.error() {
        bail!(message);
    }

    let items = controller.items();
    let target = resolve_item_id(&id, &items)?;

    let currently = match items.iter().find(|item| item.id == target) {
        Some(item) if item.is_completed == completed => {
            output.message(&format!(
                "'{}' is already {}.",
                item.task_name,
                if completed { "completed" } else { "pending" }
            ));
            return Ok(());
        }
        Some(item) => item.is_completed,
        // Full UUID not in the local view: issue the call anyway and let
        // the remote store decide whether the row exists.
        None => !completed,
    };

    controller.toggle(target, currently).await;
    if let Some(message) = controller.error() {
        bail!(message);
    }

    output.success(&format!(
        "Marked {} {}",
        &target.to_string()[..8],
        if completed { "completed" } else { "pending" }
    ));
    Ok(())
}

/// Change an item's text
pub async fn rename<S: RemoteStore>(
    controller: &SyncController<S>,
    id: String,
    task: String,
    output: &Output,
) -> Result<()> {
    let task = task.trim().to_string();
    if task.is_empty() {
        bail!("Task text cannot be empty.");
    }

    controller.load().await;
    if let Some(message) = controller.error() {
        bail!(message);
    }

    let target = resolve_item_id(&id, &controller.items())?;

    controller.rename(target, &task).await;
    if let Some(message) = controller.error() {
        bail!(message);
    }

    output.success(&format!("Renamed {} to '{}'", &target.to_string()[..8], task));
    Ok(())
}

/// Delete an item
pub async fn delete<S: RemoteStore>(
    controller: &SyncController<S>,
    id: String,
    output: &Output,
) -> Result<()> {
    controller.load().await;
    if let Some(message) = controller.error() {
        bail!(message);
    }

    let target = resolve_item_id(&id, &controller.items())?;

    controller.delete(target).await;
    if let Some(message) = controller.error() {
        bail!(message);
    }

    output.success(&format!("Deleted {}", &target.to_string()[..8]));
    Ok(())
}

/// Resolve a full UUID or an unambiguous prefix against the current items
fn resolve_item_id(input: &str, items: &[Item]) -> Result<Uuid> {
    // Full UUIDs pass through untouched, present locally or not
    if let Ok(id) = Uuid::parse_str(input) {
        return Ok(id);
    }

    let needle = input.to_lowercase();
    let matches: Vec<&Item> = items
        .iter()
        .filter(|item| item.id.to_string().starts_with(&needle))
        .collect();

    match matches.len() {
        0 => bail!("No item matches id '{}'", input),
        1 => Ok(matches[0].id),
        n => bail!("Ambiguous id '{}' ({} items match). Give more characters.", input, n),
    }
}

/// Ask for a display name on stdin
fn prompt_display_name() -> Result<String> {
    use std::io::{self, Write};

    println!();
    println!("Items are added under a display name other visitors can see.");
    print!("Your name: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let name = input.trim();

    if name.is_empty() {
        bail!("A display name is required to add items.");
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn item(id: Uuid, task: &str) -> Item {
        Item {
            id,
            created_at: DateTime::from_timestamp(1, 0).unwrap(),
            task_name: task.to_string(),
            is_completed: false,
            author_name: "Alex".to_string(),
        }
    }

    #[test]
    fn test_resolve_full_uuid_without_local_match() {
        let id = Uuid::new_v4();
        let resolved = resolve_item_id(&id.to_string(), &[]).unwrap();
        assert_eq!(resolved, id);
    }

    #[test]
    fn test_resolve_unique_prefix() {
        let id = Uuid::new_v4();
        let items = vec![item(id, "task")];
        let prefix = &id.to_string()[..8];
        assert_eq!(resolve_item_id(prefix, &items).unwrap(), id);
    }

    #[test]
    fn test_resolve_no_match() {
        let items = vec![item(Uuid::new_v4(), "task")];
        assert!(resolve_item_id("zzzzzzzz", &items).is_err());
    }

    #[test]
    fn test_resolve_ambiguous_prefix() {
        // Force two ids that share a first hex digit
        let mut a = Uuid::new_v4().to_string();
        let mut b = Uuid::new_v4().to_string();
        a.replace_range(..1, "a");
        b.replace_range(..1, "a");
        let items = vec![
            item(Uuid::parse_str(&a).unwrap(), "one"),
            item(Uuid::parse_str(&b).unwrap(), "two"),
        ];
        assert!(resolve_item_id("a", &items).is_err());
    }
}
