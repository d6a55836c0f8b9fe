//! Application state and logic

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use potluck_core::{partition, profile, Item, KvStore, RemoteStore, SyncController};

/// Per-entry presentation state
///
/// One explicit state instead of parallel booleans: an entry cannot be
/// edited while a save for it is still in flight, and the `Saving` variant
/// is the per-entry busy gate that refuses a second operation on the same
/// entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
    Idle,
    Editing { buffer: String, cursor: usize },
    Saving,
}

/// What the bottom input line is collecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    AddItem,
    EditName,
}

/// Completion notices from spawned operations
#[derive(Debug, Clone, Copy)]
pub enum OpEvent {
    LoadFinished,
    AddFinished,
    EntryFinished(Uuid),
}

/// Application state
pub struct App<S: RemoteStore + 'static> {
    controller: Arc<SyncController<S>>,
    events_tx: mpsc::UnboundedSender<OpEvent>,
    /// Whether the app should exit
    pub should_quit: bool,
    /// Pending entries, canonical order
    pub pending: Vec<Item>,
    /// Completed entries, canonical order
    pub completed: Vec<Item>,
    /// Selection index across pending followed by completed
    pub selected: usize,
    /// What the input line collects
    pub input_mode: InputMode,
    /// Input line contents
    pub input: String,
    /// Input line cursor (char index)
    pub input_cursor: usize,
    /// The acting user's display name, if one is saved
    pub display_name: Option<String>,
    /// Per-entry presentation state, absent means Idle
    pub entry_states: HashMap<Uuid, EntryState>,
    /// Whether an add is in flight (disables the add affordance)
    pub adding: bool,
    /// Current error message from the controller
    pub error: Option<String>,
    /// Whether a reload is in flight
    pub is_loading: bool,
    /// Status message to display temporarily
    pub status_message: Option<String>,
}

impl<S: RemoteStore + 'static> App<S> {
    pub fn new(
        controller: Arc<SyncController<S>>,
        display_name: Option<String>,
        events_tx: mpsc::UnboundedSender<OpEvent>,
    ) -> Self {
        Self {
            controller,
            events_tx,
            should_quit: false,
            pending: Vec::new(),
            completed: Vec::new(),
            selected: 0,
            input_mode: InputMode::Normal,
            input: String::new(),
            input_cursor: 0,
            display_name,
            entry_states: HashMap::new(),
            adding: false,
            error: None,
            is_loading: false,
            status_message: None,
        }
    }

    /// Pull the current snapshot out of the controller
    pub fn refresh_snapshot(&mut self) {
        let items = self.controller.items();
        self.error = self.controller.error();
        self.is_loading = self.controller.is_loading();

        let (pending, completed) = partition(&items);
        self.pending = pending;
        self.completed = completed;

        // Drop per-entry state for rows that no longer exist, unless an
        // operation for them is still in flight.
        let known: HashSet<Uuid> = items.iter().map(|item| item.id).collect();
        self.entry_states
            .retain(|id, state| known.contains(id) || *state == EntryState::Saving);

        let total = self.visible_len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn visible_len(&self) -> usize {
        self.pending.len() + self.completed.len()
    }

    /// The currently selected entry, pending group first
    pub fn selected_item(&self) -> Option<&Item> {
        if self.selected < self.pending.len() {
            self.pending.get(self.selected)
        } else {
            self.completed.get(self.selected - self.pending.len())
        }
    }

    pub fn entry_state(&self, id: Uuid) -> EntryState {
        self.entry_states
            .get(&id)
            .cloned()
            .unwrap_or(EntryState::Idle)
    }

    fn is_busy(&self, id: Uuid) -> bool {
        matches!(self.entry_states.get(&id), Some(EntryState::Saving))
    }

    /// The entry currently being edited inline, if any
    pub fn editing_id(&self) -> Option<Uuid> {
        self.entry_states.iter().find_map(|(id, state)| {
            matches!(state, EntryState::Editing { .. }).then_some(*id)
        })
    }

    // ==================== Navigation ====================

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.visible_len() {
            self.selected += 1;
        }
    }

    // ==================== Operations ====================

    /// Kick off a full reload in the background
    pub fn spawn_load(&mut self) {
        let controller = Arc::clone(&self.controller);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            controller.load().await;
            let _ = tx.send(OpEvent::LoadFinished);
        });
    }

    /// Flip completion on the selected entry, unless it is busy
    pub fn toggle_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let (id, currently) = (item.id, item.is_completed);

        if self.is_busy(id) {
            self.status_message = Some("Still saving that entry...".to_string());
            return;
        }
        if self.editing_id() == Some(id) {
            return;
        }

        self.entry_states.insert(id, EntryState::Saving);
        let controller = Arc::clone(&self.controller);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            controller.toggle(id, currently).await;
            let _ = tx.send(OpEvent::EntryFinished(id));
        });
    }

    /// Delete the selected entry, unless it is busy
    pub fn delete_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let id = item.id;

        if self.is_busy(id) {
            self.status_message = Some("Still saving that entry...".to_string());
            return;
        }

        self.entry_states.insert(id, EntryState::Saving);
        let controller = Arc::clone(&self.controller);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            controller.delete(id).await;
            let _ = tx.send(OpEvent::EntryFinished(id));
        });
    }

    /// Start editing the selected entry's text inline
    pub fn begin_edit(&mut self) {
        if self.editing_id().is_some() {
            return;
        }
        let Some(item) = self.selected_item() else {
            return;
        };
        let (id, text) = (item.id, item.task_name.clone());

        if self.is_busy(id) {
            self.status_message = Some("Still saving that entry...".to_string());
            return;
        }

        let cursor = text.chars().count();
        self.entry_states
            .insert(id, EntryState::Editing { buffer: text, cursor });
    }

    pub fn cancel_edit(&mut self) {
        if let Some(id) = self.editing_id() {
            self.entry_states.remove(&id);
        }
    }

    /// Commit the inline edit; blank text cancels instead of saving
    pub fn commit_edit(&mut self) {
        let Some(id) = self.editing_id() else {
            return;
        };
        let Some(EntryState::Editing { buffer, .. }) = self.entry_states.get(&id).cloned() else {
            return;
        };

        let text = buffer.trim().to_string();
        if text.is_empty() {
            self.entry_states.remove(&id);
            self.status_message = Some("Edit cancelled (empty)".to_string());
            return;
        }

        self.entry_states.insert(id, EntryState::Saving);
        let controller = Arc::clone(&self.controller);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            controller.rename(id, &text).await;
            let _ = tx.send(OpEvent::EntryFinished(id));
        });
    }

    /// Open the add input, prompting for a name first when none is saved
    pub fn begin_add(&mut self) {
        if self.adding {
            self.status_message = Some("Still adding the previous item...".to_string());
            return;
        }
        if self.display_name.is_none() {
            self.begin_name_prompt();
            return;
        }
        self.input_mode = InputMode::AddItem;
        self.input.clear();
        self.input_cursor = 0;
    }

    /// Open the name prompt
    pub fn begin_name_prompt(&mut self) {
        self.input_mode = InputMode::EditName;
        self.input = self.display_name.clone().unwrap_or_default();
        self.input_cursor = self.input.chars().count();
        self.status_message = Some("Items are added under a name other visitors can see.".to_string());
    }

    /// Submit whatever the input line is collecting
    pub fn submit_input(&mut self, kv: &impl KvStore) {
        match self.input_mode {
            InputMode::Normal => {}
            InputMode::AddItem => {
                let task = self.input.trim().to_string();
                self.exit_input_mode();
                if task.is_empty() {
                    self.status_message = Some("Nothing to add (empty)".to_string());
                    return;
                }
                let Some(author) = self.display_name.clone() else {
                    // begin_add guards against this; re-prompt if it happens
                    self.begin_name_prompt();
                    return;
                };

                self.adding = true;
                let controller = Arc::clone(&self.controller);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    // The actor name was checked before spawning
                    let _ = controller.add(&task, &author).await;
                    let _ = tx.send(OpEvent::AddFinished);
                });
            }
            InputMode::EditName => {
                let name = self.input.trim().to_string();
                if name.is_empty() {
                    // Stay in the prompt; a name is required to proceed
                    self.status_message = Some("A display name is required.".to_string());
                    return;
                }
                match profile::save_display_name(kv, &name) {
                    Ok(()) => {
                        self.display_name = Some(name.clone());
                        self.exit_input_mode();
                        self.status_message = Some(format!("Adding items as {}", name));
                    }
                    Err(e) => {
                        self.status_message = Some(format!("Could not save name: {}", e));
                    }
                }
            }
        }
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.input_cursor = 0;
    }

    /// Apply a completion notice from a background operation
    pub fn finish(&mut self, event: OpEvent) {
        match event {
            OpEvent::LoadFinished => {}
            OpEvent::AddFinished => {
                self.adding = false;
            }
            OpEvent::EntryFinished(id) => {
                self.entry_states.remove(&id);
            }
        }
        self.refresh_snapshot();
    }

    /// Dismiss the error banner
    pub fn dismiss_error(&mut self) {
        self.controller.dismiss_error();
        self.error = None;
    }

    // ==================== Text input ====================

    pub fn insert_char(&mut self, c: char) {
        if let Some(id) = self.editing_id() {
            if let Some(EntryState::Editing { buffer, cursor }) = self.entry_states.get_mut(&id) {
                *cursor = insert_at(buffer, *cursor, c);
            }
        } else {
            self.input_cursor = insert_at(&mut self.input, self.input_cursor, c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(id) = self.editing_id() {
            if let Some(EntryState::Editing { buffer, cursor }) = self.entry_states.get_mut(&id) {
                *cursor = remove_before(buffer, *cursor);
            }
        } else {
            self.input_cursor = remove_before(&mut self.input, self.input_cursor);
        }
    }

    pub fn cursor_left(&mut self) {
        if let Some(id) = self.editing_id() {
            if let Some(EntryState::Editing { cursor, .. }) = self.entry_states.get_mut(&id) {
                *cursor = cursor.saturating_sub(1);
            }
        } else {
            self.input_cursor = self.input_cursor.saturating_sub(1);
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(id) = self.editing_id() {
            if let Some(EntryState::Editing { buffer, cursor }) = self.entry_states.get_mut(&id) {
                *cursor = (*cursor + 1).min(buffer.chars().count());
            }
        } else {
            self.input_cursor = (self.input_cursor + 1).min(self.input.chars().count());
        }
    }
}

/// Insert `c` at a char index, returning the new cursor
fn insert_at(text: &mut String, cursor: usize, c: char) -> usize {
    let idx = byte_index(text, cursor);
    text.insert(idx, c);
    cursor + 1
}

/// Remove the char before the cursor, returning the new cursor
fn remove_before(text: &mut String, cursor: usize) -> usize {
    if cursor == 0 {
        return 0;
    }
    let idx = byte_index(text, cursor - 1);
    text.remove(idx);
    cursor - 1
}

fn byte_index(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
