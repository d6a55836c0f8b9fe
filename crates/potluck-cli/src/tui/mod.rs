//! Potluck TUI
//!
//! Interactive terminal interface for the shared checklist.
//!
//! ## Layout
//!
//! - Header: list title, your display name, loading indicator
//! - Input box: add text or the name prompt
//! - Two groups: Pending and Completed, each with its count
//! - Status bar: error banner, status message, or key hints
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection
//! - Space or Enter: Toggle completion
//! - a: Add item (prompts for your name first if none is saved)
//! - e: Edit the selected item's text inline
//! - d: Delete the selected item
//! - r: Reload from the remote list
//! - n: Change your display name
//! - q: Quit
//!
//! Mutations run in the background; an entry being saved refuses further
//! operations until its round trip resolves.

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use potluck_core::{profile, Config, FileKvStore, HttpRemoteStore, SyncController};

use app::{App, InputMode, OpEvent};

/// Run the TUI application
pub async fn run(config: Config, controller: SyncController<HttpRemoteStore>) -> Result<()> {
    // Initialize TUI logging (file-based, only if POTLUCK_LOG is set)
    init_tui_logging(&config);

    let kv = FileKvStore::new(config.profile_path());
    let display_name = profile::load_display_name(&kv)?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create app around the injected controller
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let mut app = App::new(Arc::new(controller), display_name, events_tx);

    // First-run name prompt, then the initial reload
    if app.display_name.is_none() {
        app.begin_name_prompt();
    }
    app.spawn_load();

    // Run app
    let result = run_app(&mut terminal, &mut app, &kv, events_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<HttpRemoteStore>,
    kv: &FileKvStore,
    mut events_rx: mpsc::UnboundedReceiver<OpEvent>,
) -> Result<()> {
    loop {
        app.refresh_snapshot();

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            biased;

            // Completion notices from spawned operations
            op_event = events_rx.recv() => {
                if let Some(event) = op_event {
                    app.finish(event);
                }
            }

            // Poll for terminal events
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if event::poll(std::time::Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        // Only handle key press events (not release)
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }

                        // If the error banner is showing, any key dismisses it
                        if app.error.is_some() {
                            app.dismiss_error();
                            continue;
                        }

                        // Clear the transient status on every key
                        app.status_message = None;

                        if app.editing_id().is_some() {
                            handle_edit_keys(app, key.code, key.modifiers);
                        } else {
                            match app.input_mode {
                                InputMode::Normal => handle_normal_keys(app, key.code, key.modifiers),
                                InputMode::AddItem | InputMode::EditName => {
                                    handle_input_keys(app, kv, key.code, key.modifiers)
                                }
                            }
                        }
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Key events in normal mode
fn handle_normal_keys(app: &mut App<HttpRemoteStore>, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        // Quit
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Navigation
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
        }

        // Toggle completion
        KeyCode::Char(' ') | KeyCode::Enter => {
            app.toggle_selected();
        }

        // Mutations
        KeyCode::Char('a') => {
            app.begin_add();
        }
        KeyCode::Char('e') => {
            app.begin_edit();
        }
        KeyCode::Char('d') => {
            app.delete_selected();
        }

        // Reload
        KeyCode::Char('r') => {
            app.spawn_load();
        }

        // Display name
        KeyCode::Char('n') => {
            app.begin_name_prompt();
        }

        // Help
        KeyCode::Char('?') => {
            app.status_message = Some(
                "j/k:↑↓  space:toggle  a:add  e:edit  d:del  r:reload  n:name  q:quit".to_string(),
            );
        }

        _ => {}
    }
}

/// Key events while an entry is being edited inline
fn handle_edit_keys(app: &mut App<HttpRemoteStore>, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Esc => {
            app.cancel_edit();
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.cancel_edit();
        }
        KeyCode::Enter => {
            app.commit_edit();
        }
        KeyCode::Char(c) => {
            app.insert_char(c);
        }
        KeyCode::Backspace => {
            app.delete_char();
        }
        KeyCode::Left => {
            app.cursor_left();
        }
        KeyCode::Right => {
            app.cursor_right();
        }
        _ => {}
    }
}

/// Key events while the input line is collecting text
fn handle_input_keys(
    app: &mut App<HttpRemoteStore>,
    kv: &FileKvStore,
    code: KeyCode,
    modifiers: KeyModifiers,
) {
    match code {
        KeyCode::Esc => {
            app.exit_input_mode();
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.exit_input_mode();
        }
        KeyCode::Enter => {
            app.submit_input(kv);
        }
        KeyCode::Char(c) => {
            app.insert_char(c);
        }
        KeyCode::Backspace => {
            app.delete_char();
        }
        KeyCode::Left => {
            app.cursor_left();
        }
        KeyCode::Right => {
            app.cursor_right();
        }
        _ => {}
    }
}

/// Initialize logging for TUI mode
///
/// Only initializes if POTLUCK_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_tui_logging(config: &Config) {
    // Only log if POTLUCK_LOG is set
    let Ok(log_level) = std::env::var("POTLUCK_LOG") else {
        return;
    };

    // Determine log file path
    let log_path = config
        .log_file
        .clone()
        .unwrap_or_else(|| config.data_dir.join("debug.log"));

    // Create log file
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "potluck_core={},potluck_cli={}",
        log_level, log_level
    ));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
