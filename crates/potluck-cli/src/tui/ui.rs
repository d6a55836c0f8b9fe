//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use potluck_core::{Item, RemoteStore};

use super::app::{App, EntryState, InputMode};

/// Main UI rendering function
pub fn draw<S: RemoteStore + 'static>(frame: &mut Frame, app: &App<S>) {
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, outer_chunks[0]);
    draw_input(frame, app, outer_chunks[1]);

    let list_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(outer_chunks[2]);

    draw_pending(frame, app, list_chunks[0]);
    draw_completed(frame, app, list_chunks[1]);

    draw_status_bar(frame, app, outer_chunks[3]);
}

/// Draw the one-line header
fn draw_header<S: RemoteStore + 'static>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let name = app
        .display_name
        .clone()
        .unwrap_or_else(|| "no name set".to_string());

    let mut spans = vec![
        Span::styled(" Potluck ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("· shared checklist", Style::default().add_modifier(Modifier::DIM)),
        Span::raw("   "),
        Span::styled(format!("you: {}", name), Style::default().fg(Color::Cyan)),
    ];
    if app.is_loading {
        spans.push(Span::styled(
            "   loading...",
            Style::default().add_modifier(Modifier::DIM),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the input box (add text, name prompt, or a hint)
fn draw_input<S: RemoteStore + 'static>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let (title, content, active) = match app.input_mode {
        InputMode::AddItem => (" New item ", app.input.as_str(), true),
        InputMode::EditName => (" Your name ", app.input.as_str(), true),
        InputMode::Normal => {
            if app.adding {
                (" Add ", "adding...", false)
            } else {
                (" Add ", "press a to add an item", false)
            }
        }
    };

    let style = if active {
        Style::default()
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    let border_style = if active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    frame.render_widget(Paragraph::new(content).style(style).block(block), area);

    if active {
        let cursor_x = area.x + 1 + app.input_cursor as u16;
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

/// One rendered list row
fn entry_line<'a>(item: &'a Item, state: &EntryState, completed: bool) -> ListItem<'a> {
    let mark = if completed { "☑ " } else { "☐ " };

    let text_span = match state {
        EntryState::Editing { buffer, .. } => Span::styled(
            format!("{}_", buffer),
            Style::default().add_modifier(Modifier::UNDERLINED),
        ),
        EntryState::Saving => Span::styled(
            format!("{} (saving...)", item.task_name),
            Style::default().add_modifier(Modifier::DIM),
        ),
        EntryState::Idle => {
            if completed {
                Span::styled(
                    item.task_name.clone(),
                    Style::default()
                        .add_modifier(Modifier::DIM)
                        .add_modifier(Modifier::CROSSED_OUT),
                )
            } else {
                Span::raw(item.task_name.clone())
            }
        }
    };

    let line = Line::from(vec![
        Span::raw(mark),
        text_span,
        Span::styled(
            format!("  · {}", item.author_name),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    ListItem::new(line)
}

/// Draw the pending group
fn draw_pending<S: RemoteStore + 'static>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let items: Vec<ListItem> = app
        .pending
        .iter()
        .map(|item| entry_line(item, &app.entry_state(item.id), false))
        .collect();

    let block = Block::default()
        .title(format!(" Pending ({}) ", app.pending.len()))
        .borders(Borders::ALL);

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED),
    );

    let mut state = ListState::default();
    if app.selected < app.pending.len() && !app.pending.is_empty() {
        state.select(Some(app.selected));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the completed group
fn draw_completed<S: RemoteStore + 'static>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let items: Vec<ListItem> = app
        .completed
        .iter()
        .map(|item| entry_line(item, &app.entry_state(item.id), true))
        .collect();

    let block = Block::default()
        .title(format!(" Completed ({}) ", app.completed.len()))
        .borders(Borders::ALL);

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED),
    );

    let mut state = ListState::default();
    if app.selected >= app.pending.len() && !app.completed.is_empty() {
        state.select(Some(app.selected - app.pending.len()));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the status bar at the bottom
fn draw_status_bar<S: RemoteStore + 'static>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let paragraph = if let Some(error) = &app.error {
        Paragraph::new(format!("✗ {} (press any key)", error))
            .style(Style::default().fg(Color::Red))
    } else if let Some(msg) = &app.status_message {
        Paragraph::new(msg.as_str()).style(Style::default().add_modifier(Modifier::DIM))
    } else {
        let hint = match app.input_mode {
            InputMode::Normal => {
                if app.editing_id().is_some() {
                    "Enter:save  Esc:cancel"
                } else {
                    "j/k:↑↓  space:toggle  a:add  e:edit  d:del  r:reload  n:name  q:quit"
                }
            }
            InputMode::AddItem | InputMode::EditName => "Enter:confirm  Esc:cancel",
        };
        Paragraph::new(hint).style(Style::default().add_modifier(Modifier::DIM))
    };

    frame.render_widget(paragraph, area);
}
