//! Input handling — maps key/mouse events to state mutations.

use std::collections::HashMap;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::config::{self, Action, KeyBind};
use crate::core::list;
use crate::core::listing::SelectMode;
use crate::core::registry::{BufferId, KillConfirm};
use crate::core::sort::SortField;
use crate::core::window::WindowId;

use super::state::{App, KillPrompt};

/// Answers collected by the confirmation dialog, replayed into the
/// kill. A name with no recorded answer is kept.
struct RecordedAnswers {
    answers: HashMap<String, bool>,
}

impl KillConfirm for RecordedAnswers {
    fn confirm_kill(&mut self, name: &str) -> bool {
        self.answers.get(name).copied().unwrap_or(false)
    }
}

// ── keys ────────────────────────────────────────────────────────

/// Process a key event, dispatching on what the active window shows.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Only process Press events (ignore Release/Repeat on supported terminals).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.kill_prompt.is_some() {
        handle_prompt_key(app, key);
        return;
    }

    if app.pending_prefix {
        app.pending_prefix = false;
        handle_prefix_key(app, key);
        return;
    }

    if config::is_universal_argument(key) {
        app.universal_argument = true;
        return;
    }
    if config::is_command_prefix(key) {
        app.pending_prefix = true;
        return;
    }

    match app.listing_window() {
        Some(window) => handle_listing_key(app, window, key),
        None => handle_text_key(app, key),
    }
}

/// Second key of a `Ctrl-X` sequence.
fn handle_prefix_key(app: &mut App, key: KeyEvent) {
    match config::prefix_action(key) {
        Some(Action::OpenListing) => open_listing(app),
        Some(_) => {
            // Ctrl-G cancels the sequence.
            app.universal_argument = false;
        }
        None => {
            app.universal_argument = false;
            let bind = KeyBind::new(key.code, key.modifiers);
            app.status_message = Some(format!("Ctrl+x {} is undefined", bind.display()));
        }
    }
}

fn open_listing(app: &mut App) {
    let show_system = app.universal_argument || app.open_all;
    app.universal_argument = false;
    match app.editor.open_listing(show_system) {
        Some(_) => app.status_message = Some(app.keymap.listing_hint()),
        None => app.status_message = Some("Buffer list is already open".into()),
    }
}

// ── buffer menu ─────────────────────────────────────────────────

fn handle_listing_key(app: &mut App, window: WindowId, key: KeyEvent) {
    // Home/End always work in a list.
    match key.code {
        KeyCode::Home => {
            set_listing_cursor(app, window, 0);
            return;
        }
        KeyCode::End => {
            set_listing_cursor(app, window, usize::MAX);
            return;
        }
        _ => {}
    }

    let Some(action) = app.keymap.match_listing(key) else {
        return;
    };
    app.universal_argument = false;

    match action {
        Action::SelectCommit => {
            app.editor.listing_select(window, SelectMode::Commit);
            app.status_message = None;
        }
        Action::SelectAbort => {
            app.editor.listing_select(window, SelectMode::Abort);
            app.status_message = None;
        }
        Action::MoveUp => move_listing_cursor(app, window, -1),
        Action::MoveDown => move_listing_cursor(app, window, 1),
        Action::ClearModified => app.editor.listing_clear_modified(window),
        Action::ToggleReadOnly => app.editor.listing_toggle_read_only(window),
        Action::ToggleMark => app.editor.listing_toggle_mark(window),
        Action::ToggleAllVisible => app.editor.listing_toggle_all(window),
        Action::Refresh => app.editor.listing_refresh(window),
        Action::Kill => start_kill(app, window),
        Action::SortUnsorted => set_sort(app, window, SortField::Creation),
        Action::SortName => set_sort(app, window, SortField::Name),
        Action::SortFilename => set_sort(app, window, SortField::Filename),
        Action::SortSize => set_sort(app, window, SortField::Size),
        Action::SortTime => set_sort(app, window, SortField::Time),
        Action::SortModified => set_sort(app, window, SortField::ModifiedFirst),
        Action::OpenListing | Action::Quit => {}
    }
}

fn listing_rows(app: &App, window: WindowId) -> usize {
    let Some(display) = app.editor.windows.get(window).map(|w| w.buffer) else {
        return 0;
    };
    app.editor
        .listings
        .get(&display)
        .map_or(0, |v| v.entries.len())
}

fn move_listing_cursor(app: &mut App, window: WindowId, delta: isize) {
    let rows = listing_rows(app, window);
    if let Some(win) = app.editor.windows.get_mut(window) {
        list::move_cursor(win, rows, delta);
    }
}

fn set_listing_cursor(app: &mut App, window: WindowId, row: usize) {
    let rows = listing_rows(app, window);
    if let Some(win) = app.editor.windows.get_mut(window) {
        list::set_cursor_row(win, rows, row);
    }
}

fn set_sort(app: &mut App, window: WindowId, field: SortField) {
    app.editor.listing_set_sort(window, field);
    let sort = app.editor.sort;
    app.status_message = Some(if sort.is_unsorted() {
        "Buffers in creation order".into()
    } else if sort.descending {
        format!("Sorted by {} (descending)", sort.field.label())
    } else {
        format!("Sorted by {}", sort.field.label())
    });
}

// ── kill confirmation ───────────────────────────────────────────

fn start_kill(app: &mut App, window: WindowId) {
    let queue = app.editor.listing_kill_prompts(window);
    if queue.is_empty() {
        finish_kill(app, window, HashMap::new());
        return;
    }
    app.kill_prompt = Some(KillPrompt {
        window,
        queue,
        answers: HashMap::new(),
    });
}

fn finish_kill(app: &mut App, window: WindowId, answers: HashMap<String, bool>) {
    let snapshot: Vec<BufferId> = app.editor.buffers.ids().collect();
    let mut confirm = RecordedAnswers { answers };
    app.editor.listing_kill(window, &mut confirm);
    let killed = snapshot
        .iter()
        .filter(|&&id| !app.editor.buffers.contains(id))
        .count();
    app.status_message = Some(match killed {
        0 => "No buffers killed".into(),
        1 => "Killed 1 buffer".into(),
        n => format!("Killed {n} buffers"),
    });
}

/// Hardcoded keys while the confirmation dialog is up.
fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    let Some(prompt) = app.kill_prompt.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(name) = prompt.queue.first().cloned() {
                prompt.answers.insert(name, true);
                prompt.queue.remove(0);
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            if let Some(name) = prompt.queue.first().cloned() {
                prompt.answers.insert(name, false);
                prompt.queue.remove(0);
            }
        }
        // Esc / Ctrl-G keep everything still queued.
        KeyCode::Esc => prompt.queue.clear(),
        KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            prompt.queue.clear()
        }
        _ => return,
    }
    if prompt.queue.is_empty() {
        if let Some(p) = app.kill_prompt.take() {
            finish_kill(app, p.window, p.answers);
        }
    }
}

// ── text view ───────────────────────────────────────────────────

fn handle_text_key(app: &mut App, key: KeyEvent) {
    // Home/End always work in a text view.
    match key.code {
        KeyCode::Home => {
            set_text_cursor(app, 0);
            return;
        }
        KeyCode::End => {
            set_text_cursor(app, usize::MAX);
            return;
        }
        _ => {}
    }

    let Some(action) = app.keymap.match_global(key) else {
        return;
    };
    app.universal_argument = false;

    match action {
        Action::Quit => app.should_quit = true,
        Action::MoveUp => move_text_cursor(app, -1),
        Action::MoveDown => move_text_cursor(app, 1),
        _ => {}
    }
}

fn text_lines(app: &App) -> usize {
    app.editor
        .active_buffer()
        .and_then(|id| app.editor.buffers.get(id))
        .map_or(0, |b| b.line_count())
}

fn move_text_cursor(app: &mut App, delta: isize) {
    let lines = text_lines(app);
    let w = app.editor.active_window;
    if let Some(win) = app.editor.windows.get_mut(w) {
        list::move_cursor(win, lines, delta);
    }
}

fn set_text_cursor(app: &mut App, line: usize) {
    let lines = text_lines(app);
    let w = app.editor.active_window;
    if let Some(win) = app.editor.windows.get_mut(w) {
        list::set_cursor_row(win, lines, line);
    }
}

// ── mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.kill_prompt.is_some() {
        return;
    }

    let Some(window) = app.listing_window() else {
        match mouse.kind {
            MouseEventKind::ScrollUp => move_text_cursor(app, -1),
            MouseEventKind::ScrollDown => move_text_cursor(app, 1),
            _ => {}
        }
        return;
    };

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(rows_area) = app.popup_rows else {
                return;
            };
            if !point_in_rect(rows_area, mouse.column, mouse.row) {
                return;
            }
            let top = app
                .editor
                .windows
                .get(window)
                .map_or(0, |w| w.top_line);
            let clicked = mouse.row.saturating_sub(rows_area.y) as usize + top;
            if clicked < listing_rows(app, window) {
                set_listing_cursor(app, window, clicked);
            }
        }
        MouseEventKind::ScrollUp => move_listing_cursor(app, window, -1),
        MouseEventKind::ScrollDown => move_listing_cursor(app, window, 1),
        _ => {}
    }
}

fn point_in_rect(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

// ───────────────────────────────────────── tests ─────────────
