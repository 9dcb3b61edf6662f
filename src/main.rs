//! A live buffer-menu TUI — preview, sort and kill editor buffers from
//! a popup listing.
//!
//! Open one or more files, then press `Ctrl-X Ctrl-B` for the menu.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::App,
};
use crate::core::editor::Editor;
use crate::core::window::WindowId;
use crate::ui::{
    layout::{popup_rect, AppLayout},
    menu::{MenuState, MenuWidget},
    prompt::KillPromptPopup,
    text_view::{TextView, TextViewState},
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Live buffer menu over a pile of text files")]
struct Cli {
    /// Files to open, each in its own buffer.
    files: Vec<PathBuf>,

    /// Include system buffers whenever the menu opens.
    #[arg(long)]
    all: bool,
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only in debug builds / when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    // ── build the editor ──────────────────────────────────────
    let mut editor = Editor::new();
    let mut first = None;
    for path in &cli.files {
        match editor.open_file(path) {
            Ok(id) => {
                if first.is_none() {
                    first = Some(id);
                }
            }
            Err(err) => {
                tracing::warn!("{err}");
                editor.log_message(err.to_string());
            }
        }
    }
    if let Some(id) = first {
        let w = editor.active_window;
        editor.show_buffer(w, id);
    }

    let mut app = App::new(editor);
    app.open_all = cli.all;

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(stderr(), EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(Duration::from_millis(100));

    // ── event loop ────────────────────────────────────────────
    loop {
        // Per-frame listing upkeep (cursor clamp, popup auto-preview)
        // runs before every draw.
        app.editor.listing_display_hook();

        terminal.draw(|frame| draw(frame, &mut app))?;

        match events.recv().await {
            Some(AppEvent::Key(k)) => handler::handle_key(&mut app, k),
            Some(AppEvent::Mouse(m)) => handler::handle_mouse(&mut app, m),
            Some(AppEvent::Resize(..)) | Some(AppEvent::Tick) => {}
            None => break,
        }

        if app.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

// ───────────────────────────────────────── rendering ─────────

fn draw(frame: &mut Frame, app: &mut App) {
    app.terminal_area = frame.area();
    app.popup_rows = None;
    let layout = AppLayout::from_area(frame.area());

    let listing = app.listing_window();

    // The full-screen text view shows the invoking window while the
    // menu floats above it, so previews are visible behind the popup.
    let text_window = listing
        .and_then(|w| {
            let display = app.editor.windows.get(w)?.buffer;
            let view = app.editor.listings.get(&display)?;
            app.editor
                .windows
                .contains(view.invoking_window)
                .then_some(view.invoking_window)
        })
        .unwrap_or(app.editor.active_window);

    render_text_view(frame, app, text_window, layout.view_area);
    if let Some(w) = listing {
        render_menu(frame, app, w, layout.view_area);
    }
    render_status(frame, app, layout.status_area);

    if let Some(prompt) = &app.kill_prompt {
        if let Some(name) = prompt.current() {
            let popup = KillPromptPopup {
                name,
                remaining: prompt.queue.len().saturating_sub(1),
            };
            frame.render_widget(popup, frame.area());
        }
    }
}

fn render_text_view(frame: &mut Frame, app: &mut App, window: WindowId, area: Rect) {
    let Some((buffer_id, cursor, top)) = app
        .editor
        .windows
        .get(window)
        .map(|w| (w.buffer, w.cursor_line(), w.top_line))
    else {
        return;
    };
    let Some(buffer) = app.editor.buffers.get(buffer_id) else {
        return;
    };

    let marker = if buffer.modified { "*" } else { "" };
    let block = Block::default()
        .title(format!(" {}{} ", buffer.name, marker))
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());

    let widget = TextView::new(buffer.lines()).block(block);
    let mut state = TextViewState { cursor, top };
    frame.render_stateful_widget(widget, area, &mut state);

    if let Some(win) = app.editor.windows.get_mut(window) {
        win.top_line = state.top;
    }
}

fn render_menu(frame: &mut Frame, app: &mut App, window: WindowId, area: Rect) {
    let Some((display, cursor, top)) = app
        .editor
        .windows
        .get(window)
        .map(|w| (w.buffer, w.cursor_line(), w.top_line))
    else {
        return;
    };
    let Some(view) = app.editor.listings.get(&display) else {
        return;
    };
    let Some(buffer) = app.editor.buffers.get(display) else {
        return;
    };

    let popup = popup_rect(area, buffer.line_count().max(1) as u16);
    frame.render_widget(Clear, popup);

    let title = if view.all_visible {
        " Buffer list (all) "
    } else {
        " Buffer list "
    };
    let block = Block::default()
        .title(title)
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_style());
    let inner = block.inner(popup);

    let widget = MenuWidget::new(buffer.lines(), &view.entries, &app.editor.buffers).block(block);
    let mut state = MenuState { cursor, top };
    frame.render_stateful_widget(widget, popup, &mut state);

    app.popup_rows = Some(inner);
    if let Some(win) = app.editor.windows.get_mut(window) {
        win.top_line = state.top;
    }
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let hint = if app.listing_window().is_some() {
        app.keymap.listing_hint()
    } else {
        app.keymap.global_hint()
    };
    let text = app.status_message.as_deref().unwrap_or(&hint);
    let status = Paragraph::new(text).style(Theme::status_bar_style());
    frame.render_widget(status, area);
}
