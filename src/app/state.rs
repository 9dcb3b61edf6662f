//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&App` (rendering) or `&mut App` (event handling).

use std::collections::HashMap;

use ratatui::layout::Rect;

use crate::config::Keymap;
use crate::core::editor::Editor;
use crate::core::mode;
use crate::core::window::WindowId;

/// Modal kill confirmation in progress.
///
/// One question per modified buffer, asked front to back. Answers are
/// collected first; the kill itself runs once the queue drains, so a
/// single keypress can cover several marked rows.
pub struct KillPrompt {
    /// Listing window the kill was requested from.
    pub window: WindowId,
    /// Buffer names still waiting for an answer, front first.
    pub queue: Vec<String>,
    /// Answers recorded so far (`true` = kill).
    pub answers: HashMap<String, bool>,
}

impl KillPrompt {
    /// Name currently being asked about.
    pub fn current(&self) -> Option<&str> {
        self.queue.first().map(String::as_str)
    }
}

/// Top-level application state.
pub struct App {
    /// The whole editor model: buffers, windows, listing views.
    pub editor: Editor,
    /// Key binding tables.
    pub keymap: Keymap,
    /// Waiting for the second key of a `Ctrl-X` sequence.
    pub pending_prefix: bool,
    /// `Ctrl-U` was seen; the next listing open includes system buffers.
    pub universal_argument: bool,
    /// `--all` on the command line: every open includes system buffers.
    pub open_all: bool,
    /// Kill confirmation dialog, when one is up.
    pub kill_prompt: Option<KillPrompt>,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Terminal size from the last draw, for mouse hit tests.
    pub terminal_area: Rect,
    /// Inner row area of the listing popup from the last draw.
    pub popup_rows: Option<Rect>,
    /// Controls the main event loop.
    pub should_quit: bool,
}

impl App {
    pub fn new(editor: Editor) -> Self {
        Self {
            editor,
            keymap: Keymap::new(),
            pending_prefix: false,
            universal_argument: false,
            open_all: false,
            kill_prompt: None,
            status_message: None,
            terminal_area: Rect::default(),
            popup_rows: None,
            should_quit: false,
        }
    }

    /// The active window when it is showing the buffer menu.
    pub fn listing_window(&self) -> Option<WindowId> {
        let w = self.editor.active_window;
        let buffer = self.editor.windows.get(w)?.buffer;
        let is_menu = mode::select_mode(&self.editor, buffer).name == mode::BUFFER_MENU;
        is_menu.then_some(w)
    }
}
