//! Custom Ratatui widget that renders the buffer menu — the formatted
//! rows of the listing's display buffer with mark, selection and
//! liveness styling layered on top.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::core::listing::ListEntry;
use crate::core::registry::BufferRegistry;

use super::theme::Theme;

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the menu widget (cursor row, scroll offset).
#[derive(Debug, Default)]
pub struct MenuState {
    /// Row the cursor is on.
    pub cursor: usize,
    /// Vertical scroll offset (first visible row).
    pub top: usize,
}

impl MenuState {
    /// Ensure the cursor row is visible within a viewport of `height` rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.top {
            self.top = self.cursor;
        } else if self.cursor >= self.top + height {
            self.top = self.cursor - height + 1;
        }
    }
}

// ───────────────────────────────────────── widget ────────────

/// The menu widget itself — created fresh each frame.
pub struct MenuWidget<'a> {
    /// Formatted row text, one line per entry.
    lines: &'a [String],
    /// The entries the rows were built from, for styling.
    entries: &'a [ListEntry],
    buffers: &'a BufferRegistry,
    block: Option<Block<'a>>,
}

impl<'a> MenuWidget<'a> {
    pub fn new(
        lines: &'a [String],
        entries: &'a [ListEntry],
        buffers: &'a BufferRegistry,
    ) -> Self {
        Self {
            lines,
            entries,
            buffers,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn row_style(&self, index: usize) -> ratatui::style::Style {
        match self
            .entries
            .get(index)
            .and_then(|e| self.buffers.get(e.buffer))
        {
            None => Theme::dead_row_style(),
            Some(b) if b.dired => Theme::directory_row_style(),
            Some(b) if b.system => Theme::system_row_style(),
            Some(_) => Theme::row_style(),
        }
    }
}

impl<'a> StatefulWidget for MenuWidget<'a> {
    type State = MenuState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        state.clamp_scroll(inner.height as usize);

        let visible = self
            .lines
            .iter()
            .enumerate()
            .skip(state.top)
            .take(inner.height as usize);

        for (i, (row_idx, text)) in visible.enumerate() {
            let y = inner.y + i as u16;
            let is_selected = row_idx == state.cursor;

            let marked = self.entries.get(row_idx).is_some_and(|e| e.marked);
            let body_style = if is_selected {
                Theme::selected_style()
            } else {
                self.row_style(row_idx)
            };
            let lead_style = if is_selected {
                Theme::selected_style()
            } else if marked {
                Theme::marked_style()
            } else {
                body_style
            };

            // Rows always start with a one-column lead; a mark paints
            // over it.
            let lead = if marked { ">" } else { " " };
            let body = text.get(1..).unwrap_or(text.as_str());
            let line = Line::from(vec![
                Span::styled(lead, lead_style),
                Span::styled(body, body_style),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

// ───────────────────────────────────────── tests ─────────────
