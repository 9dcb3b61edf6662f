//! Read-only text widget for ordinary buffers — paints the buffer's
//! lines with the cursor line highlighted.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use super::theme::Theme;

/// Persistent state for the text view (cursor line, scroll offset).
#[derive(Debug, Default)]
pub struct TextViewState {
    pub cursor: usize,
    pub top: usize,
}

impl TextViewState {
    /// Ensure the cursor line is visible within a viewport of `height` rows.
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

/// The text view widget — created fresh each frame.
pub struct TextView<'a> {
    lines: &'a [String],
    block: Option<Block<'a>>,
}

impl<'a> TextView<'a> {
    pub fn new(lines: &'a [String]) -> Self {
        Self { lines, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl<'a> StatefulWidget for TextView<'a> {
    type State = TextViewState;

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

        for (i, (line_idx, text)) in visible.enumerate() {
            let y = inner.y + i as u16;
            let style = if line_idx == state.cursor {
                Theme::cursor_line_style()
            } else {
                Theme::text_style()
            };
            let line = Line::from(Span::styled(text.as_str(), style));
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
