//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout with the text view and a bottom status bar.
pub struct AppLayout {
    pub view_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // text view (takes all remaining space)
                Constraint::Length(1), // status / message bar
            ])
            .split(area);

        Self {
            view_area: chunks[0],
            status_area: chunks[1],
        }
    }
}

/// Centered rectangle for the buffer-menu popup, sized for `rows` list
/// rows plus the border.
pub fn popup_rect(area: Rect, rows: u16) -> Rect {
    let width = (area.width / 6).saturating_mul(5).max(40.min(area.width));
    let max_height = area.height.saturating_sub(2).max(3);
    let height = rows.saturating_add(2).clamp(3, max_height);
    centered_fixed(width, height, area)
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
