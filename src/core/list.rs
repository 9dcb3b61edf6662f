//! Generic line-per-row list behavior.
//!
//! Listing-style modes keep one row per buffer line and drive the
//! cursor by whole rows. The buffer menu composes with these helpers
//! rather than carrying private copies of them.

use super::window::Window;

/// Row index under the cursor.
pub fn cursor_row(window: &Window) -> usize {
    window.cursor_line()
}

/// Put the cursor on `row`, clamped into the list.
pub fn set_cursor_row(window: &mut Window, rows: usize, row: usize) {
    let max = rows.saturating_sub(1);
    window.cursor = (row.min(max), 0);
}

/// Move the cursor by `delta` rows, staying inside the list.
pub fn move_cursor(window: &mut Window, rows: usize, delta: isize) {
    let max = rows.saturating_sub(1) as isize;
    let row = (cursor_row(window) as isize + delta).clamp(0, max.max(0));
    window.cursor = (row as usize, 0);
}

/// Pull the cursor back onto the last row after the list shrank.
pub fn clamp_cursor(window: &mut Window, rows: usize) {
    let max = rows.saturating_sub(1);
    if window.cursor_line() > max {
        window.cursor = (max, 0);
    }
}

// ───────────────────────────────────────── tests ─────────────
