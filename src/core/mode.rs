//! Display-mode selection.
//!
//! Each mode advertises a probe score for a buffer and the highest
//! score wins. The buffer menu probes high when its view state is
//! attached, composing with the plain-text fallback instead of
//! replacing it.

use super::editor::Editor;
use super::registry::BufferId;

pub const TEXT: &str = "text";
pub const BUFFER_MENU: &str = "bufmenu";

/// A selectable display mode.
#[derive(Clone, Copy)]
pub struct ModeDef {
    pub name: &'static str,
    /// Suitability score for a buffer; 0 opts out.
    pub probe: fn(&Editor, BufferId) -> u8,
}

pub static MODES: [ModeDef; 2] = [
    ModeDef {
        name: BUFFER_MENU,
        probe: |editor, buffer| {
            if editor.listing_attached(buffer) {
                95
            } else {
                0
            }
        },
    },
    ModeDef {
        name: TEXT,
        probe: |_, _| 10,
    },
];

/// Mode shown for `buffer`, picked by the highest probe score.
pub fn select_mode(editor: &Editor, buffer: BufferId) -> &'static ModeDef {
    let mut best = &MODES[1];
    let mut best_score = 0;
    for mode in &MODES {
        let score = (mode.probe)(editor, buffer);
        if score > best_score {
            best = mode;
            best_score = score;
        }
    }
    best
}

// ───────────────────────────────────────── tests ─────────────
