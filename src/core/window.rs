//! Window table - where buffers are shown.
//!
//! Windows use the same generation-handle arena scheme as the buffer
//! registry. A window holds the shown buffer, a previous-buffer history
//! link, and the cursor and scroll state a listing rebuild preserves.

use super::registry::BufferId;

/// Generation-checked handle to a window slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId {
    index: u32,
    generation: u32,
}

/// A viewport onto a buffer.
#[derive(Debug, Clone)]
pub struct Window {
    pub buffer: BufferId,
    /// Previously shown buffer, for history restore.
    pub last_buffer: Option<BufferId>,
    /// Cursor position as (line, column).
    pub cursor: (usize, usize),
    /// First visible line.
    pub top_line: usize,
    /// Popup windows float above the main window.
    pub popup: bool,
}

impl Window {
    pub fn new(buffer: BufferId) -> Self {
        Self {
            buffer,
            last_buffer: None,
            cursor: (0, 0),
            top_line: 0,
            popup: false,
        }
    }

    pub fn new_popup(buffer: BufferId) -> Self {
        Self {
            popup: true,
            ..Self::new(buffer)
        }
    }

    pub fn cursor_line(&self) -> usize {
        self.cursor.0
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    window: Option<Window>,
}

/// Arena of windows.
#[derive(Debug, Default)]
pub struct WindowSet {
    slots: Vec<Slot>,
}

impl WindowSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, window: Window) -> WindowId {
        let free = self.slots.iter().position(|s| s.window.is_none());
        match free {
            Some(i) => {
                self.slots[i].window = Some(window);
                WindowId {
                    index: i as u32,
                    generation: self.slots[i].generation,
                }
            }
            None => {
                let i = self.slots.len();
                self.slots.push(Slot {
                    generation: 0,
                    window: Some(window),
                });
                WindowId {
                    index: i as u32,
                    generation: 0,
                }
            }
        }
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.window.as_ref()
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.window.as_mut()
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.get(id).is_some()
    }

    pub fn remove(&mut self, id: WindowId) -> Option<Window> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let window = slot.window.take()?;
        slot.generation += 1;
        Some(window)
    }

    /// Snapshot of all live window ids.
    pub fn ids(&self) -> Vec<WindowId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.window.is_some())
            .map(|(i, s)| WindowId {
                index: i as u32,
                generation: s.generation,
            })
            .collect()
    }
}

// ───────────────────────────────────────── tests ─────────────
