//! The editor aggregate: buffer registry, window table, the shared
//! sort configuration and the `*log*` message sink.
//!
//! Listing-specific operations live in [`super::listing`]; this module
//! provides the host surface they run against.

use std::collections::HashMap;
use std::path::Path;

use chrono::Local;
use tracing::debug;

use super::buffer::{Buffer, OpenError};
use super::listing::ListingView;
use super::registry::{BufferId, BufferRegistry, KillConfirm};
use super::sort::SortOrder;
use super::window::{Window, WindowId, WindowSet};

/// Name of the listing's backing buffer.
pub const LISTING_BUFFER: &str = "*bufmenu*";
pub const SCRATCH_BUFFER: &str = "*scratch*";
pub const LOG_BUFFER: &str = "*log*";

#[derive(Debug)]
pub struct Editor {
    pub buffers: BufferRegistry,
    pub windows: WindowSet,
    pub active_window: WindowId,
    /// Shared sort configuration; every listing rebuild snapshots it.
    pub sort: SortOrder,
    /// Listing view state, keyed by the backing display buffer.
    pub listings: HashMap<BufferId, ListingView>,
}

impl Editor {
    /// Editor with the built-in system buffers and one main window
    /// showing `*scratch*`.
    pub fn new() -> Self {
        let mut buffers = BufferRegistry::new();

        let mut scratch = Buffer::new(SCRATCH_BUFFER);
        scratch.system = true;
        let scratch = buffers.create(scratch);

        let mut log = Buffer::new(LOG_BUFFER);
        log.system = true;
        log.log = true;
        buffers.create(log);

        let mut windows = WindowSet::new();
        let active_window = windows.create(Window::new(scratch));

        Self {
            buffers,
            windows,
            active_window,
            sort: SortOrder::default(),
            listings: HashMap::new(),
        }
    }

    // ── buffers ──

    /// Open `path` as a new buffer. The caller decides where (and
    /// whether) to show it.
    pub fn open_file(&mut self, path: &Path) -> Result<BufferId, OpenError> {
        let buffer = Buffer::from_path(path)?;
        let name = buffer.name.clone();
        let id = self.buffers.create(buffer);
        self.log_message(format!("opened {name}"));
        Ok(id)
    }

    /// Show `buffer` in `window`, pushing the shown buffer onto the
    /// window's history link.
    pub fn show_buffer(&mut self, window: WindowId, buffer: BufferId) {
        if let Some(win) = self.windows.get_mut(window) {
            if win.buffer != buffer {
                win.last_buffer = Some(win.buffer);
                win.buffer = buffer;
                win.cursor = (0, 0);
                win.top_line = 0;
            }
        }
    }

    /// Buffer shown in the active window.
    pub fn active_buffer(&self) -> Option<BufferId> {
        self.windows.get(self.active_window).map(|w| w.buffer)
    }

    /// Kill a buffer: consult `confirm` when it is modified, re-point
    /// windows that show it, and drop any listing state attached to it.
    pub fn kill_buffer(&mut self, id: BufferId, confirm: &mut dyn KillConfirm) -> bool {
        let Some(buf) = self.buffers.get(id) else {
            return false;
        };
        if buf.modified && !confirm.confirm_kill(&buf.name) {
            debug!(name = %buf.name, "kill declined");
            return false;
        }
        let name = buf.name.clone();

        let fallback = self.kill_fallback(id);
        for wid in self.windows.ids() {
            let shows = self.windows.get(wid).is_some_and(|w| w.buffer == id);
            if !shows {
                continue;
            }
            let next = self
                .windows
                .get(wid)
                .and_then(|w| w.last_buffer)
                .filter(|&b| b != id && self.buffers.contains(b))
                .unwrap_or(fallback);
            if let Some(win) = self.windows.get_mut(wid) {
                win.buffer = next;
                win.last_buffer = None;
                win.cursor = (0, 0);
                win.top_line = 0;
            }
        }

        // Listing state attached to the dying buffer dies with it.
        self.listings.remove(&id);
        self.buffers.remove(id);
        self.log_message(format!("killed buffer {name}"));
        true
    }

    /// Replacement buffer for windows orphaned by a kill: any ordinary
    /// buffer, then any buffer at all, then a fresh `*scratch*`.
    fn kill_fallback(&mut self, dying: BufferId) -> BufferId {
        let ordinary = self
            .buffers
            .ids()
            .find(|&b| b != dying && self.buffers.get(b).is_some_and(|buf| !buf.system));
        if let Some(b) = ordinary {
            return b;
        }
        if let Some(b) = self.buffers.ids().find(|&b| b != dying) {
            return b;
        }
        let mut scratch = Buffer::new(SCRATCH_BUFFER);
        scratch.system = true;
        self.buffers.create(scratch)
    }

    // ── logging ──

    /// Append a timestamped line to the `*log*` buffer.
    pub fn log_message(&mut self, text: impl Into<String>) {
        let text = text.into();
        debug!(message = %text, "editor log");
        let id = match self.buffers.find(LOG_BUFFER) {
            Some(id) => id,
            None => {
                let mut log = Buffer::new(LOG_BUFFER);
                log.system = true;
                log.log = true;
                self.buffers.create(log)
            }
        };
        let line = format!("{} {text}", Local::now().format("%H:%M:%S"));
        if let Some(buf) = self.buffers.get_mut(id) {
            buf.append_line(line);
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────── tests ─────────────
