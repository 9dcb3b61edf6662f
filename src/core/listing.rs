//! The buffer menu core: entries, view state, the list builder and the
//! selection dispatcher.
//!
//! The menu projects the buffer registry into the rows of a read-only
//! display buffer. Entries hold generation-checked handles only; a
//! buffer killed underneath the menu degrades to a sparse row until the
//! next rebuild resolves it away.

use tracing::{debug, trace};

use super::buffer::Buffer;
use super::editor::{Editor, LISTING_BUFFER};
use super::list;
use super::registry::{BufferId, KillConfirm};
use super::sort::{self, SortField, SortOrder};
use super::window::{Window, WindowId};

/// Width of the buffer-name column.
const NAME_COLUMN: usize = 20;

// ───────────────────────────────────────── view state ────────

/// One listing row.
#[derive(Debug, Clone)]
pub struct ListEntry {
    pub buffer: BufferId,
    /// Name snapshot, shown even after the buffer is gone.
    pub name: String,
    /// Multi-select mark. Cleared by every rebuild.
    pub marked: bool,
}

/// How the selection commands resolve a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Switch the invoking window and close the menu.
    Commit,
    /// Switch the invoking window, keep the menu open.
    Preview,
    /// Restore the invocation-time buffer and close the menu.
    Abort,
}

/// Per-listing state, attached to the backing display buffer and
/// re-seeded each time the menu is opened.
#[derive(Debug)]
pub struct ListingView {
    pub entries: Vec<ListEntry>,
    /// Include system buffers.
    pub all_visible: bool,
    /// Sort configuration the last rebuild used.
    pub last_sort: SortOrder,
    /// Row previewed last. Drives the preview debounce and the cursor
    /// target of the next rebuild; `None` targets the row of the
    /// invocation-time buffer instead.
    pub last_index: Option<usize>,
    /// Window the menu was invoked from.
    pub invoking_window: WindowId,
    /// Buffer shown there at invocation time.
    pub cur_buffer: Option<BufferId>,
    /// Buffer shown before that, for history restore on abort.
    pub prior_buffer: Option<BufferId>,
}

// ───────────────────────────────────────── operations ────────

impl Editor {
    /// True when listing view state is attached to `buffer`.
    pub fn listing_attached(&self, buffer: BufferId) -> bool {
        self.listings.contains_key(&buffer)
    }

    /// Display buffer of the listing shown in `window`, if any.
    fn listing_display(&self, window: WindowId) -> Option<BufferId> {
        let display = self.windows.get(window)?.buffer;
        self.listings.contains_key(&display).then_some(display)
    }

    fn cursor_index(&self, window: WindowId) -> usize {
        self.windows.get(window).map(list::cursor_row).unwrap_or(0)
    }

    /// Open the buffer menu above the active window and rebuild it.
    ///
    /// Refused when invoked from a popup (the menu itself included).
    /// The display buffer is reused across opens; its view state is
    /// re-seeded with the invoking window and its buffer history, and
    /// the cursor lands on the invoking buffer's row.
    pub fn open_listing(&mut self, show_system: bool) -> Option<WindowId> {
        let invoking = self.active_window;
        let win = self.windows.get(invoking)?;
        if win.popup {
            return None;
        }
        let cur_buffer = win.buffer;
        let prior_buffer = win.last_buffer;

        let display = self.buffers.find_or_create(LISTING_BUFFER, || {
            let mut b = Buffer::new(LISTING_BUFFER);
            b.system = true;
            b.read_only = true;
            b.style_bytes = 1;
            b
        });

        let popup = self.windows.create(Window::new_popup(display));
        self.active_window = popup;
        self.listings.insert(
            display,
            ListingView {
                entries: Vec::new(),
                all_visible: show_system,
                last_sort: self.sort,
                last_index: None,
                invoking_window: invoking,
                cur_buffer: Some(cur_buffer),
                prior_buffer,
            },
        );
        debug!(all = show_system, "open buffer listing");
        self.rebuild_listing(popup);
        Some(popup)
    }

    /// Rebuild the entry list and re-render the display buffer.
    ///
    /// Entries are collected from live buffers in creation order,
    /// sorted under a snapshot of the shared configuration (creation
    /// order skips the sort entirely), and rendered as fixed-column
    /// rows. The cursor is re-targeted from the consumed
    /// `last_index`, falling back to the invocation-time buffer's row,
    /// and the viewport keeps the cursor's screen row where possible.
    pub fn rebuild_listing(&mut self, listing_window: WindowId) {
        let Some(display) = self.listing_display(listing_window) else {
            return;
        };
        let order = self.sort;
        let all_visible = self.listings[&display].all_visible;

        let mut entries: Vec<ListEntry> = Vec::new();
        for id in self.buffers.ids() {
            let Some(buf) = self.buffers.get(id) else {
                continue;
            };
            if buf.system && !all_visible {
                continue;
            }
            entries.push(ListEntry {
                buffer: id,
                name: buf.name.clone(),
                marked: false,
            });
        }
        if !order.is_unsorted() {
            entries.sort_by(|a, b| {
                match (self.buffers.get(a.buffer), self.buffers.get(b.buffer)) {
                    (Some(ba), Some(bb)) => sort::compare(order, ba, bb),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
            });
        }

        // Viewport snapshot before the clear: the cursor's screen row.
        let vpos = match (self.windows.get(listing_window), self.buffers.get(display)) {
            (Some(win), Some(buf)) if buf.line_count() > 0 => {
                Some(win.cursor_line() as isize - win.top_line as isize)
            }
            _ => None,
        };
        let (last_index, cur_buffer) = {
            let view = &self.listings[&display];
            (view.last_index, view.cur_buffer)
        };

        let mut target: Option<usize> = None;
        let mut rows = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if (last_index.is_none() && Some(entry.buffer) == cur_buffer)
                || last_index.is_some_and(|last| last >= i)
            {
                target = Some(i);
            }
            rows.push(format_row(entry, self.buffers.get(entry.buffer)));
        }
        let row_count = rows.len();

        if let Some(buf) = self.buffers.get_mut(display) {
            buf.set_lines(rows);
            buf.modified = false;
            buf.read_only = true;
        }
        if let Some(view) = self.listings.get_mut(&display) {
            view.entries = entries;
            view.last_sort = order;
            view.last_index = None;
        }
        if let Some(win) = self.windows.get_mut(listing_window) {
            match target {
                Some(row) => win.cursor = (row, 0),
                None => list::clamp_cursor(win, row_count),
            }
            let row = win.cursor_line() as isize;
            win.top_line = match vpos {
                Some(delta) if delta >= 0 && row > delta => (row - delta) as usize,
                _ => 0,
            };
        }
        trace!(rows = row_count, sort = ?order, "rebuilt listing");
    }

    /// Resolve the row under the cursor (commit/preview) or bail out of
    /// the menu (abort).
    pub fn listing_select(&mut self, window: WindowId, mode: SelectMode) {
        let Some(display) = self.listing_display(window) else {
            return;
        };
        let index = self.cursor_index(window);

        let view = &self.listings[&display];
        let invoking = view.invoking_window;
        let (target, link) = match mode {
            SelectMode::Abort => (
                view.cur_buffer.filter(|&b| self.buffers.contains(b)),
                view.prior_buffer.filter(|&b| self.buffers.contains(b)),
            ),
            _ => {
                // A cursor resolving no entry makes commit and preview
                // no-ops; the menu stays open.
                let Some(entry) = view.entries.get(index) else {
                    return;
                };
                // The row previewed last: no-op.
                if mode == SelectMode::Preview && view.last_index == Some(index) {
                    return;
                }
                // The history link is stored unvalidated; it is
                // checked again whenever it gets used.
                (
                    Some(entry.buffer).filter(|&b| self.buffers.contains(b)),
                    view.cur_buffer,
                )
            }
        };

        if let Some(target) = target {
            if let Some(win) = self.windows.get_mut(invoking) {
                win.buffer = target;
                win.last_buffer = link;
                win.cursor = (0, 0);
                win.top_line = 0;
            }
        }

        match mode {
            SelectMode::Preview => {
                if let Some(view) = self.listings.get_mut(&display) {
                    view.last_index = Some(index);
                }
                trace!(index, "previewed row");
            }
            _ => self.close_listing(window, display),
        }
    }

    /// Delete the popup window and hand focus back to the invoking
    /// window. Only popups are deleted; an ordinary window showing the
    /// listing merely switches away. The display buffer and its view
    /// state survive for the next open.
    fn close_listing(&mut self, window: WindowId, display: BufferId) {
        if self.windows.get(window).is_some_and(|w| w.popup) {
            self.windows.remove(window);
        }
        let invoking = self.listings.get(&display).map(|v| v.invoking_window);
        let next = invoking
            .filter(|&w| self.windows.contains(w))
            .or_else(|| self.windows.ids().first().copied());
        if let Some(w) = next {
            self.active_window = w;
        }
        debug!("closed buffer listing");
    }

    /// Rows the kill targets: the marked rows, or the cursor row when
    /// nothing is marked.
    fn target_rows(&self, display: BufferId, index: usize) -> Vec<usize> {
        let Some(view) = self.listings.get(&display) else {
            return Vec::new();
        };
        let marked: Vec<usize> = view
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.marked)
            .map(|(i, _)| i)
            .collect();
        if !marked.is_empty() {
            return marked;
        }
        if index < view.entries.len() {
            vec![index]
        } else {
            Vec::new()
        }
    }

    fn entry_buffer(&self, display: BufferId, row: usize) -> Option<BufferId> {
        self.listings
            .get(&display)
            .and_then(|v| v.entries.get(row))
            .map(|e| e.buffer)
    }

    /// Names of targeted buffers that are modified and would prompt
    /// before a kill. Lets a caller collect answers up front and feed
    /// them to [`listing_kill`](Self::listing_kill).
    pub fn listing_kill_prompts(&self, window: WindowId) -> Vec<String> {
        let Some(display) = self.listing_display(window) else {
            return Vec::new();
        };
        let index = self.cursor_index(window);
        let mut names = Vec::new();
        for row in self.target_rows(display, index) {
            let Some(id) = self.entry_buffer(display, row) else {
                continue;
            };
            if id == display {
                continue;
            }
            let Some(buf) = self.buffers.get(id) else {
                continue;
            };
            if buf.modified && !names.contains(&buf.name) {
                names.push(buf.name.clone());
            }
        }
        names
    }

    /// Kill the targeted buffers.
    ///
    /// Dead rows are skipped and the menu's own backing buffer is never
    /// a valid target. `confirm` is consulted for modified buffers
    /// only. Afterwards the cursor row is preview-selected (recording
    /// the row for the rebuild even when its buffer died) and the list
    /// rebuilt.
    pub fn listing_kill(&mut self, window: WindowId, confirm: &mut dyn KillConfirm) {
        let Some(display) = self.listing_display(window) else {
            return;
        };
        let index = self.cursor_index(window);
        for row in self.target_rows(display, index) {
            let Some(id) = self.entry_buffer(display, row) else {
                continue;
            };
            if id == display {
                debug!("refusing to kill the listing's own buffer");
                continue;
            }
            if !self.buffers.contains(id) {
                continue;
            }
            self.kill_buffer(id, confirm);
        }
        self.listing_select(window, SelectMode::Preview);
        self.rebuild_listing(window);
    }

    /// Clear the modified flag on the buffer under the cursor. Marks do
    /// not apply; this is a single-row command.
    pub fn listing_clear_modified(&mut self, window: WindowId) {
        let Some(display) = self.listing_display(window) else {
            return;
        };
        let index = self.cursor_index(window);
        let Some(id) = self.entry_buffer(display, index) else {
            return;
        };
        let Some(buf) = self.buffers.get_mut(id) else {
            return;
        };
        buf.modified = false;
        self.rebuild_listing(window);
    }

    /// Toggle the read-only flag on the buffer under the cursor.
    pub fn listing_toggle_read_only(&mut self, window: WindowId) {
        let Some(display) = self.listing_display(window) else {
            return;
        };
        let index = self.cursor_index(window);
        let Some(id) = self.entry_buffer(display, index) else {
            return;
        };
        let Some(buf) = self.buffers.get_mut(id) else {
            return;
        };
        buf.read_only = !buf.read_only;
        self.rebuild_listing(window);
    }

    /// Toggle the multi-select mark on the cursor row and step down.
    /// Marks are a display attribute; the row text is untouched.
    pub fn listing_toggle_mark(&mut self, window: WindowId) {
        let Some(display) = self.listing_display(window) else {
            return;
        };
        let index = self.cursor_index(window);
        let rows = match self.listings.get_mut(&display) {
            Some(view) => {
                if let Some(entry) = view.entries.get_mut(index) {
                    entry.marked = !entry.marked;
                }
                view.entries.len()
            }
            None => return,
        };
        if let Some(win) = self.windows.get_mut(window) {
            list::move_cursor(win, rows, 1);
        }
    }

    /// Toggle "show system buffers" and rebuild.
    pub fn listing_toggle_all(&mut self, window: WindowId) {
        let Some(display) = self.listing_display(window) else {
            return;
        };
        if let Some(view) = self.listings.get_mut(&display) {
            view.all_visible = !view.all_visible;
        }
        self.rebuild_listing(window);
    }

    /// Select the sort field (repeating it flips the direction) and
    /// rebuild under the new configuration. The recorded preview row is
    /// dropped first so the cursor re-locks onto the invocation-time
    /// buffer's row wherever the new order puts it.
    pub fn listing_set_sort(&mut self, window: WindowId, field: SortField) {
        let Some(display) = self.listing_display(window) else {
            return;
        };
        self.sort.set_field(field);
        if let Some(view) = self.listings.get_mut(&display) {
            view.last_index = None;
        }
        self.rebuild_listing(window);
    }

    /// Rebuild on demand.
    pub fn listing_refresh(&mut self, window: WindowId) {
        self.rebuild_listing(window);
    }

    /// Per-frame hook for the active listing window: clamp the cursor
    /// past the last row, then auto-preview when shown as a popup.
    pub fn listing_display_hook(&mut self) {
        let window = self.active_window;
        let Some(display) = self.listing_display(window) else {
            return;
        };
        let rows = self.listings[&display].entries.len();
        let is_popup = match self.windows.get_mut(window) {
            Some(win) => {
                list::clamp_cursor(win, rows);
                win.popup
            }
            None => return,
        };
        if is_popup {
            self.listing_select(window, SelectMode::Preview);
        }
    }
}

// ───────────────────────────────────────── row rendering ─────

/// Render one row of the listing.
///
/// Layout: a mark column, the 2-char flag gutter (`S` system, `*`
/// modified, `%` read-only, first match wins), the name, then for live
/// buffers the size, style width, charset, mode label and display
/// path. Rows whose buffer is gone stop after the name.
fn format_row(entry: &ListEntry, buf: Option<&Buffer>) -> String {
    let mut flags = String::new();
    if let Some(b) = buf {
        if b.system {
            flags.push('S');
        } else if b.modified {
            flags.push('*');
        } else if b.read_only {
            flags.push('%');
        }
    }
    let mut row = format!(
        " {flags:<2}{name:<width$}",
        name = shorten_name(&entry.name),
        width = NAME_COLUMN
    );
    if let Some(b) = buf {
        let style_width = b.style_bytes & 7;
        let style = match style_width {
            0 => ' ',
            n => char::from_digit(n as u32, 10).unwrap_or(' '),
        };
        row.push_str(&format!(
            " {size:>10} {style} {charset:<8.8} {mode:<11} {path}",
            size = b.size(),
            charset = b.charset.name(),
            mode = b.mode_label(),
            path = b.display_path(),
        ));
    }
    row
}

/// Fit `name` into the name column: longer names keep the first 12 and
/// the last 5 characters around a three-dot ellipsis.
fn shorten_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= NAME_COLUMN {
        return name.to_string();
    }
    let head: String = chars[..NAME_COLUMN - 8].iter().collect();
    let tail: String = chars[chars.len() - 5..].iter().collect();
    format!("{head}...{tail}")
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::editor::SCRATCH_BUFFER;

    struct Counting {
        asked: Vec<String>,
        answer: bool,
    }

    impl Counting {
        fn yes() -> Self {
            Self {
                asked: Vec::new(),
                answer: true,
            }
        }
    }

    impl KillConfirm for Counting {
        fn confirm_kill(&mut self, name: &str) -> bool {
            self.asked.push(name.to_string());
            self.answer
        }
    }

    fn file_buffer(name: &str, path: &str, size: u64, modified: bool) -> Buffer {
        let mut b = Buffer::new(name);
        b.filename = Some(path.into());
        if size > 0 {
            b.set_lines(vec!["x".repeat(size as usize - 1)]);
        }
        b.modified = modified;
        b
    }

    /// Editor with `main.txt` (500 bytes) and `notes.md` (50 bytes,
    /// modified) open, the main window showing `main.txt`.
    fn scenario_editor() -> (Editor, BufferId, BufferId) {
        let mut ed = Editor::new();
        let main = ed
            .buffers
            .create(file_buffer("main.txt", "/tmp/main.txt", 500, false));
        let notes = ed
            .buffers
            .create(file_buffer("notes.md", "/tmp/notes.md", 50, true));
        let w = ed.active_window;
        ed.show_buffer(w, main);
        (ed, main, notes)
    }

    fn open(ed: &mut Editor) -> (WindowId, BufferId) {
        let w = ed.open_listing(false).expect("listing should open");
        let display = ed.windows.get(w).unwrap().buffer;
        (w, display)
    }

    fn names(ed: &Editor, display: BufferId) -> Vec<String> {
        ed.listings[&display]
            .entries
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    // -- rebuild and sorting ---------------------------------------------

    #[test]
    fn scenario_sort_cycle_and_visibility() {
        let (mut ed, ..) = scenario_editor();
        let (w, display) = open(&mut ed);
        assert_eq!(names(&ed, display), ["main.txt", "notes.md"]);

        ed.listing_set_sort(w, SortField::Size);
        assert_eq!(names(&ed, display), ["notes.md", "main.txt"]);

        ed.listing_set_sort(w, SortField::Size);
        assert_eq!(names(&ed, display), ["main.txt", "notes.md"]);
        assert!(ed.sort.descending);
        assert_eq!(ed.listings[&display].last_sort, ed.sort);

        ed.listing_set_sort(w, SortField::ModifiedFirst);
        assert_eq!(names(&ed, display), ["notes.md", "main.txt"]);
        assert!(!ed.sort.descending);

        ed.listing_toggle_all(w);
        let all = names(&ed, display);
        assert_eq!(all[..2], ["notes.md".to_string(), "main.txt".to_string()]);
        let tail: Vec<&str> = all[2..].iter().map(|s| s.as_str()).collect();
        assert_eq!(tail, ["*bufmenu*", "*log*", "*scratch*"]);
    }

    #[test]
    fn rebuild_lists_every_visible_buffer_exactly_once() {
        let (mut ed, ..) = scenario_editor();
        let (w, display) = open(&mut ed);
        ed.listing_toggle_all(w);

        let mut got = names(&ed, display);
        got.sort();
        let mut expect: Vec<String> = ed
            .buffers
            .ids()
            .filter_map(|id| ed.buffers.get(id))
            .map(|b| b.name.clone())
            .collect();
        expect.sort();
        assert_eq!(got, expect);
    }

    #[test]
    fn rebuild_keeps_the_cursor_screen_row() {
        let mut ed = Editor::new();
        for i in 0..30 {
            ed.buffers.create(Buffer::new(format!("b{i:02}")));
        }
        let (w, display) = open(&mut ed);

        {
            let win = ed.windows.get_mut(w).unwrap();
            win.cursor = (20, 0);
            win.top_line = 10;
        }
        ed.listings.get_mut(&display).unwrap().last_index = Some(20);
        ed.rebuild_listing(w);

        let win = ed.windows.get(w).unwrap();
        assert_eq!(win.cursor_line(), 20);
        assert_eq!(win.top_line, 10);
        // The recorded row is consumed by the rebuild.
        assert_eq!(ed.listings[&display].last_index, None);
    }

    #[test]
    fn rebuild_clamps_the_recorded_row_into_the_list() {
        let (mut ed, _main, notes) = scenario_editor();
        let (w, display) = open(&mut ed);

        ed.windows.get_mut(w).unwrap().cursor = (1, 0);
        ed.buffers.remove(notes);
        ed.listings.get_mut(&display).unwrap().last_index = Some(1);
        ed.rebuild_listing(w);

        assert_eq!(names(&ed, display), ["main.txt"]);
        assert_eq!(ed.windows.get(w).unwrap().cursor_line(), 0);
    }

    #[test]
    fn cursor_opens_on_the_invoking_buffer_row() {
        let (mut ed, _main, notes) = scenario_editor();
        ed.show_buffer(ed.active_window, notes);
        let (w, _display) = open(&mut ed);
        assert_eq!(ed.windows.get(w).unwrap().cursor_line(), 1);
    }

    #[test]
    fn sorting_relocks_the_cursor_on_the_invoking_buffer() {
        let (mut ed, main, _notes) = scenario_editor();
        let invoking = ed.active_window;
        let (w, display) = open(&mut ed);

        // The per-frame hook has already previewed the first row.
        ed.listing_display_hook();
        assert_eq!(ed.listings[&display].last_index, Some(0));

        // Size ascending moves main.txt to row 1. The recorded preview
        // row is dropped, not replayed against the new order.
        ed.listing_set_sort(w, SortField::Size);
        assert_eq!(names(&ed, display), ["notes.md", "main.txt"]);
        assert_eq!(ed.windows.get(w).unwrap().cursor_line(), 1);

        ed.listing_display_hook();
        assert_eq!(ed.windows.get(invoking).unwrap().buffer, main);
    }

    // -- selection -------------------------------------------------------

    #[test]
    fn preview_switches_the_invoking_window_and_debounces() {
        let (mut ed, main, notes) = scenario_editor();
        let invoking = ed.active_window;
        let (w, display) = open(&mut ed);

        ed.windows.get_mut(w).unwrap().cursor = (1, 0);
        ed.listing_select(w, SelectMode::Preview);
        let win = ed.windows.get(invoking).unwrap();
        assert_eq!(win.buffer, notes);
        // History keeps pointing at the buffer the menu was opened on.
        assert_eq!(win.last_buffer, Some(main));
        assert_eq!(ed.listings[&display].last_index, Some(1));

        // Same row again is a no-op; the menu stays open and focused.
        ed.listing_select(w, SelectMode::Preview);
        assert_eq!(ed.listings[&display].last_index, Some(1));
        assert_eq!(ed.active_window, w);
    }

    #[test]
    fn commit_closes_and_records_history() {
        let (mut ed, main, notes) = scenario_editor();
        let invoking = ed.active_window;
        let (w, _display) = open(&mut ed);

        ed.windows.get_mut(w).unwrap().cursor = (1, 0);
        ed.listing_select(w, SelectMode::Commit);

        assert!(!ed.windows.contains(w));
        assert_eq!(ed.active_window, invoking);
        let win = ed.windows.get(invoking).unwrap();
        assert_eq!(win.buffer, notes);
        assert_eq!(win.last_buffer, Some(main));
    }

    #[test]
    fn abort_restores_the_invocation_buffers() {
        let (mut ed, main, _notes) = scenario_editor();
        let invoking = ed.active_window;
        let prior = ed.windows.get(invoking).unwrap().last_buffer;
        let (w, _display) = open(&mut ed);

        // Browse away with a preview, then abort.
        ed.windows.get_mut(w).unwrap().cursor = (1, 0);
        ed.listing_select(w, SelectMode::Preview);
        ed.listing_select(w, SelectMode::Abort);

        assert!(!ed.windows.contains(w));
        let win = ed.windows.get(invoking).unwrap();
        assert_eq!(win.buffer, main);
        assert_eq!(win.last_buffer, prior);
    }

    #[test]
    fn abort_after_the_invoking_buffer_died_only_closes() {
        let (mut ed, main, _notes) = scenario_editor();
        let invoking = ed.active_window;
        let (w, _display) = open(&mut ed);

        // The invocation-time buffer dies; the orphaned window gets
        // re-pointed by the kill itself.
        let mut confirm = Counting::yes();
        assert!(ed.kill_buffer(main, &mut confirm));
        let parked = ed.windows.get(invoking).unwrap().buffer;

        // The stale recorded buffer restores nothing on abort.
        ed.listing_select(w, SelectMode::Abort);
        assert!(!ed.windows.contains(w));
        assert_eq!(ed.active_window, invoking);
        assert_eq!(ed.windows.get(invoking).unwrap().buffer, parked);
    }

    #[test]
    fn commit_on_a_dead_row_still_closes_the_menu() {
        let (mut ed, main, notes) = scenario_editor();
        let invoking = ed.active_window;
        let (w, _display) = open(&mut ed);

        ed.windows.get_mut(w).unwrap().cursor = (1, 0);
        // notes.md dies behind the menu's back.
        ed.buffers.remove(notes);
        ed.listing_select(w, SelectMode::Commit);

        assert!(!ed.windows.contains(w));
        assert_eq!(ed.active_window, invoking);
        assert_eq!(ed.windows.get(invoking).unwrap().buffer, main);
    }

    #[test]
    fn select_past_the_end_is_a_no_op() {
        let (mut ed, main, _notes) = scenario_editor();
        let invoking = ed.active_window;
        let (w, display) = open(&mut ed);

        // Force an out-of-range cursor row, bypassing the clamp.
        ed.windows.get_mut(w).unwrap().cursor = (9, 0);
        ed.listing_select(w, SelectMode::Preview);
        assert_eq!(ed.listings[&display].last_index, None);

        // Commit resolves no entry either; the menu stays open.
        ed.listing_select(w, SelectMode::Commit);
        assert!(ed.windows.contains(w));
        assert_eq!(ed.active_window, w);
        assert_eq!(ed.windows.get(invoking).unwrap().buffer, main);
    }

    #[test]
    fn commit_in_an_empty_listing_keeps_the_menu_open() {
        // Only the system buffers exist and they are hidden: no rows.
        let mut ed = Editor::new();
        let (w, display) = open(&mut ed);
        assert!(names(&ed, display).is_empty());

        ed.listing_select(w, SelectMode::Commit);
        assert!(ed.windows.contains(w));
        assert_eq!(ed.active_window, w);

        // Abort still closes the empty menu.
        ed.listing_select(w, SelectMode::Abort);
        assert!(!ed.windows.contains(w));
    }

    #[test]
    fn open_from_the_popup_is_refused() {
        let (mut ed, ..) = scenario_editor();
        let _ = open(&mut ed);
        assert!(ed.open_listing(false).is_none());
    }

    #[test]
    fn reopen_reuses_the_display_buffer() {
        let (mut ed, ..) = scenario_editor();
        let (w, display) = open(&mut ed);
        ed.listing_select(w, SelectMode::Abort);

        let (_w2, display2) = open(&mut ed);
        assert_eq!(display, display2);
    }

    #[test]
    fn killing_the_display_buffer_drops_the_view_state() {
        let (mut ed, ..) = scenario_editor();
        let (w, display) = open(&mut ed);
        ed.listing_select(w, SelectMode::Abort);

        let mut confirm = Counting::yes();
        assert!(ed.kill_buffer(display, &mut confirm));
        assert!(!ed.listing_attached(display));

        // A later open starts from scratch with a fresh buffer.
        let (_w2, display2) = open(&mut ed);
        assert_ne!(display, display2);
        assert!(ed.listing_attached(display2));
    }

    // -- kill ------------------------------------------------------------

    #[test]
    fn kill_prompts_only_for_modified_buffers() {
        let (mut ed, main, notes) = scenario_editor();
        let (w, display) = open(&mut ed);

        // Cursor on notes.md, which is modified: exactly one prompt.
        ed.windows.get_mut(w).unwrap().cursor = (1, 0);
        let mut confirm = Counting::yes();
        ed.listing_kill(w, &mut confirm);
        assert_eq!(confirm.asked, ["notes.md"]);
        assert!(!ed.buffers.contains(notes));
        assert_eq!(names(&ed, display), ["main.txt"]);

        // main.txt is clean: killed without a prompt.
        let mut confirm = Counting {
            asked: Vec::new(),
            answer: false,
        };
        ed.listing_kill(w, &mut confirm);
        assert!(confirm.asked.is_empty());
        assert!(!ed.buffers.contains(main));
        assert!(names(&ed, display).is_empty());
    }

    #[test]
    fn prompt_scan_names_only_the_modified_targets() {
        let (mut ed, ..) = scenario_editor();
        let (w, _display) = open(&mut ed);

        // Mark both rows; only the modified one would prompt.
        ed.listing_toggle_mark(w);
        ed.listing_toggle_mark(w);
        assert_eq!(ed.listing_kill_prompts(w), ["notes.md"]);

        // With no marks the cursor row decides.
        ed.listing_refresh(w);
        ed.windows.get_mut(w).unwrap().cursor = (0, 0);
        assert!(ed.listing_kill_prompts(w).is_empty());
        ed.windows.get_mut(w).unwrap().cursor = (1, 0);
        assert_eq!(ed.listing_kill_prompts(w), ["notes.md"]);
    }

    #[test]
    fn declined_kill_keeps_buffer_and_row() {
        let (mut ed, _main, notes) = scenario_editor();
        let (w, display) = open(&mut ed);

        ed.windows.get_mut(w).unwrap().cursor = (1, 0);
        let mut confirm = Counting {
            asked: Vec::new(),
            answer: false,
        };
        ed.listing_kill(w, &mut confirm);
        assert_eq!(confirm.asked, ["notes.md"]);
        assert!(ed.buffers.contains(notes));
        assert_eq!(names(&ed, display), ["main.txt", "notes.md"]);
    }

    #[test]
    fn the_listing_never_kills_its_own_buffer() {
        let (mut ed, ..) = scenario_editor();
        let (w, display) = open(&mut ed);
        ed.listing_toggle_all(w);

        let row = names(&ed, display)
            .iter()
            .position(|n| n == LISTING_BUFFER)
            .unwrap();
        ed.windows.get_mut(w).unwrap().cursor = (row, 0);

        let mut confirm = Counting::yes();
        ed.listing_kill(w, &mut confirm);
        assert!(confirm.asked.is_empty());
        assert!(ed.buffers.contains(display));
        assert!(names(&ed, display).iter().any(|n| n == LISTING_BUFFER));
    }

    #[test]
    fn killing_the_viewed_buffer_repoints_the_window() {
        let (mut ed, main, notes) = scenario_editor();
        let invoking = ed.active_window;
        let (w, display) = open(&mut ed);

        // Cursor opens on main.txt, the buffer the window shows.
        let mut confirm = Counting::yes();
        ed.listing_kill(w, &mut confirm);

        assert!(!ed.buffers.contains(main));
        assert_eq!(names(&ed, display), ["notes.md"]);
        // The orphaned window fell back to its history link first.
        let shown = ed.windows.get(invoking).unwrap().buffer;
        assert_eq!(ed.buffers.get(shown).unwrap().name, SCRATCH_BUFFER);

        // The next frame's hook previews the re-resolved row.
        ed.listing_display_hook();
        assert_eq!(ed.windows.get(invoking).unwrap().buffer, notes);
    }

    // -- marks and flag toggles ------------------------------------------

    #[test]
    fn marks_target_the_kill_but_not_the_flag_toggles() {
        let (mut ed, main, notes) = scenario_editor();
        ed.buffers.get_mut(main).unwrap().modified = true;
        let (w, display) = open(&mut ed);

        // Mark both rows; the mark toggle steps downward.
        ed.listing_toggle_mark(w);
        ed.listing_toggle_mark(w);
        assert!(ed.listings[&display].entries.iter().all(|e| e.marked));

        // The flag commands ignore the marks and take the cursor row.
        ed.windows.get_mut(w).unwrap().cursor = (1, 0);
        ed.listing_clear_modified(w);
        assert!(ed.buffers.get(main).unwrap().modified);
        assert!(!ed.buffers.get(notes).unwrap().modified);
        // The rebuild dropped the marks.
        assert!(ed.listings[&display].entries.iter().all(|e| !e.marked));

        ed.windows.get_mut(w).unwrap().cursor = (0, 0);
        ed.listing_toggle_read_only(w);
        assert!(ed.buffers.get(main).unwrap().read_only);
        assert!(!ed.buffers.get(notes).unwrap().read_only);

        // The kill is the one command the marked set drives.
        ed.listing_toggle_mark(w);
        ed.listing_toggle_mark(w);
        let mut confirm = Counting::yes();
        ed.listing_kill(w, &mut confirm);
        assert!(!ed.buffers.contains(main));
        assert!(!ed.buffers.contains(notes));
    }

    #[test]
    fn flag_toggle_past_the_end_changes_nothing() {
        let (mut ed, main, notes) = scenario_editor();
        let (w, ..) = open(&mut ed);

        ed.windows.get_mut(w).unwrap().cursor = (9, 0);
        ed.listing_toggle_read_only(w);
        ed.listing_clear_modified(w);
        assert!(!ed.buffers.get(main).unwrap().read_only);
        assert!(ed.buffers.get(notes).unwrap().modified);
        // No rebuild ran: the out-of-range cursor row is untouched.
        assert_eq!(ed.windows.get(w).unwrap().cursor_line(), 9);
    }

    // -- display hook ----------------------------------------------------

    #[test]
    fn display_hook_clamps_then_auto_previews() {
        let (mut ed, main, notes) = scenario_editor();
        let invoking = ed.active_window;
        let (w, _display) = open(&mut ed);

        ed.listing_display_hook();
        assert_eq!(ed.windows.get(invoking).unwrap().buffer, main);

        ed.windows.get_mut(w).unwrap().cursor = (5, 0);
        ed.listing_display_hook();
        assert_eq!(ed.windows.get(w).unwrap().cursor_line(), 1);
        assert_eq!(ed.windows.get(invoking).unwrap().buffer, notes);
    }

    // -- row rendering ---------------------------------------------------

    #[test]
    fn rows_use_the_fixed_column_layout() {
        let mut ed = Editor::new();
        let mut b = file_buffer("main.txt", "/tmp/main.txt", 500, false);
        b.syntax_mode = Some("text".into());
        let id = ed.buffers.create(b);
        let entry = ListEntry {
            buffer: id,
            name: "main.txt".into(),
            marked: false,
        };

        let row = format_row(&entry, ed.buffers.get(id));
        assert_eq!(&row[..3], "   ");
        assert_eq!(&row[3..23], "main.txt            ");
        assert_eq!(&row[23..34], "        500");
        assert_eq!(&row[34..37], "   ");
        assert_eq!(&row[37..45], "utf-8   ");
        assert_eq!(&row[45..58], " text        ");
        assert!(row.ends_with("/tmp/main.txt"));
    }

    #[test]
    fn flag_gutter_prefers_system_then_modified_then_read_only() {
        let mut ed = Editor::new();

        let mut b = Buffer::new("x");
        b.system = true;
        b.modified = true;
        b.read_only = true;
        let id = ed.buffers.create(b);
        let e = ListEntry {
            buffer: id,
            name: "x".into(),
            marked: false,
        };
        assert!(format_row(&e, ed.buffers.get(id)).starts_with(" S x"));

        let mut b = Buffer::new("y");
        b.modified = true;
        b.read_only = true;
        let id = ed.buffers.create(b);
        let e = ListEntry {
            buffer: id,
            name: "y".into(),
            marked: false,
        };
        assert!(format_row(&e, ed.buffers.get(id)).starts_with(" * y"));

        let mut b = Buffer::new("z");
        b.read_only = true;
        let id = ed.buffers.create(b);
        let e = ListEntry {
            buffer: id,
            name: "z".into(),
            marked: false,
        };
        assert!(format_row(&e, ed.buffers.get(id)).starts_with(" % z"));
    }

    #[test]
    fn dead_rows_render_sparse() {
        let mut ed = Editor::new();
        let id = ed.buffers.create(Buffer::new("ghost"));
        let entry = ListEntry {
            buffer: id,
            name: "ghost".into(),
            marked: false,
        };
        ed.buffers.remove(id);

        let row = format_row(&entry, ed.buffers.get(id));
        assert_eq!(row, format!(" {:<2}{:<20}", "", "ghost"));
    }

    #[test]
    fn long_names_keep_head_and_tail_around_an_ellipsis() {
        let name = "a-very-long-buffer-name.rs";
        let short = shorten_name(name);
        assert_eq!(short.chars().count(), NAME_COLUMN);
        assert_eq!(short, "a-very-long-...me.rs");

        let exact = "exactly-twenty-chars";
        assert_eq!(shorten_name(exact), exact);
    }

    #[test]
    fn scratch_survives_as_the_final_fallback() {
        let (mut ed, main, notes) = scenario_editor();
        let (w, display) = open(&mut ed);

        let mut confirm = Counting::yes();
        ed.windows.get_mut(w).unwrap().cursor = (0, 0);
        ed.listing_toggle_mark(w);
        ed.listing_toggle_mark(w);
        ed.listing_kill(w, &mut confirm);

        assert!(!ed.buffers.contains(main));
        assert!(!ed.buffers.contains(notes));
        assert!(names(&ed, display).is_empty());
        // The invoking window landed on a system buffer.
        let invoking = ed.listings[&display].invoking_window;
        let shown = ed.windows.get(invoking).unwrap().buffer;
        assert!(ed.buffers.get(shown).unwrap().name.starts_with('*'));
    }
}
