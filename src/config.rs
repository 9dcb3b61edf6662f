//! Key bindings.
//!
//! Two in-memory tables: one active inside the buffer menu, one for the
//! rest of the application. The layout is part of the program; nothing
//! here touches the disk.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ───────────────────────────────────────── actions ───────────

/// All dispatchable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Buffer menu.
    SelectCommit,
    SelectAbort,
    ClearModified,
    ToggleReadOnly,
    ToggleAllVisible,
    Refresh,
    Kill,
    ToggleMark,
    SortUnsorted,
    SortName,
    SortFilename,
    SortSize,
    SortTime,
    SortModified,
    // Shared.
    MoveUp,
    MoveDown,
    // Global.
    OpenListing,
    Quit,
}

impl Action {
    /// Human-readable label for hints and messages.
    pub fn label(self) -> &'static str {
        match self {
            Action::SelectCommit => "Select",
            Action::SelectAbort => "Abort",
            Action::ClearModified => "Clear Modified",
            Action::ToggleReadOnly => "Toggle Read-Only",
            Action::ToggleAllVisible => "Toggle System Buffers",
            Action::Refresh => "Refresh",
            Action::Kill => "Kill",
            Action::ToggleMark => "Mark",
            Action::SortUnsorted => "Unsorted",
            Action::SortName => "Sort by Name",
            Action::SortFilename => "Sort by File",
            Action::SortSize => "Sort by Size",
            Action::SortTime => "Sort by Time",
            Action::SortModified => "Modified First",
            Action::MoveUp => "Move Up",
            Action::MoveDown => "Move Down",
            Action::OpenListing => "Buffer List",
            Action::Quit => "Quit",
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared (platform-specific modifiers like SUPER are ignored).
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"Ctrl+g"`, `"↑"`, `"q"`).
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Backspace => "Bksp".into(),
            KeyCode::Delete => "Del".into(),
            other => format!("{other:?}"),
        });
        s
    }
}

/// Shifted keys arrive either as the shifted character with `SHIFT` set
/// or as the bare character, depending on the terminal. Fold the
/// modifier away for anything that is not a lowercase letter so one
/// binding matches both shapes.
fn normalize(event: KeyEvent) -> KeyEvent {
    match event.code {
        KeyCode::Char(c) if !c.is_ascii_lowercase() => {
            KeyEvent::new(event.code, event.modifiers.difference(KeyModifiers::SHIFT))
        }
        _ => event,
    }
}

/// First key of the two-key command prefix (`Ctrl-X ...`).
pub fn is_command_prefix(event: KeyEvent) -> bool {
    event.code == KeyCode::Char('x') && event.modifiers.contains(KeyModifiers::CONTROL)
}

/// The argument prefix (`Ctrl-U`), arming the next command.
pub fn is_universal_argument(event: KeyEvent) -> bool {
    event.code == KeyCode::Char('u') && event.modifiers.contains(KeyModifiers::CONTROL)
}

/// Second key of a `Ctrl-X` sequence.
pub fn prefix_action(event: KeyEvent) -> Option<Action> {
    if !event.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match event.code {
        KeyCode::Char('b') => Some(Action::OpenListing),
        KeyCode::Char('g') => Some(Action::SelectAbort),
        _ => None,
    }
}

// ───────────────────────────────────────── keymap ────────────

/// The two binding tables.
pub struct Keymap {
    pub listing: HashMap<Action, Vec<KeyBind>>,
    pub global: HashMap<Action, Vec<KeyBind>>,
}

impl Keymap {
    pub fn new() -> Self {
        Self {
            listing: Self::default_listing_bindings(),
            global: Self::default_global_bindings(),
        }
    }

    /// Bindings active inside the buffer menu.
    pub fn default_listing_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        let mut m = HashMap::new();

        m.insert(
            SelectCommit,
            vec![
                KeyBind::new(Enter, n),
                KeyBind::new(Char(' '), n),
                KeyBind::new(Char('e'), n),
                KeyBind::new(Char('q'), n),
            ],
        );
        m.insert(
            SelectAbort,
            vec![KeyBind::new(Char('g'), ctrl), KeyBind::new(Esc, n)],
        );
        m.insert(ClearModified, vec![KeyBind::new(Char('~'), n)]);
        m.insert(ToggleReadOnly, vec![KeyBind::new(Char('%'), n)]);
        m.insert(
            ToggleAllVisible,
            vec![KeyBind::new(Char('a'), n), KeyBind::new(Char('.'), n)],
        );
        m.insert(
            Refresh,
            vec![KeyBind::new(Char('r'), n), KeyBind::new(Char('g'), n)],
        );
        m.insert(
            Kill,
            vec![
                KeyBind::new(Char('k'), n),
                KeyBind::new(Char('d'), n),
                KeyBind::new(Delete, n),
                KeyBind::new(Backspace, n),
            ],
        );
        m.insert(ToggleMark, vec![KeyBind::new(Char('s'), n)]);
        m.insert(SortUnsorted, vec![KeyBind::new(Char('u'), n)]);
        m.insert(
            SortName,
            vec![KeyBind::new(Char('b'), n), KeyBind::new(Char('B'), n)],
        );
        m.insert(
            SortFilename,
            vec![KeyBind::new(Char('f'), n), KeyBind::new(Char('F'), n)],
        );
        m.insert(
            SortSize,
            vec![KeyBind::new(Char('z'), n), KeyBind::new(Char('Z'), n)],
        );
        m.insert(
            SortTime,
            vec![KeyBind::new(Char('t'), n), KeyBind::new(Char('T'), n)],
        );
        m.insert(
            SortModified,
            vec![KeyBind::new(Char('m'), n), KeyBind::new(Char('M'), n)],
        );
        m.insert(
            MoveUp,
            vec![
                KeyBind::new(Up, n),
                KeyBind::new(Char('p'), n),
                KeyBind::new(Char('p'), ctrl),
            ],
        );
        m.insert(
            MoveDown,
            vec![
                KeyBind::new(Down, n),
                KeyBind::new(Char('n'), n),
                KeyBind::new(Char('n'), ctrl),
            ],
        );

        m
    }

    /// Bindings active in the plain text view.
    pub fn default_global_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);
        m.insert(MoveUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(
            MoveDown,
            vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)],
        );

        m
    }

    /// Match inside the buffer menu, falling back to the global table.
    pub fn match_listing(&self, event: KeyEvent) -> Option<Action> {
        let event = normalize(event);
        match_in(&self.listing, event).or_else(|| match_in(&self.global, event))
    }

    /// Match in the plain text view.
    pub fn match_global(&self, event: KeyEvent) -> Option<Action> {
        match_in(&self.global, normalize(event))
    }

    fn short_binding(table: &HashMap<Action, Vec<KeyBind>>, action: Action) -> String {
        table
            .get(&action)
            .and_then(|binds| binds.first())
            .map(|b| b.display())
            .unwrap_or_else(|| "?".into())
    }

    /// Status-bar hint inside the buffer menu.
    pub fn listing_hint(&self) -> String {
        format!(
            "{}: {} | {}: {} | {}: {} | b/f/z/t/m/u: sort | {}: {}",
            Self::short_binding(&self.listing, Action::SelectCommit),
            Action::SelectCommit.label(),
            Self::short_binding(&self.listing, Action::Kill),
            Action::Kill.label(),
            Self::short_binding(&self.listing, Action::ToggleMark),
            Action::ToggleMark.label(),
            Self::short_binding(&self.listing, Action::SelectAbort),
            Action::SelectAbort.label(),
        )
    }

    /// Status-bar hint in the plain text view.
    pub fn global_hint(&self) -> String {
        format!(
            "Ctrl+x Ctrl+b: {} | {}: {}",
            Action::OpenListing.label(),
            Self::short_binding(&self.global, Action::Quit),
            Action::Quit.label(),
        )
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the action matching a key event.  When multiple bindings match,
/// the one with the most modifiers wins.
fn match_in(bindings: &HashMap<Action, Vec<KeyBind>>, event: KeyEvent) -> Option<Action> {
    let mut best: Option<Action> = None;
    let mut best_mod_count = 0;

    for (&action, binds) in bindings {
        for bind in binds {
            if bind.matches(event) {
                let mc = bind.modifiers.bits().count_ones();
                if best.is_none() || mc > best_mod_count {
                    best = Some(action);
                    best_mod_count = mc;
                }
            }
        }
    }
    best
}

// ───────────────────────────────────────── tests ─────────────
