//! Buffer data model - the editor's unit of text plus the metadata the
//! buffer menu renders: flags, size, timestamp, charset and mode names.
//!
//! Content is line-based and deliberately minimal; this program manages
//! buffers rather than edits them.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

// ───────────────────────────────────────── open error ────────

/// Failure to load a buffer from disk.
#[derive(Debug, Error)]
#[error("failed to read {}: {source}", path.display())]
pub struct OpenError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl OpenError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ───────────────────────────────────────── charset ───────────

/// Character encoding of a buffer's content, shown in the listing's
/// charset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    Latin1,
}

impl Charset {
    /// Canonical name, at most 8 columns wide.
    pub fn name(self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Latin1 => "8859-1",
        }
    }
}

// ───────────────────────────────────────── buffer ────────────

/// A single editor buffer.
#[derive(Debug, Clone)]
pub struct Buffer {
    pub name: String,
    /// Backing file, if the buffer was loaded from disk.
    pub filename: Option<PathBuf>,
    /// Internal buffer (listing, log, scratch). Hidden from the menu
    /// unless "all visible" is on.
    pub system: bool,
    pub modified: bool,
    pub read_only: bool,
    /// Flat directory listing loaded from a directory path.
    pub dired: bool,
    /// Receives appended log messages.
    pub log: bool,
    /// Holds per-character style data for another buffer.
    pub style_data: bool,
    pub charset: Charset,
    /// Width in bytes of the per-character style attribute, 0 for none.
    pub style_bytes: u8,
    /// Data-type prefix for the mode column (`None` means plain text).
    pub data_type: Option<String>,
    pub saved_mode: Option<String>,
    pub default_mode: Option<String>,
    pub syntax_mode: Option<String>,
    /// Modes attached on top of the saved mode.
    pub attached_modes: Vec<String>,
    /// Last modification time of the backing file.
    pub mtime: Option<SystemTime>,
    lines: Vec<String>,
    total_size: u64,
}

impl Buffer {
    /// Empty buffer with all flags clear.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            system: false,
            modified: false,
            read_only: false,
            dired: false,
            log: false,
            style_data: false,
            charset: Charset::Utf8,
            style_bytes: 0,
            data_type: None,
            saved_mode: None,
            default_mode: None,
            syntax_mode: None,
            attached_modes: Vec::new(),
            mtime: None,
            lines: Vec::new(),
            total_size: 0,
        }
    }

    /// Load a buffer from `path`.
    ///
    /// Regular files become text buffers (with a Latin-1 fallback for
    /// non-UTF-8 bytes); a directory becomes a flat, read-only listing
    /// of its entry names.
    pub fn from_path(path: &Path) -> Result<Self, OpenError> {
        let meta = std::fs::metadata(path).map_err(|e| OpenError::new(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut buf = Buffer::new(name);
        buf.filename = Some(path.to_path_buf());
        buf.mtime = meta.modified().ok();

        if meta.is_dir() {
            buf.dired = true;
            buf.read_only = true;
            buf.saved_mode = Some("dired".into());
            let mut names: Vec<String> = std::fs::read_dir(path)
                .map_err(|e| OpenError::new(path, e))?
                .flatten()
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
            buf.set_lines(names);
        } else {
            let bytes = std::fs::read(path).map_err(|e| OpenError::new(path, e))?;
            match String::from_utf8(bytes) {
                Ok(text) => buf.set_lines(split_lines(&text)),
                Err(err) => {
                    buf.charset = Charset::Latin1;
                    let text: String = err.into_bytes().iter().map(|&b| b as char).collect();
                    buf.set_lines(split_lines(&text));
                }
            }
            buf.syntax_mode = syntax_for(path);
        }
        Ok(buf)
    }

    // ── content ──

    /// Replace the whole content.
    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.total_size = lines.iter().map(|l| l.len() as u64 + 1).sum();
        self.lines = lines;
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.total_size = 0;
    }

    /// Append one line at the end.
    pub fn append_line(&mut self, line: String) {
        self.total_size += line.len() as u64 + 1;
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Content size in bytes, newlines included.
    pub fn size(&self) -> u64 {
        self.total_size
    }

    // ── presentation ──

    /// Mode column text: `datatype+name`, then `,extra` for every
    /// attached mode that is not the saved mode.
    ///
    /// The effective name is picked by priority: log and style-data
    /// buffers get fixed names, then saved mode, default mode, syntax
    /// mode, and `"none"` as the last resort.
    pub fn mode_label(&self) -> String {
        let name = if self.log {
            "log"
        } else if self.style_data {
            "style"
        } else {
            self.saved_mode
                .as_deref()
                .or(self.default_mode.as_deref())
                .or(self.syntax_mode.as_deref())
                .unwrap_or("none")
        };

        let mut label = String::new();
        if let Some(dt) = &self.data_type {
            label.push_str(dt);
            label.push('+');
        }
        label.push_str(name);
        for extra in &self.attached_modes {
            if self.saved_mode.as_deref() != Some(extra.as_str()) {
                label.push(',');
                label.push_str(extra);
            }
        }
        label
    }

    /// Path shown in the listing's last column, `~`-abbreviated.
    pub fn display_path(&self) -> String {
        match &self.filename {
            Some(path) => abbreviate_home(path),
            None => String::new(),
        }
    }
}

/// Replace a leading `$HOME` with `~`.
fn abbreviate_home(path: &Path) -> String {
    let shown = path.display().to_string();
    if let Ok(home) = env::var("HOME") {
        if !home.is_empty() {
            if shown == home {
                return "~".into();
            }
            if let Some(rest) = shown.strip_prefix(&home) {
                if rest.starts_with('/') {
                    return format!("~{rest}");
                }
            }
        }
    }
    shown
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_owned).collect()
}

/// Syntax mode inferred from the file extension.
fn syntax_for(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    let mode = match ext.as_str() {
        "rs" => "rust",
        "c" | "h" => "c",
        "md" => "markdown",
        "toml" => "toml",
        "py" => "python",
        "sh" => "shell",
        "txt" => "text",
        _ => return None,
    };
    Some(mode.to_string())
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;

    // -- mode label ------------------------------------------------------

    #[test]
    fn mode_label_priority_chain() {
        let mut b = Buffer::new("a");
        assert_eq!(b.mode_label(), "none");

        b.syntax_mode = Some("rust".into());
        assert_eq!(b.mode_label(), "rust");

        b.default_mode = Some("text".into());
        assert_eq!(b.mode_label(), "text");

        b.saved_mode = Some("c".into());
        assert_eq!(b.mode_label(), "c");

        b.style_data = true;
        assert_eq!(b.mode_label(), "style");

        b.log = true;
        assert_eq!(b.mode_label(), "log");
    }

    #[test]
    fn mode_label_data_type_prefix_and_extras() {
        let mut b = Buffer::new("a");
        b.saved_mode = Some("c".into());
        b.data_type = Some("image".into());
        b.attached_modes = vec!["c".into(), "hex".into()];
        // The attached copy of the saved mode is not repeated.
        assert_eq!(b.mode_label(), "image+c,hex");
    }

    // -- content bookkeeping ---------------------------------------------

    #[test]
    fn size_tracks_content() {
        let mut b = Buffer::new("a");
        assert_eq!(b.size(), 0);
        b.set_lines(vec!["ab".into(), "c".into()]);
        assert_eq!(b.size(), 5);
        b.append_line("de".into());
        assert_eq!(b.size(), 8);
        b.clear();
        assert_eq!(b.size(), 0);
        assert_eq!(b.line_count(), 0);
    }

    // -- paths -----------------------------------------------------------

    #[test]
    fn display_path_abbreviates_home() {
        env::set_var("HOME", "/home/alice");
        let mut b = Buffer::new("notes");
        b.filename = Some(PathBuf::from("/home/alice/notes.txt"));
        assert_eq!(b.display_path(), "~/notes.txt");

        b.filename = Some(PathBuf::from("/home/alicextra/notes.txt"));
        assert_eq!(b.display_path(), "/home/alicextra/notes.txt");

        b.filename = None;
        assert_eq!(b.display_path(), "");
    }

    #[test]
    fn charset_names_fit_the_column() {
        assert!(Charset::Utf8.name().len() <= 8);
        assert!(Charset::Latin1.name().len() <= 8);
    }
}
