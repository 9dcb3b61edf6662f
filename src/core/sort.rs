//! Entry ordering for the buffer menu.
//!
//! The configuration is an explicit field/direction pair. Two rules sit
//! outside the direction: system buffers always sort after ordinary
//! ones, and the modified-first partition always keeps modified buffers
//! on top. Only the keyed comparison and its name fallback flip when
//! the direction is descending.

use std::cmp::Ordering;

use super::buffer::Buffer;

// ───────────────────────────────────────── configuration ─────

/// Key a listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// No sorting, creation order.
    #[default]
    Creation,
    /// Modified buffers first.
    ModifiedFirst,
    Time,
    Name,
    Filename,
    Size,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Creation,
        SortField::ModifiedFirst,
        SortField::Time,
        SortField::Name,
        SortField::Filename,
        SortField::Size,
    ];

    /// Short label for status messages.
    pub fn label(self) -> &'static str {
        match self {
            SortField::Creation => "unsorted",
            SortField::ModifiedFirst => "modified-first",
            SortField::Time => "time",
            SortField::Name => "name",
            SortField::Filename => "filename",
            SortField::Size => "size",
        }
    }
}

/// Shared sort configuration. There is one per editor and every listing
/// rebuild snapshots it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortOrder {
    pub field: SortField,
    pub descending: bool,
}

impl SortOrder {
    /// Apply a sort command: repeating the current field flips the
    /// direction, a new field resets it to ascending. Creation order
    /// never carries a direction, so re-selecting it stays ascending.
    pub fn set_field(&mut self, field: SortField) {
        if self.field == field && field != SortField::Creation {
            self.descending = !self.descending;
        } else {
            self.field = field;
            self.descending = false;
        }
    }

    /// True when entries stay in creation order.
    pub fn is_unsorted(self) -> bool {
        self.field == SortField::Creation
    }
}

// ───────────────────────────────────────── comparator ────────

/// Total order over buffers under `order`.
///
/// Ties compare equal, so a stable sort keeps them in creation order.
pub fn compare(order: SortOrder, a: &Buffer, b: &Buffer) -> Ordering {
    // System buffers sink below ordinary ones whatever the direction.
    let system = a.system.cmp(&b.system);
    if system != Ordering::Equal {
        return system;
    }

    if order.field == SortField::ModifiedFirst {
        // The modified partition is direction-immune as well.
        let modified = b.modified.cmp(&a.modified);
        if modified != Ordering::Equal {
            return modified;
        }
    }

    let keyed = match order.field {
        SortField::Time => a.mtime.cmp(&b.mtime),
        SortField::Size => a.size().cmp(&b.size()),
        SortField::Filename => by_filename(a, b),
        _ => Ordering::Equal,
    };
    let ordering = keyed.then_with(|| by_name(a, b));
    if order.descending {
        ordering.reverse()
    } else {
        ordering
    }
}

/// Name fallback: `*`-prefixed names sort after ordinary ones, then
/// collation.
fn by_name(a: &Buffer, b: &Buffer) -> Ordering {
    let a_star = a.name.starts_with('*');
    let b_star = b.name.starts_with('*');
    a_star
        .cmp(&b_star)
        .then_with(|| collate(&a.name, &b.name))
}

/// Buffers without a backing file sort last; the rest compare by path.
fn by_filename(a: &Buffer, b: &Buffer) -> Ordering {
    match (&a.filename, &b.filename) {
        (Some(pa), Some(pb)) => collate(&pa.to_string_lossy(), &pb.to_string_lossy()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Case-folded comparison with a raw tiebreak. Approximates locale
/// collation while staying total.
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// ───────────────────────────────────────── tests ─────────────
