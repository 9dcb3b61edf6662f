//! Authoritative buffer table.
//!
//! Buffers live in a slot arena and are addressed by [`BufferId`]
//! handles that carry a generation counter. Every access re-validates
//! the generation, so a handle taken before a kill can never resolve to
//! a later occupant of the same slot. Iteration follows a separate
//! creation-order list, which keeps "unsorted" listings stable even
//! when slots get reused.

use tracing::debug;

use super::buffer::Buffer;

// ───────────────────────────────────────── handle ────────────

/// Generation-checked handle to a buffer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId {
    index: u32,
    generation: u32,
}

// ───────────────────────────────────────── confirmation ──────

/// Delegate consulted before a modified buffer is killed.
///
/// The answer is synchronous from the caller's point of view; how it is
/// obtained (modal prompt, scripted test answers) is up to the
/// implementor.
pub trait KillConfirm {
    /// Return `true` to proceed with the kill of buffer `name`.
    fn confirm_kill(&mut self, name: &str) -> bool;
}

// ───────────────────────────────────────── registry ──────────

#[derive(Debug)]
struct Slot {
    generation: u32,
    buffer: Option<Buffer>,
}

/// Arena of buffers with stable creation order.
#[derive(Debug, Default)]
pub struct BufferRegistry {
    slots: Vec<Slot>,
    /// Live ids, oldest first.
    order: Vec<BufferId>,
}

impl BufferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a buffer and return its handle.
    pub fn create(&mut self, buffer: Buffer) -> BufferId {
        debug!(name = %buffer.name, "create buffer");
        let free = self.slots.iter().position(|s| s.buffer.is_none());
        let id = match free {
            Some(i) => {
                self.slots[i].buffer = Some(buffer);
                BufferId {
                    index: i as u32,
                    generation: self.slots[i].generation,
                }
            }
            None => {
                let i = self.slots.len();
                self.slots.push(Slot {
                    generation: 0,
                    buffer: Some(buffer),
                });
                BufferId {
                    index: i as u32,
                    generation: 0,
                }
            }
        };
        self.order.push(id);
        id
    }

    /// Resolve a handle. Stale generations resolve to `None`.
    pub fn get(&self, id: BufferId) -> Option<&Buffer> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.buffer.as_ref()
    }

    pub fn get_mut(&mut self, id: BufferId) -> Option<&mut Buffer> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.buffer.as_mut()
    }

    /// True if the handle still points at a live buffer.
    pub fn contains(&self, id: BufferId) -> bool {
        self.get(id).is_some()
    }

    /// Remove a buffer. The slot's generation is bumped so existing
    /// handles go stale.
    pub fn remove(&mut self, id: BufferId) -> Option<Buffer> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let buffer = slot.buffer.take()?;
        slot.generation += 1;
        self.order.retain(|&live| live != id);
        debug!(name = %buffer.name, "removed buffer");
        Some(buffer)
    }

    /// Live buffer ids, oldest first.
    pub fn ids(&self) -> impl Iterator<Item = BufferId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Find a live buffer by name.
    pub fn find(&self, name: &str) -> Option<BufferId> {
        self.ids()
            .find(|&id| self.get(id).is_some_and(|b| b.name == name))
    }

    /// Reuse the live buffer called `name`, clearing its content, or
    /// create a fresh one from `init`.
    pub fn find_or_create(&mut self, name: &str, init: impl FnOnce() -> Buffer) -> BufferId {
        if let Some(id) = self.find(name) {
            if let Some(buf) = self.get_mut(id) {
                buf.clear();
            }
            return id;
        }
        self.create(init())
    }
}

// ───────────────────────────────────────── tests ─────────────
