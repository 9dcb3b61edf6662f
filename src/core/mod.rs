//! Core editor model – buffers, windows, and the buffer-menu listing.
//!
//! Nothing in this module depends on any TUI or rendering crate.
//! Every type is plain owned data so the whole model can be driven
//! from tests without a terminal.

pub mod buffer;
pub mod editor;
pub mod list;
pub mod listing;
pub mod mode;
pub mod registry;
pub mod sort;
pub mod window;
