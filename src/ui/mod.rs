//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into pixels on
//! the terminal.  No buffer mutation happens here.

pub mod layout;
pub mod menu;
pub mod prompt;
pub mod text_view;
pub mod theme;
