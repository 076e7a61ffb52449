//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! events into [`crate::types::BoardAction`] and tracks the board cursor and
//! tile selection that turn two selections into a swap request.

pub mod cursor;
pub mod map;

pub use tui_match3_types as types;

pub use cursor::{Cursor, CursorEvent};
pub use map::{handle_key_event, should_quit};
