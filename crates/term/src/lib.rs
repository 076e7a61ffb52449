//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget
//! toolkits and instead renders into a plain framebuffer that is flushed to a
//! crossterm backend.
//!
//! - `game_view` is pure: snapshot in, framebuffer out
//! - `renderer` owns the terminal and emits only changed cell runs
//! - cells are 2 columns wide by default to keep tiles roughly square

pub mod fb;
pub mod game_view;
pub mod render_throttle;
pub mod renderer;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{BoardOverlay, GameView, Viewport};
pub use render_throttle::RenderThrottle;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
