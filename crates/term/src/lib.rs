//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: views draw snapshots into a plain
//! framebuffer, and the renderer flushes framebuffers to the terminal with
//! crossterm. No widget toolkit is involved, which keeps precise control over
//! the aspect ratio (2 columns per board cell by default).

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{piece_color, AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
