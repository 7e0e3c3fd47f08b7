//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] and provides a
//! DAS/ARR input handler that also works in terminals without key-release
//! events.

pub mod handler;
pub mod map;

pub use blockfall_types as types;

pub use handler::{ActionBatch, InputHandler};
pub use map::{handle_key_event, should_quit};
