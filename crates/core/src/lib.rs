//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the rules of the falling-block game: the board, the
//! piece catalog, the bag randomizer, line clearing with scoring, and the
//! session state machine that ties them together. It has no UI or I/O, so the
//! same session runs in a terminal, a test or a benchmark.
//!
//! # Module Structure
//!
//! - [`board`]: fixed-size grid with the collision predicate and row sweep
//! - [`config`]: engine configuration and its validation errors
//! - [`game_state`]: session state, active piece lifecycle and gravity
//! - [`pieces`]: shape templates, matrix rotation and the kick probe
//! - [`rng`]: bag randomizer and lookahead queue
//! - [`scoring`]: per-sweep doubling reward and gravity speed-up
//! - [`snapshot`]: owned read-only copy for renderers
//!
//! # Game Rules
//!
//! - **Bag randomizer**: every catalog kind appears once per shuffled bag
//! - **Rotation**: plain 90° matrix rotation; on collision the piece is nudged
//!   sideways by +1, -1, +2, ... until it fits or the probe runs out
//! - **Lock**: a piece that cannot fall when gravity or soft drop moves it is
//!   merged immediately
//! - **Scoring**: 10 points for the first row of a sweep, doubling for each
//!   further row in the same sweep
//! - **Speed**: each cleared row takes 50ms off the gravity interval, down to 200ms
//! - **Game over**: a newly spawned piece overlaps the stack
//!
//! # Example
//!
//! ```
//! use blockfall_core::{EngineConfig, GameState};
//! use blockfall_types::{GameAction, SessionState};
//!
//! let mut game = GameState::new(EngineConfig::default().with_seed(12345)).unwrap();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.session(), SessionState::Running);
//! assert_eq!(game.piece_id(), 2);
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with the
//! elapsed milliseconds. Gravity runs once the accumulated time exceeds the
//! current drop interval.

pub mod board;
pub mod config;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{parse_pieces, ConfigError, EngineConfig};
pub use game_state::{ActivePiece, GameState};
pub use pieces::{get_shape, try_rotate, KickProbe, PieceCatalog, Shape};
pub use rng::{BagRandomizer, PieceQueue};
pub use scoring::{drop_interval_after, sweep_reward};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
