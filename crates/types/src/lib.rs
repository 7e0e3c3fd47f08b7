//! Core types module - shared data structures and constants
//!
//! This crate defines the vocabulary shared by the engine, the input layer and
//! the terminal view. Everything here is plain data with no behaviour beyond
//! small conversions, so it can be used from any front-end.
//!
//! # Board Dimensions
//!
//! The classic playfield is 10 columns by 20 rows. Row 0 is the top row.
//! Other sizes are allowed through the engine configuration.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame interval of the terminal runner (~60 FPS) |
//! | `BASE_DROP_MS` | 1000 | Gravity interval at session start |
//! | `DROP_STEP_MS` | 50 | Interval reduction per cleared row |
//! | `DROP_FLOOR_MS` | 200 | Fastest gravity interval |
//!
//! # DAS/ARR Timing
//!
//! - `DEFAULT_DAS_MS`: 150ms - time before a held key starts repeating
//! - `DEFAULT_ARR_MS`: 50ms - interval between repeats
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{PieceKind, DEFAULT_BOARD_WIDTH, DEFAULT_BOARD_HEIGHT};
//!
//! let piece = PieceKind::T;
//! assert_eq!(piece.cell_value(), 1);
//! assert_eq!(PieceKind::from_char('t'), Some(PieceKind::T));
//!
//! assert_eq!(DEFAULT_BOARD_WIDTH, 10);
//! assert_eq!(DEFAULT_BOARD_HEIGHT, 20);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const DEFAULT_BOARD_WIDTH: u16 = 10;

/// Board height in cells (20 rows)
pub const DEFAULT_BOARD_HEIGHT: u16 = 20;

/// Frame interval of the terminal runner in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval when a session starts
pub const BASE_DROP_MS: u32 = 1000;

/// How much the gravity interval shrinks for every cleared row
pub const DROP_STEP_MS: u32 = 50;

/// Gravity never gets faster than this
pub const DROP_FLOOR_MS: u32 = 200;

/// Points for the first row of a sweep; each further row in the same sweep doubles
pub const LINE_SCORE_BASE: u64 = 10;

/// Number of upcoming pieces kept visible in the preview
pub const PREVIEW_LEN: usize = 3;

/// DAS (Delayed Auto Shift) delay in milliseconds.
pub const DEFAULT_DAS_MS: u32 = 150;

/// ARR (Auto Repeat Rate) in milliseconds.
pub const DEFAULT_ARR_MS: u32 = 50;

/// DAS for a held soft drop; it repeats right away.
pub const SOFT_DROP_DAS_MS: u32 = 0;

/// ARR for a held soft drop.
pub const SOFT_DROP_ARR_MS: u32 = 50;

/// The seven tetromino piece kinds
///
/// The discriminant order matches the numeric cell id each kind leaves on the
/// board (`T` = 1 through `Z` = 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    T,
    O,
    L,
    J,
    I,
    S,
    Z,
}

impl PieceKind {
    /// Every kind, in cell-id order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::T,
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
        PieceKind::I,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Numeric id written into board cells (never 0).
    pub fn cell_value(&self) -> u8 {
        match self {
            PieceKind::T => 1,
            PieceKind::O => 2,
            PieceKind::L => 3,
            PieceKind::J => 4,
            PieceKind::I => 5,
            PieceKind::S => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::cell_value`]; 0 and unknown ids map to `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_cell_value(5), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_cell_value(0), None);
    /// ```
    pub fn from_cell_value(v: u8) -> Option<Self> {
        match v {
            1 => Some(PieceKind::T),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::J),
            5 => Some(PieceKind::I),
            6 => Some(PieceKind::S),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Parse a piece letter (case-insensitive)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'T' => Some(PieceKind::T),
            'O' => Some(PieceKind::O),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'I' => Some(PieceKind::I),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Upper-case letter for display.
    pub fn as_char(&self) -> char {
        match self {
            PieceKind::T => 'T',
            PieceKind::O => 'O',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::I => 'I',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }
}

/// Direction of a 90° rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

/// Discrete commands a front-end can send to the engine
///
/// The input layer maps raw key events to these; the engine applies each one
/// atomically between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down, locking it if it cannot fall
    SoftDrop,
    /// Drop piece to its resting row and lock it
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Toggle pause state
    Pause,
    /// Restart the session (works from any state, including game over)
    Restart,
}

impl GameAction {
    /// camelCase name, used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}

/// Whether gravity and commands are currently allowed to mutate the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SessionState {
    #[default]
    Running,
    Paused,
    /// Terminal until restart.
    GameOver,
}

impl SessionState {
    pub fn is_running(&self) -> bool {
        matches!(self, SessionState::Running)
    }
}

/// Observable outcome of a command or tick.
///
/// Presentation layers react to these (sounds, flashes, log lines); the engine
/// never depends on anyone consuming them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameEvent {
    /// The active piece moved one column.
    Moved { dx: i8 },
    /// A rotation committed; `kick` is the net horizontal displacement applied.
    Rotated { direction: RotateDirection, kick: i32 },
    /// A rotation found no legal position and was undone.
    RotationBlocked { direction: RotateDirection },
    /// The active piece was merged into the board.
    Locked { kind: PieceKind },
    /// One sweep removed `count` rows and awarded `reward` points.
    LinesCleared { count: u32, reward: u64 },
    /// A freshly spawned piece collided immediately.
    GameOver,
    Restarted,
    Paused,
    Resumed,
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked piece of that kind
pub type Cell = Option<PieceKind>;

/// Numeric form of a cell (0 = empty).
pub fn cell_value(cell: Cell) -> u8 {
    cell.map_or(0, |kind| kind.cell_value())
}
