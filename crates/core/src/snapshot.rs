//! Read-only copy of a session for presentation layers.
//!
//! A snapshot owns plain data only (cell ids, coordinates, counters), so a
//! renderer never borrows the live [`GameState`](crate::GameState).
//! [`GameState::snapshot_into`](crate::GameState::snapshot_into) refills an
//! existing snapshot in place, reusing its buffers frame after frame.

use crate::game_state::ActivePiece;
use crate::types::{PieceKind, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub x: i32,
    pub y: i32,
    /// Board coordinates of the filled cells.
    pub cells: Vec<(i32, i32)>,
}

impl ActiveSnapshot {
    pub(crate) fn fill_from(&mut self, piece: &ActivePiece) {
        self.kind = piece.kind;
        self.x = piece.x;
        self.y = piece.y;
        self.cells.clear();
        self.cells.extend(piece.cells());
    }
}

impl From<&ActivePiece> for ActiveSnapshot {
    fn from(piece: &ActivePiece) -> Self {
        Self {
            kind: piece.kind,
            x: piece.x,
            y: piece.y,
            cells: piece.cells().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GameSnapshot {
    pub width: u16,
    pub height: u16,
    /// Row-major cell ids, 0 = empty.
    pub board: Vec<u8>,
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i32>,
    pub preview: Vec<PieceKind>,
    pub session: SessionState,
    pub episode_id: u32,
    pub piece_id: u32,
    pub seed: u32,
    pub score: u64,
    pub lines: u32,
    pub drop_interval_ms: u32,
}

impl GameSnapshot {
    /// Cell id at `(x, y)`, or `None` outside the board.
    pub fn cell(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        self.board
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Offset from the active piece down to its ghost row.
    pub fn ghost_offset(&self) -> Option<i32> {
        let active = self.active.as_ref()?;
        self.ghost_y.map(|g| g - active.y)
    }
}
