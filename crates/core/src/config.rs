//! Engine configuration and its validation errors.

use thiserror::Error;

use crate::pieces::PieceCatalog;
use crate::types::{
    PieceKind, BASE_DROP_MS, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DROP_FLOOR_MS,
    DROP_STEP_MS, PREVIEW_LEN,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board width must be positive")]
    ZeroWidth,
    #[error("board height must be positive")]
    ZeroHeight,
    #[error("piece catalog is empty")]
    EmptyCatalog,
    #[error("piece {0:?} listed more than once")]
    DuplicatePiece(PieceKind),
    #[error("unknown piece letter {0:?}")]
    UnknownPiece(char),
    #[error("board width {width} cannot hold a piece {needed} cells wide")]
    BoardTooNarrow { width: u16, needed: u16 },
    #[error("board height {height} cannot hold a piece {needed} cells tall")]
    BoardTooShort { height: u16, needed: u16 },
    #[error("drop interval must be positive")]
    ZeroDropInterval,
    #[error("drop floor {floor}ms is above the initial interval {initial}ms")]
    FloorAboveInitial { floor: u32, initial: u32 },
}

/// Everything a session needs to start.
///
/// `Default` is the classic game: 10×20 board, all seven pieces, gravity from
/// 1000ms down to 200ms in 50ms steps, three-piece preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: u16,
    pub height: u16,
    pub initial_drop_ms: u32,
    pub drop_step_ms: u32,
    pub min_drop_ms: u32,
    pub preview_len: usize,
    pub seed: u32,
    pub pieces: Vec<PieceKind>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            initial_drop_ms: BASE_DROP_MS,
            drop_step_ms: DROP_STEP_MS,
            min_drop_ms: DROP_FLOOR_MS,
            preview_len: PREVIEW_LEN,
            seed: 1,
            pieces: PieceKind::ALL.to_vec(),
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_pieces(mut self, pieces: Vec<PieceKind>) -> Self {
        self.pieces = pieces;
        self
    }

    /// Check every invariant the engine relies on and build the catalog.
    pub fn validate(&self) -> Result<PieceCatalog, ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        let catalog = PieceCatalog::new(self.pieces.clone())?;

        let needed = catalog.max_extent();
        if self.width < needed {
            return Err(ConfigError::BoardTooNarrow {
                width: self.width,
                needed,
            });
        }
        if self.height < needed {
            return Err(ConfigError::BoardTooShort {
                height: self.height,
                needed,
            });
        }

        if self.initial_drop_ms == 0 || self.min_drop_ms == 0 {
            return Err(ConfigError::ZeroDropInterval);
        }
        if self.min_drop_ms > self.initial_drop_ms {
            return Err(ConfigError::FloorAboveInitial {
                floor: self.min_drop_ms,
                initial: self.initial_drop_ms,
            });
        }

        Ok(catalog)
    }
}

/// Parse a piece list such as `"IOT"` or `"i,o,t"`.
///
/// Commas and whitespace are ignored; duplicates are left for
/// [`EngineConfig::validate`] to report.
pub fn parse_pieces(s: &str) -> Result<Vec<PieceKind>, ConfigError> {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| PieceKind::from_char(c).ok_or(ConfigError::UnknownPiece(c)))
        .collect()
}
