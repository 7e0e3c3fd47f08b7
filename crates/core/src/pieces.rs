//! Pieces module - shape templates, matrix rotation and the kick probe
//!
//! Shapes are small row-major matrices of cells. Rotation is the plain
//! transpose-and-reverse matrix rotation, returned as a new shape so a failed
//! rotation only has to drop the candidate. When a rotated shape collides, the
//! piece is nudged sideways by an alternating, growing probe (+1, -2, +3, ...)
//! instead of a per-kind kick table.

use crate::config::ConfigError;
use crate::types::{Cell, PieceKind, RotateDirection};

/// One rotation state of a piece: a `width × height` matrix of cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u16,
    height: u16,
    /// Row-major (y * width + x)
    cells: Vec<Cell>,
}

impl Shape {
    /// Build a shape from rows of cell ids, where every non-zero id becomes `kind`.
    ///
    /// Rows shorter than the first one are padded with empty cells.
    pub fn from_rows(kind: PieceKind, rows: &[&[u8]]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut cells = vec![None; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().take(width).enumerate() {
                if v != 0 {
                    cells[y * width + x] = Some(kind);
                }
            }
        }
        Self {
            width: width as u16,
            height: height as u16,
            cells,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Cell at `(x, y)` inside the shape's bounding box.
    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width as usize + x as usize])
    }

    /// Offsets and kinds of every filled cell, row by row.
    pub fn filled(&self) -> impl Iterator<Item = (i32, i32, PieceKind)> + '_ {
        let w = self.width as usize;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|kind| ((i % w) as i32, (i / w) as i32, kind))
        })
    }

    /// Rotate by 90°: transpose, then reverse each row (clockwise) or the row
    /// order (counter-clockwise).
    ///
    /// A `w × h` shape becomes `h × w`. `self` is left untouched.
    pub fn rotated(&self, direction: RotateDirection) -> Self {
        let (w, h) = (self.width as usize, self.height as usize);
        // Transposed matrix has `h` columns and `w` rows.
        let mut cells = vec![None; w * h];
        for y in 0..w {
            for x in 0..h {
                cells[y * h + x] = self.cells[x * w + y];
            }
        }
        match direction {
            RotateDirection::Clockwise => {
                if h > 0 {
                    for row in cells.chunks_mut(h) {
                        row.reverse();
                    }
                }
            }
            RotateDirection::CounterClockwise => {
                let mut reordered = Vec::with_capacity(cells.len());
                if h > 0 {
                    for row in cells.chunks(h).rev() {
                        reordered.extend_from_slice(row);
                    }
                }
                cells = reordered;
            }
        }
        Self {
            width: h as u16,
            height: w as u16,
            cells,
        }
    }
}

/// Template rows for a piece kind, using the kind's cell id.
fn template_rows(kind: PieceKind) -> &'static [&'static [u8]] {
    match kind {
        PieceKind::T => &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
        PieceKind::O => &[&[2, 2], &[2, 2]],
        PieceKind::L => &[&[0, 3, 0], &[0, 3, 0], &[0, 3, 3]],
        PieceKind::J => &[&[0, 4, 0], &[0, 4, 0], &[4, 4, 0]],
        PieceKind::I => &[&[0, 5, 0, 0], &[0, 5, 0, 0], &[0, 5, 0, 0], &[0, 5, 0, 0]],
        PieceKind::S => &[&[0, 6, 6], &[6, 6, 0], &[0, 0, 0]],
        PieceKind::Z => &[&[7, 7, 0], &[0, 7, 7], &[0, 0, 0]],
    }
}

/// Fresh copy of the spawn orientation for `kind`.
///
/// Every call builds a new shape, so rotating one piece never affects another.
pub fn get_shape(kind: PieceKind) -> Shape {
    Shape::from_rows(kind, template_rows(kind))
}

/// The set of piece kinds a session draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceCatalog {
    kinds: Vec<PieceKind>,
}

impl PieceCatalog {
    /// The classic seven-piece set.
    pub fn classic() -> Self {
        Self {
            kinds: PieceKind::ALL.to_vec(),
        }
    }

    /// A catalog of the given kinds. Empty or repeated entries are rejected.
    pub fn new(kinds: Vec<PieceKind>) -> Result<Self, ConfigError> {
        if kinds.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        for (i, kind) in kinds.iter().enumerate() {
            if kinds[..i].contains(kind) {
                return Err(ConfigError::DuplicatePiece(*kind));
            }
        }
        Ok(Self { kinds })
    }

    pub fn kinds(&self) -> &[PieceKind] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Independent copy of the template for `kind`.
    pub fn shape(&self, kind: PieceKind) -> Shape {
        get_shape(kind)
    }

    /// Largest bounding-box side over every kind in the catalog, in any rotation.
    pub fn max_extent(&self) -> u16 {
        self.kinds
            .iter()
            .map(|&k| {
                let s = get_shape(k);
                s.width().max(s.height())
            })
            .max()
            .unwrap_or(0)
    }
}

impl Default for PieceCatalog {
    fn default() -> Self {
        Self::classic()
    }
}

/// Net horizontal displacements tried after a colliding rotation.
///
/// Offsets `+1, -2, +3, -4, ...` are applied one after another to the piece
/// origin, so the positions probed are `+1, -1, +2, -2, ...` relative to the
/// start. Probing stops as soon as the next offset would exceed `width`.
///
/// ```
/// use blockfall_core::pieces::KickProbe;
///
/// assert_eq!(KickProbe::new(3).collect::<Vec<_>>(), vec![1, -1, 2]);
/// assert_eq!(KickProbe::new(2).collect::<Vec<_>>(), vec![1]);
/// ```
#[derive(Debug, Clone)]
pub struct KickProbe {
    width: i32,
    offset: i32,
    net: i32,
    done: bool,
}

impl KickProbe {
    pub fn new(width: u16) -> Self {
        Self {
            width: width as i32,
            offset: 1,
            net: 0,
            done: false,
        }
    }
}

impl Iterator for KickProbe {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.done {
            return None;
        }
        self.net += self.offset;
        let next = -(self.offset + self.offset.signum());
        if next > self.width {
            self.done = true;
            return None;
        }
        self.offset = next;
        Some(self.net)
    }
}

/// Rotate `shape` and find a legal horizontal position for it.
///
/// `collides(shape, x)` tests a candidate at column `x` (row fixed by the
/// caller). Returns the rotated shape and the net kick applied to `x`, or
/// `None` when neither the unkicked position nor any probe fits.
pub fn try_rotate(
    shape: &Shape,
    x: i32,
    direction: RotateDirection,
    collides: impl Fn(&Shape, i32) -> bool,
) -> Option<(Shape, i32)> {
    let rotated = shape.rotated(direction);
    if !collides(&rotated, x) {
        return Some((rotated, 0));
    }

    let kick = KickProbe::new(rotated.width()).find(|&kick| !collides(&rotated, x + kick))?;
    Some((rotated, kick))
}
