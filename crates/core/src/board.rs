//! Board module - manages the game grid
//!
//! The board is a `width × height` grid where each cell is empty or holds the
//! kind of piece that was locked there. Storage is a flat row-major vector
//! sized once at creation.
//! Coordinates: (x, y) with x growing to the right and y growing downwards;
//! row 0 is the top row.

use crate::pieces::Shape;
use crate::types::{cell_value, Cell, PieceKind};

/// The game board, stored as one flat vector of cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u16,
    height: u16,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// One row as a slice, or `None` past the bottom.
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let start = y * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map_or(false, |row| row.iter().all(|cell| cell.is_some()))
    }

    /// Fill every cell of row `y` with `kind`.
    pub fn fill_row(&mut self, y: usize, kind: PieceKind) {
        if y >= self.height as usize {
            return;
        }
        let start = y * self.width as usize;
        self.cells[start..start + self.width as usize].fill(Some(kind));
    }

    /// Does `shape` placed with its top-left corner at `(x, y)` overlap the
    /// walls, the floor or a filled cell?
    ///
    /// Rows above the board (`y < 0`) only count for the side walls, so a
    /// piece may hang over the top edge.
    pub fn collides(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.filled().any(|(sx, sy, _)| {
            let bx = x + sx;
            let by = y + sy;
            if bx < 0 || bx >= self.width as i32 || by >= self.height as i32 {
                return true;
            }
            by >= 0 && self.is_occupied(bx, by)
        })
    }

    /// Write every filled cell of `shape` at `(x, y)` into the board.
    ///
    /// Callers check [`Board::collides`] first; cells falling outside the
    /// grid are dropped.
    pub fn merge(&mut self, shape: &Shape, x: i32, y: i32) {
        for (sx, sy, kind) in shape.filled() {
            self.set(x + sx, y + sy, Some(kind));
        }
    }

    /// Clear all full rows and return the row indices that were cleared (sorted bottom to top)
    ///
    /// Indices refer to the board as it was before the sweep. Rows above a
    /// cleared row move down by the number of cleared rows beneath them, and
    /// empty rows are inserted at the top.
    pub fn clear_full_rows(&mut self) -> Vec<usize> {
        let mut cleared_rows = Vec::new();
        let width = self.width as usize;
        let mut write_y = self.height as usize;

        // Scan from bottom to top
        for read_y in (0..self.height as usize).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                // This row survives, move it down to the write position
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Clear the remaining rows at the top
        self.cells[..write_y * width].fill(None);

        cleared_rows
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write numeric cell ids (0 = empty) into `out`, reusing its allocation.
    pub fn write_values(&self, out: &mut Vec<u8>) {
        out.clear();
        out.extend(self.cells.iter().map(|&c| cell_value(c)));
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Build a board from text rows; `.` is empty, a piece letter fills the
    /// cell with that kind and any other character fills it with `I`.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len() as u16;
        let width = rows.first().map_or(0, |r| r.chars().count()) as u16;
        let mut board = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch != '.' {
                    let kind = PieceKind::from_char(ch).unwrap_or(PieceKind::I);
                    board.set(x as i32, y as i32, Some(kind));
                }
            }
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::get_shape;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new(10, 20);
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(9, 0), Some(9));
        assert_eq!(board.index(0, 1), Some(10));
        assert_eq!(board.index(9, 19), Some(199));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(10, 0), None);
        assert_eq!(board.index(0, 20), None);
    }

    #[test]
    fn test_collides_above_top_only_checks_walls() {
        let board = Board::new(10, 20);
        let i = get_shape(PieceKind::I);
        // Vertical I in column 1 of its box, hanging three rows above the board.
        assert!(!board.collides(&i, 0, -3));
        assert!(board.collides(&i, -2, -3));
        assert!(board.collides(&i, 9, -3));
        assert!(!board.collides(&i, 8, -3));
    }

    #[test]
    fn test_collides_with_floor() {
        let board = Board::new(10, 20);
        let t = get_shape(PieceKind::T);
        // Bottom row of the T box is empty, so it may overhang the floor by one.
        assert!(!board.collides(&t, 0, 18));
        assert!(board.collides(&t, 0, 19));
    }

    #[test]
    fn test_merge_writes_only_filled_cells() {
        let mut board = Board::new(10, 20);
        board.set(0, 0, Some(PieceKind::Z));
        let o = get_shape(PieceKind::O);
        board.merge(&o, 4, 18);
        assert_eq!(board.get(4, 18), Some(Some(PieceKind::O)));
        assert_eq!(board.get(5, 19), Some(Some(PieceKind::O)));
        assert_eq!(board.get(0, 0), Some(Some(PieceKind::Z)));
        assert_eq!(board.cells().iter().filter(|c| c.is_some()).count(), 5);
    }

    #[test]
    fn test_clear_full_rows_reports_original_indices() {
        let mut board = Board::from_ascii(&[
            "..T.",
            "IIII",
            "O...",
            "ZZZZ",
        ]);
        let cleared = board.clear_full_rows();
        assert_eq!(cleared, vec![3, 1]);
        assert_eq!(
            board,
            Board::from_ascii(&[
                "....",
                "....",
                "..T.",
                "O...",
            ])
        );
    }

    #[test]
    fn test_write_values() {
        let board = Board::from_ascii(&["T.", ".Z"]);
        let mut out = Vec::new();
        board.write_values(&mut out);
        assert_eq!(out, vec![1, 0, 0, 7]);
    }
}
