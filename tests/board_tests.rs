//! Board tests - grid access, collision predicate and row sweeps

use blockfall::core::{get_shape, Board, Shape};
use blockfall::types::{PieceKind, RotateDirection, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH};

fn classic_board() -> Board {
    Board::new(DEFAULT_BOARD_WIDTH, DEFAULT_BOARD_HEIGHT)
}

/// Straight reading of the collision rule, cell by cell.
fn reference_collides(board: &Board, shape: &Shape, x: i32, y: i32) -> bool {
    for sy in 0..shape.height() {
        for sx in 0..shape.width() {
            if shape.get(sx, sy) != Some(None) {
                let bx = x + sx as i32;
                let by = y + sy as i32;
                if bx < 0 || bx >= board.width() as i32 {
                    return true;
                }
                if by >= board.height() as i32 {
                    return true;
                }
                if by >= 0 && board.get(bx, by) != Some(None) {
                    return true;
                }
            }
        }
    }
    false
}

fn all_orientations(kind: PieceKind) -> Vec<Shape> {
    let mut shapes = vec![get_shape(kind)];
    for _ in 0..3 {
        let next = shapes[shapes.len() - 1].rotated(RotateDirection::Clockwise);
        shapes.push(next);
    }
    shapes
}

#[test]
fn test_board_new_empty() {
    let board = classic_board();
    assert_eq!(board.width(), 10);
    assert_eq!(board.height(), 20);
    for y in 0..20 {
        for x in 0..10 {
            assert_eq!(board.get(x, y), Some(None), "cell ({}, {})", x, y);
        }
    }
}

#[test]
fn test_board_get_set_out_of_bounds() {
    let mut board = classic_board();
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(10, 0), None);
    assert_eq!(board.get(0, 20), None);

    assert!(!board.set(-1, 0, Some(PieceKind::T)));
    assert!(!board.set(0, 20, Some(PieceKind::T)));
    assert!(board.set(5, 10, Some(PieceKind::T)));
    assert!(board.is_occupied(5, 10));
    assert!(board.set(5, 10, None));
    assert!(!board.is_occupied(5, 10));
}

#[test]
fn test_collides_matches_reference_everywhere() {
    let mut board = Board::new(8, 12);
    // Scattered stack in the lower half.
    for y in 6..12 {
        for x in 0..8 {
            if (x * 3 + y * 5) % 4 == 0 {
                board.set(x, y, Some(PieceKind::Z));
            }
        }
    }

    for kind in PieceKind::ALL {
        for shape in all_orientations(kind) {
            for y in -5..15 {
                for x in -5..12 {
                    assert_eq!(
                        board.collides(&shape, x, y),
                        reference_collides(&board, &shape, x, y),
                        "{:?} at ({}, {})",
                        kind,
                        x,
                        y
                    );
                }
            }
        }
    }
}

#[test]
fn test_collides_is_pure() {
    let board = Board::from_ascii(&["....", "..I.", "...."]);
    let before = board.clone();
    let o = get_shape(PieceKind::O);
    assert!(board.collides(&o, 1, 0));
    assert!(!board.collides(&o, 0, 1));
    assert_eq!(board, before);
}

#[test]
fn test_cells_above_board_pass_over_stack() {
    let mut board = classic_board();
    board.fill_row(0, PieceKind::J);
    let o = get_shape(PieceKind::O);
    // Fully above the board: only walls matter.
    assert!(!board.collides(&o, 4, -2));
    assert!(board.collides(&o, 4, -1));
    assert!(board.collides(&o, -1, -2));
}

#[test]
fn test_sweep_rows_2_5_7() {
    let mut board = classic_board();
    for y in 0..20usize {
        if matches!(y, 2 | 5 | 7) {
            board.fill_row(y, PieceKind::I);
        } else {
            // One marker per row so shifted rows can be told apart.
            board.set((y % 10) as i32, y as i32, Some(PieceKind::T));
        }
    }

    let cleared = board.clear_full_rows();
    assert_eq!(cleared, vec![7, 5, 2]);

    for y in 0..3 {
        assert!(board.row(y).unwrap().iter().all(|c| c.is_none()), "row {}", y);
    }
    // (old row, new row): each row moves down by the cleared rows beneath it.
    for (old, new) in [(0, 3), (1, 4), (3, 5), (4, 6), (6, 7), (8, 8), (19, 19)] {
        let row = board.row(new).unwrap();
        assert_eq!(row.iter().filter(|c| c.is_some()).count(), 1, "row {}", new);
        assert_eq!(row[old % 10], Some(PieceKind::T), "old {} -> new {}", old, new);
    }
    assert!(board.cells().iter().all(|c| *c != Some(PieceKind::I)));
}

#[test]
fn test_sweep_adjacent_rows() {
    let mut board = Board::from_ascii(&[
        "S...",
        "ZZZZ",
        "ZZZZ",
        ".T..",
    ]);
    assert_eq!(board.clear_full_rows(), vec![2, 1]);
    assert_eq!(
        board,
        Board::from_ascii(&[
            "....",
            "....",
            "S...",
            ".T..",
        ])
    );
}

#[test]
fn test_sweep_without_full_rows_is_noop() {
    let mut board = Board::from_ascii(&["I.", ".I"]);
    let before = board.clone();
    assert!(board.clear_full_rows().is_empty());
    assert_eq!(board, before);
}

#[test]
fn test_clear_resets_board() {
    let mut board = classic_board();
    board.fill_row(19, PieceKind::L);
    board.clear();
    assert_eq!(board, classic_board());
}
