use blockfall::core::{Board, EngineConfig, GameState};
use blockfall::term::{AnchorY, FrameBuffer, GameView, Viewport};
use blockfall::types::{PieceKind, SessionState};

fn screen_text(fb: &FrameBuffer) -> String {
    (0..fb.height())
        .map(|y| fb.row_string(y))
        .collect::<Vec<_>>()
        .join("\n")
}

fn t_only() -> EngineConfig {
    EngineConfig::default().with_pieces(vec![PieceKind::T])
}

#[test]
fn term_view_renders_border_corners() {
    let snap = GameState::new(t_only()).unwrap().snapshot();
    // 10 cells * 2 columns + border = 22 wide, 20 rows + border = 22 tall.
    let fb = GameView::default().render(&snap, Viewport::new(22, 22));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(21, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 21).unwrap().ch, '└');
    assert_eq!(fb.get(21, 21).unwrap().ch, '┘');
}

#[test]
fn term_view_follows_board_size() {
    let snap = GameState::new(t_only().with_size(6, 8)).unwrap().snapshot();
    let fb = GameView::default()
        .with_anchor_y(AnchorY::Top)
        .render(&snap, Viewport::new(14, 10));
    assert_eq!(fb.get(13, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 9).unwrap().ch, '└');
}

#[test]
fn term_view_renders_locked_cell_two_chars_wide() {
    let mut snap = GameState::new(t_only()).unwrap().snapshot();
    snap.board[19 * 10] = PieceKind::I.cell_value();
    snap.active = None;
    snap.ghost_y = None;

    let fb = GameView::default().render(&snap, Viewport::new(22, 22));
    assert_eq!(fb.get(1, 20).unwrap().ch, '█');
    assert_eq!(fb.get(2, 20).unwrap().ch, '█');
    assert_eq!(fb.get(3, 20).unwrap().ch, '·');
}

#[test]
fn term_view_draws_active_piece_and_ghost() {
    let snap = GameState::new(t_only()).unwrap().snapshot();
    let fb = GameView::default().render(&snap, Viewport::new(22, 22));

    // T spawns at x = 3; its top cell is board (4, 0) -> screen (9, 1).
    assert_eq!(fb.get(9, 1).unwrap().ch, '█');
    // Ghost rests at y = 18, so the top cell lands on board row 18.
    assert_eq!(fb.get(9, 19).unwrap().ch, '░');

    let fb = GameView::default()
        .with_ghost(false)
        .render(&snap, Viewport::new(22, 22));
    assert_eq!(fb.get(9, 19).unwrap().ch, '·');
}

#[test]
fn term_view_draws_side_panel_when_wide_enough() {
    let mut snap = GameState::new(t_only()).unwrap().snapshot();
    snap.score = 1234;
    snap.lines = 10;

    let fb = GameView::default().render(&snap, Viewport::new(60, 22));
    let text = screen_text(&fb);
    for needle in ["SCORE", "1234", "LINES", "SPEED", "1000", "NEXT"] {
        assert!(text.contains(needle), "missing {}", needle);
    }

    // Too narrow: no panel.
    let fb = GameView::default().render(&snap, Viewport::new(22, 22));
    assert!(!screen_text(&fb).contains("SCORE"));
}

#[test]
fn term_view_shows_pause_and_game_over_overlays() {
    let mut state = GameState::new(t_only()).unwrap();
    state.toggle_pause();
    let fb = GameView::default().render(&state.snapshot(), Viewport::new(22, 22));
    assert!(screen_text(&fb).contains("PAUSED"));

    let mut board = Board::new(10, 20);
    board.fill_row(1, PieceKind::O);
    let state = GameState::with_board(t_only(), board).unwrap();
    assert_eq!(state.session(), SessionState::GameOver);
    let fb = GameView::default().render(&state.snapshot(), Viewport::new(22, 22));
    let text = screen_text(&fb);
    assert!(text.contains("GAME OVER"));
    assert!(!text.contains("PAUSED"));
}

#[test]
fn term_view_render_into_reuses_buffer() {
    let snap = GameState::new(t_only()).unwrap().snapshot();
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    view.render_into(&snap, Viewport::new(40, 24), &mut fb);
    assert_eq!((fb.width(), fb.height()), (40, 24));

    let fresh = view.render(&snap, Viewport::new(40, 24));
    assert_eq!(fb, fresh);
}
