//! Game state module - manages the complete game session
//!
//! This module ties together all core components: board, pieces, RNG, and scoring.
//! It owns the active piece lifecycle (spawn, move, rotate, drop, lock), the
//! gravity accumulator and the `Running / Paused / GameOver` state machine.
//!
//! Every operation takes `&mut self` and runs to completion, so a command is
//! either fully applied before the next tick or not at all.

use tracing::{debug, info, trace};

use crate::board::Board;
use crate::config::{ConfigError, EngineConfig};
use crate::pieces::{try_rotate, PieceCatalog, Shape};
use crate::rng::{BagRandomizer, PieceQueue};
use crate::scoring::{drop_interval_after, sweep_reward};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{GameAction, GameEvent, PieceKind, RotateDirection, SessionState};

/// The falling piece: an owned shape plus its board-relative origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: PieceKind,
    shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl ActivePiece {
    /// Place `shape` at row 0, centred on a board `board_width` columns wide.
    pub fn spawn(kind: PieceKind, shape: Shape, board_width: u16) -> Self {
        let x = (board_width as i32 - shape.width() as i32).div_euclid(2);
        Self { kind, shape, x, y: 0 }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Board coordinates of every filled cell.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled()
            .map(move |(sx, sy, _)| (self.x + sx, self.y + sy))
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: EngineConfig,
    catalog: PieceCatalog,
    board: Board,
    active: Option<ActivePiece>,
    queue: PieceQueue,
    session: SessionState,
    score: u64,
    lines: u32,
    drop_interval_ms: u32,
    /// Gravity accumulator; reset on every downward step.
    drop_timer_ms: u32,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Pieces spawned this episode, including a spawn that ended the game.
    piece_id: u32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Validate `config` and start a session with the first piece spawned.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let board = Board::new(config.width, config.height);
        Self::with_board(config, board)
    }

    /// Start a session on a pre-filled board.
    ///
    /// The board's dimensions replace the configured ones. If the first piece
    /// cannot spawn the session starts in `GameOver`.
    pub fn with_board(mut config: EngineConfig, board: Board) -> Result<Self, ConfigError> {
        config.width = board.width();
        config.height = board.height();
        let catalog = config.validate()?;
        let queue = PieceQueue::new(
            BagRandomizer::new(catalog.clone(), config.seed),
            config.preview_len,
        );

        let mut state = Self {
            drop_interval_ms: config.initial_drop_ms,
            config,
            catalog,
            board,
            active: None,
            queue,
            session: SessionState::Running,
            score: 0,
            lines: 0,
            drop_timer_ms: 0,
            episode_id: 0,
            piece_id: 0,
            events: Vec::new(),
        };
        state.spawn_piece();
        Ok(state)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn drop_timer_ms(&self) -> u32 {
        self.drop_timer_ms
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    /// Seed of the current episode's piece supply.
    pub fn seed(&self) -> u32 {
        self.queue.seed()
    }

    /// Upcoming kinds, nearest first.
    pub fn preview(&self) -> impl ExactSizeIterator<Item = PieceKind> + '_ {
        self.queue.preview()
    }

    /// Events emitted since the last drain, oldest first.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Lowest row the active piece can reach by falling straight down.
    ///
    /// `None` without an active piece or when the piece already overlaps
    /// something (a blocked spawn).
    pub fn ghost_y(&self) -> Option<i32> {
        let active = self.active.as_ref()?;
        if self.board.collides(&active.shape, active.x, active.y) {
            return None;
        }
        let mut y = active.y;
        while !self.board.collides(&active.shape, active.x, y + 1) {
            y += 1;
        }
        Some(y)
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.board.width();
        out.height = self.board.height();
        self.board.write_values(&mut out.board);

        match &self.active {
            Some(piece) => {
                if let Some(snap) = out.active.as_mut() {
                    snap.fill_from(piece);
                } else {
                    out.active = Some(ActiveSnapshot::from(piece));
                }
            }
            None => out.active = None,
        }
        out.ghost_y = self.ghost_y();
        out.preview.clear();
        out.preview.extend(self.queue.preview());
        out.session = self.session;
        out.score = self.score;
        out.lines = self.lines;
        out.drop_interval_ms = self.drop_interval_ms;
        out.episode_id = self.episode_id;
        out.piece_id = self.piece_id;
        out.seed = self.queue.seed();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Spawn the next piece from the queue.
    ///
    /// Returns false (and ends the session) when the piece collides at its
    /// spawn position. The blocked piece stays active so it can be drawn.
    fn spawn_piece(&mut self) -> bool {
        let kind = self.queue.pop();
        let piece = ActivePiece::spawn(kind, self.catalog.shape(kind), self.board.width());
        let blocked = self.board.collides(&piece.shape, piece.x, piece.y);

        self.piece_id = self.piece_id.wrapping_add(1);
        self.active = Some(piece);

        if blocked {
            self.session = SessionState::GameOver;
            self.events.push(GameEvent::GameOver);
            info!(
                score = self.score,
                lines = self.lines,
                pieces = self.piece_id,
                ?kind,
                "spawn blocked, game over"
            );
            return false;
        }
        true
    }

    /// Move the active piece down one row, or lock it if it cannot fall.
    ///
    /// Returns true if the piece fell. Either way the gravity accumulator is
    /// reset.
    fn step_down(&mut self) -> bool {
        self.drop_timer_ms = 0;
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        if !self.board.collides(&active.shape, active.x, active.y + 1) {
            active.y += 1;
            trace!(y = active.y, "gravity step");
            return true;
        }

        self.lock_piece();
        false
    }

    /// Merge the active piece, sweep full rows and spawn the next piece.
    fn lock_piece(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.board.merge(&active.shape, active.x, active.y);
        self.events.push(GameEvent::Locked { kind: active.kind });
        debug!(kind = ?active.kind, x = active.x, y = active.y, "piece locked");

        let cleared = self.board.clear_full_rows();
        if !cleared.is_empty() {
            let count = cleared.len() as u32;
            let reward = sweep_reward(count);
            self.score = self.score.saturating_add(reward);
            self.lines = self.lines.saturating_add(count);
            self.drop_interval_ms = drop_interval_after(
                self.drop_interval_ms,
                count,
                self.config.drop_step_ms,
                self.config.min_drop_ms,
            );
            self.events.push(GameEvent::LinesCleared { count, reward });
            debug!(
                rows = ?cleared,
                reward,
                score = self.score,
                drop_interval_ms = self.drop_interval_ms,
                "rows cleared"
            );
        }

        self.spawn_piece();
        self.drop_timer_ms = 0;
    }

    /// Advance the gravity accumulator by `elapsed_ms`.
    ///
    /// Only a `Running` session accumulates. When the accumulator exceeds the
    /// drop interval one gravity step runs. Returns true if a step ran.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.session.is_running() {
            return false;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        if self.drop_timer_ms > self.drop_interval_ms {
            self.step_down();
            return true;
        }
        false
    }

    /// Shift the active piece by `dx` columns. Rejected moves change nothing.
    pub fn move_horizontal(&mut self, dx: i8) -> bool {
        if !self.session.is_running() {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        let x = active.x + dx as i32;
        if self.board.collides(&active.shape, x, active.y) {
            return false;
        }
        active.x = x;
        self.events.push(GameEvent::Moved { dx });
        true
    }

    /// Rotate the active piece, kicking it sideways if the new orientation
    /// collides. On failure the piece keeps its shape and column.
    pub fn rotate(&mut self, direction: RotateDirection) -> bool {
        if !self.session.is_running() {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        let board = &self.board;
        let y = active.y;
        match try_rotate(&active.shape, active.x, direction, |shape, x| {
            board.collides(shape, x, y)
        }) {
            Some((shape, kick)) => {
                active.shape = shape;
                active.x += kick;
                if kick != 0 {
                    debug!(?direction, kick, x = active.x, "rotation kicked");
                }
                self.events.push(GameEvent::Rotated { direction, kick });
                true
            }
            None => {
                debug!(?direction, kind = ?active.kind, "rotation blocked");
                self.events.push(GameEvent::RotationBlocked { direction });
                false
            }
        }
    }

    /// One player-driven gravity step. Returns true if the session accepted
    /// it; the piece either fell or locked.
    pub fn soft_drop(&mut self) -> bool {
        if !self.session.is_running() || self.active.is_none() {
            return false;
        }
        self.step_down();
        true
    }

    /// Drop the active piece to its ghost row and lock it there.
    pub fn hard_drop(&mut self) -> bool {
        if !self.session.is_running() {
            return false;
        }
        let Some(ghost_y) = self.ghost_y() else {
            return false;
        };
        if let Some(active) = self.active.as_mut() {
            active.y = ghost_y;
        }
        self.step_down();
        true
    }

    /// Flip between `Running` and `Paused`. No effect once the game is over.
    pub fn toggle_pause(&mut self) -> bool {
        match self.session {
            SessionState::Running => {
                self.session = SessionState::Paused;
                self.events.push(GameEvent::Paused);
                true
            }
            SessionState::Paused => {
                self.session = SessionState::Running;
                self.events.push(GameEvent::Resumed);
                true
            }
            SessionState::GameOver => false,
        }
    }

    /// Reset board, score, lines, supply and gravity, then spawn and run.
    ///
    /// The new supply is seeded from a value drawn off the old one, so
    /// consecutive episodes differ while a whole run stays reproducible from
    /// one seed.
    pub fn restart(&mut self) {
        let seed = self.queue.next_seed();
        self.board.clear();
        self.queue = PieceQueue::new(
            BagRandomizer::new(self.catalog.clone(), seed),
            self.config.preview_len,
        );
        self.active = None;
        self.session = SessionState::Running;
        self.score = 0;
        self.lines = 0;
        self.drop_interval_ms = self.config.initial_drop_ms;
        self.drop_timer_ms = 0;
        self.piece_id = 0;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.events.push(GameEvent::Restarted);
        info!(episode = self.episode_id, seed, "session restarted");

        self.spawn_piece();
    }

    /// Apply a game action. Returns true if it changed the session.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_horizontal(-1),
            GameAction::MoveRight => self.move_horizontal(1),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.rotate(RotateDirection::Clockwise),
            GameAction::RotateCcw => self.rotate(RotateDirection::CounterClockwise),
            GameAction::Pause => self.toggle_pause(),
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::get_shape;

    fn only(kind: PieceKind) -> EngineConfig {
        EngineConfig::default().with_pieces(vec![kind])
    }

    fn active(state: &GameState) -> &ActivePiece {
        state.active.as_ref().unwrap()
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(EngineConfig::default().with_seed(12345)).unwrap();

        assert_eq!(state.session, SessionState::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.lines, 0);
        assert_eq!(state.drop_interval_ms, 1000);
        assert_eq!(state.episode_id, 0);
        assert_eq!(state.piece_id, 1);
        assert!(state.active.is_some());
        assert_eq!(state.preview().len(), 3);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let err = GameState::new(EngineConfig::default().with_size(0, 20)).unwrap_err();
        assert_eq!(err, ConfigError::ZeroWidth);
        let err = GameState::new(EngineConfig::default().with_pieces(vec![])).unwrap_err();
        assert_eq!(err, ConfigError::EmptyCatalog);
    }

    #[test]
    fn test_spawn_is_centred() {
        let state = GameState::new(only(PieceKind::T)).unwrap();
        assert_eq!((active(&state).x, active(&state).y), (3, 0));

        let state = GameState::new(only(PieceKind::I)).unwrap();
        assert_eq!(active(&state).x, 3);

        let state = GameState::new(only(PieceKind::O).with_size(7, 20)).unwrap();
        // floor((7 - 2) / 2)
        assert_eq!(active(&state).x, 2);
    }

    #[test]
    fn test_spawn_takes_queue_front() {
        let mut state = GameState::new(EngineConfig::default().with_seed(12345)).unwrap();
        let next = state.preview().next().unwrap();
        state.hard_drop();
        assert_eq!(active(&state).kind, next);
        assert_eq!(state.piece_id, 2);
    }

    #[test]
    fn test_tick_requires_interval_to_be_exceeded() {
        let mut state = GameState::new(only(PieceKind::T)).unwrap();
        assert!(!state.tick(1000));
        assert_eq!(active(&state).y, 0);
        assert_eq!(state.drop_timer_ms, 1000);

        assert!(state.tick(1));
        assert_eq!(active(&state).y, 1);
        assert_eq!(state.drop_timer_ms, 0);
    }

    #[test]
    fn test_move_is_rejected_at_wall() {
        let mut state = GameState::new(only(PieceKind::T)).unwrap();
        let mut moved = 0;
        for _ in 0..10 {
            if state.move_horizontal(-1) {
                moved += 1;
            }
        }
        assert_eq!(moved, 3);
        assert_eq!(active(&state).x, 0);
        assert_eq!(state.events.len(), 3);
        assert!(state
            .events
            .iter()
            .all(|e| *e == GameEvent::Moved { dx: -1 }));
    }

    #[test]
    fn test_soft_drop_resets_accumulator() {
        let mut state = GameState::new(only(PieceKind::T)).unwrap();
        state.tick(600);
        assert!(state.soft_drop());
        assert_eq!(active(&state).y, 1);
        assert_eq!(state.drop_timer_ms, 0);
    }

    #[test]
    fn test_hard_drop_locks_at_ghost() {
        let mut state = GameState::new(only(PieceKind::O)).unwrap();
        assert_eq!(state.ghost_y(), Some(18));
        assert!(state.hard_drop());

        assert_eq!(state.board.get(4, 18), Some(Some(PieceKind::O)));
        assert_eq!(state.board.get(5, 19), Some(Some(PieceKind::O)));
        assert_eq!(state.events, vec![GameEvent::Locked { kind: PieceKind::O }]);
        assert_eq!(active(&state).y, 0);
    }

    #[test]
    fn test_rotation_commits_without_kick() {
        let mut state = GameState::new(only(PieceKind::T)).unwrap();
        assert!(state.rotate(RotateDirection::Clockwise));
        assert_eq!(
            active(&state).shape,
            get_shape(PieceKind::T).rotated(RotateDirection::Clockwise)
        );
        assert_eq!(
            state.events,
            vec![GameEvent::Rotated {
                direction: RotateDirection::Clockwise,
                kick: 0
            }]
        );
    }

    #[test]
    fn test_rotation_kicks_off_wall() {
        let mut state = GameState::new(only(PieceKind::I)).unwrap();
        // Vertical I sits in column 1 of its box; push the box against the
        // left wall so the horizontal rotation would stick out.
        while state.move_horizontal(-1) {}
        assert_eq!(active(&state).x, -1);

        assert!(state.rotate(RotateDirection::Clockwise));
        let piece = active(&state);
        assert_eq!(piece.x, 0);
        assert!(piece.cells().all(|(x, _)| x >= 0));
        assert_eq!(
            state.events.last(),
            Some(&GameEvent::Rotated {
                direction: RotateDirection::Clockwise,
                kick: 1
            })
        );
    }

    #[test]
    fn test_blocked_rotation_restores_piece() {
        let mut board = Board::new(10, 20);
        // Wall of filled cells either side of a one-column shaft at x = 4.
        for y in 0..20 {
            for x in 0..10 {
                if x != 4 && y >= 1 {
                    board.set(x, y, Some(PieceKind::Z));
                }
            }
        }
        let mut state = GameState::with_board(only(PieceKind::I), board).unwrap();
        // Drop the vertical I into the shaft.
        state.soft_drop();
        state.soft_drop();
        let before = active(&state).clone();
        state.drain_events().for_each(drop);

        assert!(!state.rotate(RotateDirection::Clockwise));
        assert_eq!(active(&state), &before);
        assert_eq!(
            state.events,
            vec![GameEvent::RotationBlocked {
                direction: RotateDirection::Clockwise
            }]
        );
    }

    #[test]
    fn test_line_clear_scores_and_speeds_up() {
        let mut board = Board::new(10, 20);
        for y in [18, 19] {
            for x in 0..10 {
                if x != 4 && x != 5 {
                    board.set(x, y, Some(PieceKind::S));
                }
            }
        }
        let mut state = GameState::with_board(only(PieceKind::O), board).unwrap();
        assert!(state.hard_drop());

        assert_eq!(state.score, 30);
        assert_eq!(state.lines, 2);
        assert_eq!(state.drop_interval_ms, 900);
        assert!(state.board.cells().iter().all(|c| c.is_none()));
        assert_eq!(
            state.events,
            vec![
                GameEvent::Locked { kind: PieceKind::O },
                GameEvent::LinesCleared {
                    count: 2,
                    reward: 30
                },
            ]
        );
    }

    #[test]
    fn test_game_over_blocks_everything_but_restart() {
        let mut board = Board::new(10, 20);
        board.fill_row(0, PieceKind::Z);
        board.fill_row(1, PieceKind::Z);
        let mut state = GameState::with_board(EngineConfig::default(), board).unwrap();

        assert_eq!(state.session, SessionState::GameOver);
        assert_eq!(state.events, vec![GameEvent::GameOver]);
        assert_eq!(state.ghost_y(), None);

        let board_before = state.board.clone();
        let active_before = state.active.clone();
        assert!(!state.tick(5000));
        assert!(!state.move_horizontal(1));
        assert!(!state.rotate(RotateDirection::Clockwise));
        assert!(!state.soft_drop());
        assert!(!state.hard_drop());
        assert!(!state.toggle_pause());
        assert_eq!(state.board, board_before);
        assert_eq!(state.active, active_before);
        assert_eq!(state.session, SessionState::GameOver);

        state.restart();
        assert_eq!(state.session, SessionState::Running);
        assert!(state.board.cells().iter().all(|c| c.is_none()));
        assert_eq!(state.episode_id, 1);
        assert_eq!(state.piece_id, 1);
    }

    #[test]
    fn test_pause_freezes_gravity_and_commands() {
        let mut state = GameState::new(only(PieceKind::T)).unwrap();
        state.tick(300);
        assert!(state.toggle_pause());
        assert_eq!(state.session, SessionState::Paused);

        assert!(!state.tick(5000));
        assert!(!state.move_horizontal(1));
        assert!(!state.apply_action(GameAction::HardDrop));
        assert_eq!(state.drop_timer_ms, 300);
        assert_eq!(active(&state).y, 0);

        assert!(state.toggle_pause());
        assert_eq!(state.session, SessionState::Running);
        assert_eq!(state.events, vec![GameEvent::Paused, GameEvent::Resumed]);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = GameState::new(EngineConfig::default().with_seed(12345)).unwrap();
        for _ in 0..5 {
            state.hard_drop();
        }
        state.score = 120;
        state.lines = 4;
        state.drop_interval_ms = 800;
        state.drain_events().for_each(drop);

        assert!(state.apply_action(GameAction::Restart));
        assert_eq!(state.score, 0);
        assert_eq!(state.lines, 0);
        assert_eq!(state.drop_interval_ms, 1000);
        assert_eq!(state.drop_timer_ms, 0);
        assert_eq!(state.episode_id, 1);
        assert!(state.board.cells().iter().all(|c| c.is_none()));
        assert_eq!(state.events, vec![GameEvent::Restarted]);
    }

    #[test]
    fn test_restart_seeds_are_reproducible() {
        let run = || {
            let mut state = GameState::new(EngineConfig::default().with_seed(9)).unwrap();
            let mut seeds = vec![state.seed()];
            for _ in 0..3 {
                state.hard_drop();
                state.restart();
                seeds.push(state.seed());
            }
            (seeds, state.snapshot())
        };
        let (seeds, snap) = run();
        assert_eq!(run(), (seeds.clone(), snap));
        assert_eq!(seeds[0], 9);
        assert_ne!(seeds[1], seeds[0]);
    }

    #[test]
    fn test_drain_events_empties_buffer() {
        let mut state = GameState::new(only(PieceKind::T)).unwrap();
        state.move_horizontal(1);
        state.move_horizontal(-1);
        let drained: Vec<GameEvent> = state.drain_events().collect();
        assert_eq!(
            drained,
            vec![GameEvent::Moved { dx: 1 }, GameEvent::Moved { dx: -1 }]
        );
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = GameState::new(only(PieceKind::O)).unwrap();
        state.hard_drop();
        let snap = state.snapshot();

        assert_eq!((snap.width, snap.height), (10, 20));
        assert_eq!(snap.board.len(), 200);
        assert_eq!(snap.board[18 * 10 + 4], PieceKind::O.cell_value());
        let active = snap.active.as_ref().unwrap();
        assert_eq!(active.kind, PieceKind::O);
        assert_eq!(active.cells, vec![(4, 0), (5, 0), (4, 1), (5, 1)]);
        assert_eq!(snap.ghost_y, Some(16));
        assert_eq!(snap.preview, vec![PieceKind::O; 3]);
        assert_eq!(snap.session, SessionState::Running);
    }
}
