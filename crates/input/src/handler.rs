//! DAS/ARR input handler for terminal environments.
//!
//! Holding a movement key repeats it: nothing happens until the DAS delay has
//! passed, then one action fires per ARR interval. Horizontal movement and
//! soft drop repeat independently, so both can be held at once.
//!
//! Many terminals never report key releases. A key counts as released once no
//! movement key has been seen for the release timeout; the terminal's own
//! auto-repeat keeps a held key alive.

use arrayvec::ArrayVec;
use crossterm::event::KeyEvent;

use crate::map::{action_for_code, handle_key_event, is_release};
use crate::types::{GameAction, DEFAULT_ARR_MS, DEFAULT_DAS_MS, SOFT_DROP_ARR_MS, SOFT_DROP_DAS_MS};

/// Upper bound of actions produced by a single [`InputHandler::update`].
pub const MAX_ACTIONS_PER_UPDATE: usize = 32;

pub type ActionBatch = ArrayVec<GameAction, MAX_ACTIONS_PER_UPDATE>;

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that triggers DAS/ARR repeats.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Repeat timing for one held action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AutoRepeat {
    held: Option<GameAction>,
    das_ms: u32,
    arr_ms: u32,
    held_ms: u32,
    charge_ms: u32,
}

impl AutoRepeat {
    fn new(das_ms: u32, arr_ms: u32) -> Self {
        Self {
            held: None,
            das_ms,
            // A zero ARR would repeat forever within one update.
            arr_ms: arr_ms.max(1),
            held_ms: 0,
            charge_ms: 0,
        }
    }

    /// Start holding `action`. Only a change of held action fires immediately.
    fn press(&mut self, action: GameAction) -> Option<GameAction> {
        if self.held == Some(action) {
            return None;
        }
        self.held = Some(action);
        self.held_ms = 0;
        self.charge_ms = 0;
        Some(action)
    }

    fn release(&mut self, action: GameAction) {
        if self.held == Some(action) {
            self.clear();
        }
    }

    fn clear(&mut self) {
        self.held = None;
        self.held_ms = 0;
        self.charge_ms = 0;
    }

    fn advance(&mut self, elapsed_ms: u32, out: &mut ActionBatch) {
        let Some(action) = self.held else {
            return;
        };

        let before = self.held_ms;
        self.held_ms = self.held_ms.saturating_add(elapsed_ms);
        if self.held_ms < self.das_ms {
            return;
        }

        // Only time past the DAS delay charges repeats.
        let charge = if before < self.das_ms {
            self.held_ms - self.das_ms
        } else {
            elapsed_ms
        };
        self.charge_ms = self.charge_ms.saturating_add(charge);
        while self.charge_ms >= self.arr_ms {
            if out.try_push(action).is_err() {
                // Batch full; drop the backlog rather than bursting next frame.
                self.charge_ms = 0;
                break;
            }
            self.charge_ms -= self.arr_ms;
        }
    }
}

/// Tracks input state for DAS/ARR handling.
#[derive(Debug, Clone)]
pub struct InputHandler {
    horizontal: AutoRepeat,
    drop: AutoRepeat,
    /// Time since the last movement key event.
    idle_ms: u32,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_DAS_MS, DEFAULT_ARR_MS)
    }

    pub fn with_config(das_ms: u32, arr_ms: u32) -> Self {
        Self {
            horizontal: AutoRepeat::new(das_ms, arr_ms),
            drop: AutoRepeat::new(SOFT_DROP_DAS_MS, SOFT_DROP_ARR_MS),
            idle_ms: 0,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Feed one key event; returns the action to apply right now, if any.
    ///
    /// Release events end the matching hold. Presses of non-repeating keys
    /// (rotate, hard drop, pause, restart) pass straight through.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<GameAction> {
        if is_release(key) {
            if let Some(action) = action_for_code(key.code) {
                self.handle_release(action);
            }
            return None;
        }
        let action = handle_key_event(key)?;
        self.handle_press(action)
    }

    pub fn handle_press(&mut self, action: GameAction) -> Option<GameAction> {
        match action {
            GameAction::MoveLeft | GameAction::MoveRight => {
                self.idle_ms = 0;
                self.horizontal.press(action)
            }
            GameAction::SoftDrop => {
                self.idle_ms = 0;
                self.drop.press(action)
            }
            other => Some(other),
        }
    }

    pub fn handle_release(&mut self, action: GameAction) {
        self.horizontal.release(action);
        self.drop.release(action);
    }

    /// Advance hold timers by `elapsed_ms` and collect repeated actions.
    pub fn update(&mut self, elapsed_ms: u32) -> ActionBatch {
        let mut actions = ActionBatch::new();

        self.idle_ms = self.idle_ms.saturating_add(elapsed_ms);
        if self.idle_ms > self.key_release_timeout_ms {
            self.horizontal.clear();
            self.drop.clear();
        }

        self.horizontal.advance(elapsed_ms, &mut actions);
        self.drop.advance(elapsed_ms, &mut actions);
        actions
    }

    pub fn is_holding(&self) -> bool {
        self.horizontal.held.is_some() || self.drop.held.is_some()
    }

    pub fn reset(&mut self) {
        self.horizontal.clear();
        self.drop.clear();
        self.idle_ms = 0;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
