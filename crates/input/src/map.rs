//! Key mapping from terminal events to game actions.
//!
//! Arrows, vim keys (hjkl) and WASD all work; letters are case-insensitive.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a key press (or terminal auto-repeat) to a game action.
///
/// Release events never produce an action.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if is_release(key) {
        return None;
    }
    action_for_code(key.code)
}

/// The action bound to a key, regardless of press/release.
pub fn action_for_code(code: KeyCode) -> Option<GameAction> {
    match code {
        KeyCode::Left => Some(GameAction::MoveLeft),
        KeyCode::Right => Some(GameAction::MoveRight),
        KeyCode::Down => Some(GameAction::SoftDrop),
        KeyCode::Up => Some(GameAction::RotateCw),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'h' | 'a' => Some(GameAction::MoveLeft),
            'l' | 'd' => Some(GameAction::MoveRight),
            'j' | 's' => Some(GameAction::SoftDrop),
            'k' | 'w' | 'x' => Some(GameAction::RotateCw),
            'z' | 'y' => Some(GameAction::RotateCcw),
            ' ' => Some(GameAction::HardDrop),
            'p' => Some(GameAction::Pause),
            'r' => Some(GameAction::Restart),
            _ => None,
        },
        _ => None,
    }
}

pub fn is_release(key: KeyEvent) -> bool {
    key.kind == KeyEventKind::Release
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    if is_release(key) {
        return false;
    }
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
