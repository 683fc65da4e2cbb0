//! Key mapping from terminal events to gesture commands.

use crate::types::ControlCommand;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Deliver this command through the mailbox, exactly like the relay would
    Send(ControlCommand),
    /// Drop the piece and lock it immediately
    HardDrop,
}

impl KeyAction {
    /// Wire tag for mailbox delivery
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            KeyAction::Send(cmd) => cmd.as_str(),
            KeyAction::HardDrop => None,
        }
    }
}

/// Map keyboard input to gesture commands.
///
/// Arrow keys stand in for leaning, space for a shake and `z` for the sensor button.
/// Terminals that report key releases get `Button Released` when `z` goes up.
pub fn handle_key_event(key: KeyEvent) -> Option<KeyAction> {
    if key.kind == KeyEventKind::Release {
        return match key.code {
            KeyCode::Char('z') | KeyCode::Char('Z') | KeyCode::Char('y') | KeyCode::Char('Y') => {
                Some(KeyAction::Send(ControlCommand::ButtonReleased))
            }
            _ => None,
        };
    }

    let command = match key.code {
        // Leaning
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            ControlCommand::LeanLeft
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            ControlCommand::LeanRight
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            ControlCommand::LeanForward
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            ControlCommand::LeanBackward
        }
        KeyCode::Char('n') | KeyCode::Char('N') => ControlCommand::Neutral,

        // Gestures
        KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Char('X') => ControlCommand::Shake,
        KeyCode::Char('z') | KeyCode::Char('Z') | KeyCode::Char('y') | KeyCode::Char('Y') => {
            ControlCommand::ButtonPressed
        }

        KeyCode::Enter => return Some(KeyAction::HardDrop),

        _ => return None,
    };

    Some(KeyAction::Send(command))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
