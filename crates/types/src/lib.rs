//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (piece logic, the command listener, the terminal view).
//!
//! # Coordinates
//!
//! The playfield uses a y-up coordinate system:
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, bottom to top)
//! - **Spawn position**: (4, 18)
//! - **Down** is `(0, -1)`
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `STEP_DELAY_MS` | 1000 | Gravity step interval |
//! | `MOVE_DELAY_MS` | 100 | Continuous-input repeat interval |
//! | `LOCK_DELAY_MS` | 500 | Time without a successful move before a piece locks |
//!
//! # Command Vocabulary
//!
//! The sensor relay sends human-readable state names (`"Leaning Left"`, `"shake"`, ...).
//! [`ControlCommand::parse`] accepts those plus kebab-case aliases (`"lean-left"`).
//!
//! # Examples
//!
//! ```
//! use tilt_tetris_types::{ControlCommand, PieceKind, RotationDirection, BOARD_WIDTH};
//!
//! assert!(PieceKind::I.has_offset_pivot());
//! assert!(!PieceKind::T.has_offset_pivot());
//!
//! assert_eq!(ControlCommand::parse("Leaning Left"), ControlCommand::LeanLeft);
//! assert_eq!(ControlCommand::parse("lean-left"), ControlCommand::LeanLeft);
//! assert_eq!(ControlCommand::parse("wiggle"), ControlCommand::Unrecognized);
//!
//! assert_eq!(RotationDirection::CounterClockwise.sign(), -1);
//! assert_eq!(BOARD_WIDTH, 10);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: i32 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: i32 = 20;

/// Grid origin of freshly spawned pieces
pub const SPAWN_POSITION: Offset = (4, 18);

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u64 = 16;

/// Gravity step interval (1 row per second)
pub const STEP_DELAY_MS: u64 = 1000;

/// Continuous-input repeat interval
pub const MOVE_DELAY_MS: u64 = 100;

/// Lock delay: a piece that has not moved for this long locks on its next step
pub const LOCK_DELAY_MS: u64 = 500;

/// Default loopback endpoint of the sensor relay
pub const DEFAULT_RELAY_HOST: &str = "127.0.0.1";
pub const DEFAULT_RELAY_PORT: u16 = 65432;

/// Integer (x, y) offset, used for local cells, grid positions and kick translations
pub type Offset = (i32, i32);

/// A board tile (None = empty, Some = filled with piece kind)
pub type Tile = Option<PieceKind>;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// I and O rotate around a point between cells rather than a cell centre.
    pub fn has_offset_pivot(&self) -> bool {
        matches!(self, PieceKind::I | PieceKind::O)
    }
}

/// Rotation direction (clockwise = +1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    pub fn sign(&self) -> i32 {
        match self {
            RotationDirection::Clockwise => 1,
            RotationDirection::CounterClockwise => -1,
        }
    }
}

/// Commands understood by the piece controller.
///
/// Anything outside the vocabulary parses to [`ControlCommand::Unrecognized`], which is
/// dispatched as a no-op but still replaces the controller's input state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCommand {
    LeanLeft,
    LeanRight,
    LeanForward,
    LeanBackward,
    Shake,
    ButtonPressed,
    ButtonReleased,
    Neutral,
    Unrecognized,
}

impl ControlCommand {
    /// Parse a wire tag. Exact match on the relay's state names, plus kebab-case aliases.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "Leaning Left" | "lean-left" => ControlCommand::LeanLeft,
            "Leaning Right" | "lean-right" => ControlCommand::LeanRight,
            "Leaning Forward" | "lean-forward" => ControlCommand::LeanForward,
            "Leaning Backward" | "lean-backward" => ControlCommand::LeanBackward,
            "shake" => ControlCommand::Shake,
            "Button Pressed" | "button-pressed" => ControlCommand::ButtonPressed,
            "Button Released" | "button-released" => ControlCommand::ButtonReleased,
            "Neutral" | "neutral" => ControlCommand::Neutral,
            _ => ControlCommand::Unrecognized,
        }
    }

    /// Wire tag as sent by the relay. `Unrecognized` has no wire form.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            ControlCommand::LeanLeft => Some("Leaning Left"),
            ControlCommand::LeanRight => Some("Leaning Right"),
            ControlCommand::LeanForward => Some("Leaning Forward"),
            ControlCommand::LeanBackward => Some("Leaning Backward"),
            ControlCommand::Shake => Some("shake"),
            ControlCommand::ButtonPressed => Some("Button Pressed"),
            ControlCommand::ButtonReleased => Some("Button Released"),
            ControlCommand::Neutral => Some("Neutral"),
            ControlCommand::Unrecognized => None,
        }
    }

    /// Whether this command keeps the piece soft dropping on every move-repeat tick.
    pub fn is_accelerated_fall(&self) -> bool {
        matches!(self, ControlCommand::LeanBackward)
    }
}

/// Presentation cue emitted alongside movement commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualCue {
    LeanLeft,
    LeanRight,
    Neutral,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(STEP_DELAY_MS, 1000);
        assert_eq!(MOVE_DELAY_MS, 100);
        assert_eq!(LOCK_DELAY_MS, 500);
        assert_eq!(DEFAULT_RELAY_PORT, 65432);
    }

    #[test]
    fn wire_tags_round_trip_through_parse() {
        let commands = [
            ControlCommand::LeanLeft,
            ControlCommand::LeanRight,
            ControlCommand::LeanForward,
            ControlCommand::LeanBackward,
            ControlCommand::Shake,
            ControlCommand::ButtonPressed,
            ControlCommand::ButtonReleased,
            ControlCommand::Neutral,
        ];
        for cmd in commands {
            let tag = cmd.as_str().unwrap();
            assert_eq!(ControlCommand::parse(tag), cmd, "tag {tag}");
        }
    }

    #[test]
    fn parse_is_case_sensitive_like_the_relay() {
        assert_eq!(ControlCommand::parse("leaning left"), ControlCommand::Unrecognized);
        assert_eq!(ControlCommand::parse("SHAKE"), ControlCommand::Unrecognized);
        assert_eq!(ControlCommand::parse(""), ControlCommand::Unrecognized);
    }

    #[test]
    fn only_lean_backward_accelerates() {
        assert!(ControlCommand::LeanBackward.is_accelerated_fall());
        assert!(!ControlCommand::LeanForward.is_accelerated_fall());
        assert!(!ControlCommand::Neutral.is_accelerated_fall());
    }

    #[test]
    fn offset_pivot_kinds() {
        let offset: Vec<_> = PieceKind::ALL
            .iter()
            .filter(|k| k.has_offset_pivot())
            .collect();
        assert_eq!(offset, vec![&PieceKind::I, &PieceKind::O]);
    }

    #[test]
    fn direction_sign() {
        assert_eq!(RotationDirection::Clockwise.sign(), 1);
        assert_eq!(RotationDirection::CounterClockwise.sign(), -1);
    }
}
