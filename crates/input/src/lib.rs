//! Terminal input module - keyboard fallback for the tilt sensor.
//!
//! Maps `crossterm` key events onto the same command vocabulary the gesture relay
//! sends, so key presses travel through the mailbox like sensor input does.

pub mod map;

pub use tilt_tetris_types as types;

pub use map::{handle_key_event, should_quit, KeyAction};
