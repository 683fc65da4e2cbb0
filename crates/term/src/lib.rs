//! Terminal debug view.
//!
//! Draws the playfield, live bursts and the camera roll into a framebuffer and flushes
//! it with `crossterm`. Rendering is split so the view stays pure and testable:
//!
//! - [`game_view`]: grid and effect state to [`FrameBuffer`]
//! - [`renderer`]: [`FrameBuffer`] to the terminal

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tilt_tetris_core as core;
pub use tilt_tetris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{BoardView, HudStatus, LinkStatus, Viewport};
pub use renderer::{changed_rows, encode_changed_rows, TerminalRenderer};
