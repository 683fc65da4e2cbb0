//! Tilt Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof: `tilt_tetris::{core,adapter,term,input,types}`.
//! The implementation lives in dedicated crates under `crates/`.

pub use tilt_tetris_adapter as adapter;
pub use tilt_tetris_core as core;
pub use tilt_tetris_input as input;
pub use tilt_tetris_term as term;
pub use tilt_tetris_types as types;
