//! Core piece logic - deterministic, testable, no I/O
//!
//! Everything here runs on the simulation thread except [`mailbox::CommandMailbox`],
//! whose clones may be handed to a listener thread.
//!
//! # Module Structure
//!
//! - [`shapes`]: tetromino cells and wall kick tables
//! - [`piece`]: active piece state and spawn descriptions
//! - [`rotation`]: rotation transform and kick search
//! - [`timers`]: simulation clock plus step/move/lock timers
//! - [`config`]: timing configuration (JSON file and environment)
//! - [`mailbox`]: latest-wins command slot and the [`CommandSource`] seam
//! - [`board`]: the [`Board`] collaborator and the reference [`Grid`]
//! - [`presentation`]: visual cues, camera lean easing and bursts
//! - [`controller`]: the per-tick [`PieceController`]
//! - [`rng`]: 7-bag piece selection used by [`Grid`]
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tilt_tetris_core::{
//!     Board, CommandMailbox, Grid, PieceController, RecordedEffects, SimClock, TimingConfig,
//! };
//!
//! let mut grid = Grid::new(12345);
//! let mut fx = RecordedEffects::default();
//! let mailbox = CommandMailbox::new();
//! let mut controller = PieceController::new(&TimingConfig::default(), mailbox.clone());
//! let mut clock = SimClock::new();
//!
//! controller.initialize(grid.spawn_piece(), clock.now());
//!
//! // Usually sent from the listener thread
//! mailbox.send("Leaning Left");
//! controller.tick(&mut grid, &mut fx, clock.advance(Duration::from_millis(16)));
//!
//! assert_eq!(controller.piece().unwrap().position, (3, 18));
//! ```

pub mod board;
pub mod config;
pub mod controller;
pub mod mailbox;
pub mod piece;
pub mod presentation;
pub mod rng;
pub mod rotation;
pub mod shapes;
pub mod timers;

pub use tilt_tetris_types as types;

pub use board::{Board, Grid};
pub use config::{ConfigError, TimingConfig};
pub use controller::PieceController;
pub use mailbox::{CommandMailbox, CommandSource, ScriptedCommands};
pub use piece::{PieceState, Spawn};
pub use presentation::{CameraLean, EffectState, Presentation, RecordedEffects};
pub use rng::{PieceQueue, SimpleRng};
pub use rotation::{try_rotate, Rotated};
pub use shapes::{shape, PieceShape};
pub use timers::{Frame, SimClock, TimerState};
