//! Adapter module - the gesture command stream over TCP
//!
//! Both ends of the sensor link live here:
//!
//! - [`relay`]: the sensor-side server. It receives classified gesture states, debounces
//!   them and broadcasts each one as a text line to every connected game.
//! - [`listener`]: the game-side client. It connects once to the relay and drops every
//!   non-empty line into the core's latest-wins [`CommandMailbox`](crate::core::CommandMailbox).
//!
//! # Protocol
//!
//! Newline-terminated UTF-8 text, one state per line, no handshake:
//!
//! ```text
//! Leaning Left
//! Leaning Right
//! Leaning Forward
//! Leaning Backward
//! shake
//! Button Pressed
//! Button Released
//! Neutral
//! ```
//!
//! Unknown lines are delivered anyway; the piece controller ignores them.
//!
//! # Environment Variables
//!
//! - `TILT_TETRIS_HOST` / `TILT_TETRIS_PORT`: relay endpoint the game connects to
//!   (default: 127.0.0.1:65432)
//! - `TILT_TETRIS_LISTENER_DISABLED`: set to "1" or "true" to run without the listener
//! - `TILT_RELAY_HOST` / `TILT_RELAY_PORT`: relay bind address (same defaults)
//!
//! # Testing
//!
//! Stand in for the relay with netcat and type states by hand:
//!
//! ```bash
//! nc -l 127.0.0.1 65432
//! Leaning Left
//! shake
//! ```

pub mod listener;
pub mod relay;

pub use tilt_tetris_core as core;
pub use tilt_tetris_types as types;

pub use listener::{run_listener, CommandListener, ListenerConfig, ListenerExit};
pub use relay::{run_relay, RelayConfig, RelayServer, StateRouter};
