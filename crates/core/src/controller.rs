//! Piece controller - per-tick orchestration of the active piece
//!
//! One [`PieceController::tick`] does, in order:
//!
//! 1. clear the piece's footprint from the board
//! 2. take at most one pending command and dispatch it
//! 3. accumulate lock time
//! 4. when the move deadline has passed, apply continuous input (soft drop)
//! 5. when the step deadline has passed, apply gravity and possibly lock
//! 6. write the (possibly new) piece's footprint back
//!
//! Moves and rotations are validated against the board while the footprint is cleared,
//! so the piece never collides with itself. A failed move or rotation leaves the piece
//! untouched.

use std::time::Duration;

use crate::board::Board;
use crate::config::TimingConfig;
use crate::mailbox::CommandSource;
use crate::piece::{PieceState, Spawn};
use crate::presentation::Presentation;
use crate::rotation::try_rotate;
use crate::timers::{Frame, TimerState};
use crate::types::{ControlCommand, RotationDirection, VisualCue};

/// Controller of the single falling piece
#[derive(Debug, Clone)]
pub struct PieceController<S> {
    timers: TimerState,
    piece: Option<PieceState>,
    input_state: ControlCommand,
    source: S,
    now: Duration,
    pieces_locked: u32,
    pieces_destroyed: u32,
    lines_cleared: u32,
}

impl<S: CommandSource> PieceController<S> {
    /// Controller without an active piece. Call [`PieceController::initialize`] before ticking.
    pub fn new(config: &TimingConfig, source: S) -> Self {
        Self {
            timers: TimerState::new(config),
            piece: None,
            input_state: ControlCommand::Neutral,
            source,
            now: Duration::ZERO,
            pieces_locked: 0,
            pieces_destroyed: 0,
            lines_cleared: 0,
        }
    }

    /// Take control of a freshly spawned piece and restart every timer at `now`.
    ///
    /// The input state survives: a held soft drop keeps applying to the next piece.
    pub fn initialize(&mut self, spawn: Spawn, now: Duration) {
        self.now = now;
        self.piece = Some(PieceState::new(spawn));
        self.timers.reset_all(now);
    }

    /// Advance the piece by one simulation frame
    pub fn tick<B, P>(&mut self, board: &mut B, fx: &mut P, frame: Frame)
    where
        B: Board,
        P: Presentation,
    {
        self.now = frame.now;
        let Some(piece) = self.piece else {
            return;
        };

        board.clear(&piece);

        if let Some(tag) = self.source.take_if_any() {
            if !tag.is_empty() {
                self.apply_command(board, fx, ControlCommand::parse(&tag));
            }
        }

        self.timers.accumulate_lock(frame.delta);

        if self.timers.move_due(self.now) {
            self.handle_continuous_input(board);
        }

        if self.timers.step_due(self.now) {
            self.step(board);
        }

        if let Some(piece) = &self.piece {
            board.set(piece);
        }
    }

    /// Run the action bound to `command` and record it as the current input state.
    ///
    /// Expects the piece's footprint to be cleared from the board, as it is inside a tick.
    pub fn apply_command<B, P>(&mut self, board: &mut B, fx: &mut P, command: ControlCommand)
    where
        B: Board,
        P: Presentation,
    {
        self.input_state = command;

        match command {
            ControlCommand::LeanLeft => {
                self.move_piece(&*board, -1, 0);
                fx.trigger_cue(VisualCue::LeanLeft);
            }
            ControlCommand::LeanRight => {
                self.move_piece(&*board, 1, 0);
                fx.trigger_cue(VisualCue::LeanRight);
            }
            ControlCommand::LeanForward => {
                self.rotate(&*board, RotationDirection::Clockwise);
                fx.trigger_cue(VisualCue::Neutral);
            }
            ControlCommand::LeanBackward => fx.trigger_cue(VisualCue::Neutral),
            ControlCommand::Shake => {
                self.destroy(board, fx);
                fx.trigger_cue(VisualCue::Neutral);
            }
            ControlCommand::ButtonPressed => {
                self.rotate(&*board, RotationDirection::CounterClockwise);
            }
            ControlCommand::Neutral => fx.trigger_cue(VisualCue::Neutral),
            ControlCommand::ButtonReleased | ControlCommand::Unrecognized => {}
        }
    }

    /// Translate the piece by (dx, dy) if the board accepts the new position.
    ///
    /// Success restarts the move deadline and the lock timer. `(0, 0)` always succeeds
    /// without asking the board.
    pub fn move_piece<B: Board>(&mut self, board: &B, dx: i32, dy: i32) -> bool {
        let Some(piece) = self.piece.as_mut() else {
            return false;
        };

        if (dx, dy) != (0, 0) {
            let position = (piece.position.0 + dx, piece.position.1 + dy);
            if !board.is_valid_position(piece, position) {
                return false;
            }
            piece.position = position;
        }

        self.timers.reset_move(self.now);
        self.timers.reset_lock();
        true
    }

    /// Rotate with wall kicks. A committed rotation counts as a successful move.
    pub fn rotate<B: Board>(&mut self, board: &B, direction: RotationDirection) -> bool {
        let Some(piece) = self.piece else {
            return false;
        };

        match try_rotate(&piece, direction, |c| board.is_valid_position(c, c.position)) {
            Some(rotated) => {
                self.piece = Some(rotated.piece);
                self.timers.reset_move(self.now);
                self.timers.reset_lock();
                true
            }
            None => false,
        }
    }

    /// Gravity: restart the step deadline, fall one row, lock once the lock delay is used up
    pub fn step<B: Board>(&mut self, board: &mut B) {
        self.timers.reset_step(self.now);
        self.move_piece(&*board, 0, -1);

        if self.timers.lock_expired() {
            self.lock(board);
        }
    }

    /// Fix the piece to the board, clear lines and take over the next spawn
    pub fn lock<B: Board>(&mut self, board: &mut B) {
        let Some(piece) = self.piece.take() else {
            return;
        };

        board.set(&piece);
        self.lines_cleared += board.clear_lines() as u32;
        self.pieces_locked += 1;

        let spawn = board.spawn_piece();
        self.initialize(spawn, self.now);
    }

    /// Remove the piece without locking it, bursting every cell it occupied
    pub fn destroy<B, P>(&mut self, board: &mut B, fx: &mut P)
    where
        B: Board,
        P: Presentation,
    {
        let Some(piece) = self.piece.take() else {
            return;
        };

        board.clear(&piece);
        for cell in piece.tiles() {
            fx.spawn_burst(board.cell_to_world(cell));
        }

        self.pieces_destroyed += 1;
        let spawn = board.spawn_piece();
        self.initialize(spawn, self.now);
    }

    /// Drop straight down and lock. Returns the number of rows fallen.
    ///
    /// Clears and re-sets the footprint itself, so it may be called between ticks.
    pub fn hard_drop<B: Board>(&mut self, board: &mut B) -> u32 {
        let Some(piece) = self.piece else {
            return 0;
        };

        board.clear(&piece);
        let mut rows = 0;
        while self.move_piece(&*board, 0, -1) {
            rows += 1;
        }
        self.lock(board);

        if let Some(piece) = &self.piece {
            board.set(piece);
        }
        rows
    }

    fn handle_continuous_input<B: Board>(&mut self, board: &mut B) {
        if self.input_state.is_accelerated_fall() {
            self.step(board);
        }
        self.timers.reset_move(self.now);
    }

    pub fn piece(&self) -> Option<&PieceState> {
        self.piece.as_ref()
    }

    pub fn timers(&self) -> &TimerState {
        &self.timers
    }

    /// Last dispatched command
    pub fn input_state(&self) -> ControlCommand {
        self.input_state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    /// Pieces removed by shake
    pub fn pieces_destroyed(&self) -> u32 {
        self.pieces_destroyed
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }
}
