//! Timer module - simulation clock and the step/move/lock timers
//!
//! Time never comes from a global clock. The owner of the loop advances a
//! [`SimClock`] and passes the resulting [`Frame`] into every tick, which keeps the
//! step-lock state machine deterministic under test.
//!
//! Deadlines fire when the simulation time is strictly past them. Lock time is an
//! accumulator: it grows every tick and is zeroed by every successful move.

use std::time::Duration;

use crate::config::TimingConfig;

/// Time information handed to a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    /// Simulation time at the end of this tick
    pub now: Duration,
    /// Time elapsed since the previous tick
    pub delta: Duration,
}

/// Monotonic simulation clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimClock {
    now: Duration,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Advance by `delta` and describe the resulting tick
    pub fn advance(&mut self, delta: Duration) -> Frame {
        self.now += delta;
        Frame {
            now: self.now,
            delta,
        }
    }
}

/// Gravity, move-repeat and lock timers of the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    step_delay: Duration,
    move_delay: Duration,
    lock_delay: Duration,
    step_deadline: Duration,
    move_deadline: Duration,
    lock_elapsed: Duration,
}

impl TimerState {
    pub fn new(config: &TimingConfig) -> Self {
        Self {
            step_delay: config.step_delay(),
            move_delay: config.move_delay(),
            lock_delay: config.lock_delay(),
            step_deadline: Duration::ZERO,
            move_deadline: Duration::ZERO,
            lock_elapsed: Duration::ZERO,
        }
    }

    /// Restart every timer relative to `now`
    pub fn reset_all(&mut self, now: Duration) {
        self.reset_step(now);
        self.reset_move(now);
        self.reset_lock();
    }

    pub fn reset_step(&mut self, now: Duration) {
        self.step_deadline = now + self.step_delay;
    }

    pub fn reset_move(&mut self, now: Duration) {
        self.move_deadline = now + self.move_delay;
    }

    pub fn reset_lock(&mut self) {
        self.lock_elapsed = Duration::ZERO;
    }

    pub fn accumulate_lock(&mut self, delta: Duration) {
        self.lock_elapsed += delta;
    }

    pub fn step_due(&self, now: Duration) -> bool {
        now > self.step_deadline
    }

    pub fn move_due(&self, now: Duration) -> bool {
        now > self.move_deadline
    }

    pub fn lock_expired(&self) -> bool {
        self.lock_elapsed >= self.lock_delay
    }

    pub fn step_deadline(&self) -> Duration {
        self.step_deadline
    }

    pub fn move_deadline(&self) -> Duration {
        self.move_deadline
    }

    pub fn lock_elapsed(&self) -> Duration {
        self.lock_elapsed
    }
}
