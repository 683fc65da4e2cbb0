//! Presentation module - visual cues and destroy bursts
//!
//! The controller never renders anything. It reports cues and burst positions to a
//! [`Presentation`] implementation; [`EffectState`] is the one the game binary uses,
//! easing a camera roll toward the cue's target and aging bursts out after one second.

use std::time::Duration;

use crate::types::VisualCue;

/// Roll target for a left lean, in degrees
pub const LEAN_LEFT_ROLL: f32 = -10.0;
/// Roll target for a right lean, in degrees
pub const LEAN_RIGHT_ROLL: f32 = 10.0;
/// Fraction of the remaining roll covered per second
pub const LEAN_EASE_RATE: f32 = 2.0;
/// How long a destroy burst stays visible
pub const BURST_LIFETIME: Duration = Duration::from_secs(1);

/// Presentation side effects requested by the piece controller
pub trait Presentation {
    fn trigger_cue(&mut self, cue: VisualCue);

    /// Spawn a burst at a world position (a cell centre)
    fn spawn_burst(&mut self, world: (f32, f32));
}

/// Camera roll eased toward the last cue
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraLean {
    roll: f32,
    target: f32,
}

impl CameraLean {
    pub fn set_cue(&mut self, cue: VisualCue) {
        self.target = match cue {
            VisualCue::LeanLeft => LEAN_LEFT_ROLL,
            VisualCue::LeanRight => LEAN_RIGHT_ROLL,
            VisualCue::Neutral => 0.0,
        };
    }

    pub fn update(&mut self, delta: Duration) {
        let t = (delta.as_secs_f32() * LEAN_EASE_RATE).clamp(0.0, 1.0);
        self.roll += (self.target - self.roll) * t;
    }

    pub fn roll(&self) -> f32 {
        self.roll
    }

    pub fn target(&self) -> f32 {
        self.target
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub world: (f32, f32),
    pub remaining: Duration,
}

/// Camera lean plus live bursts
#[derive(Debug, Clone, Default)]
pub struct EffectState {
    lean: CameraLean,
    bursts: Vec<Burst>,
}

impl EffectState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance easing and burst lifetimes by one frame
    pub fn update(&mut self, delta: Duration) {
        self.lean.update(delta);
        for burst in &mut self.bursts {
            burst.remaining = burst.remaining.saturating_sub(delta);
        }
        self.bursts.retain(|b| !b.remaining.is_zero());
    }

    pub fn lean(&self) -> &CameraLean {
        &self.lean
    }

    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }
}

impl Presentation for EffectState {
    fn trigger_cue(&mut self, cue: VisualCue) {
        self.lean.set_cue(cue);
    }

    fn spawn_burst(&mut self, world: (f32, f32)) {
        self.bursts.push(Burst {
            world,
            remaining: BURST_LIFETIME,
        });
    }
}

/// Records every call, for tests and headless runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedEffects {
    pub cues: Vec<VisualCue>,
    pub bursts: Vec<(f32, f32)>,
}

impl Presentation for RecordedEffects {
    fn trigger_cue(&mut self, cue: VisualCue) {
        self.cues.push(cue);
    }

    fn spawn_burst(&mut self, world: (f32, f32)) {
        self.bursts.push(world);
    }
}
