//! Timing configuration
//!
//! Defaults come from `tilt_tetris_types`. A JSON file (see [`TimingConfig::from_json_file`])
//! may override any subset of fields, and `TILT_TETRIS_*_MS` environment variables
//! override both.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{LOCK_DELAY_MS, MOVE_DELAY_MS, STEP_DELAY_MS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid timing config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{name} must be a positive integer number of milliseconds, got {value:?}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    ZeroDelay(&'static str),
}

/// Step, move-repeat and lock delays in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub step_delay_ms: u64,
    pub move_delay_ms: u64,
    pub lock_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: STEP_DELAY_MS,
            move_delay_ms: MOVE_DELAY_MS,
            lock_delay_ms: LOCK_DELAY_MS,
        }
    }
}

impl TimingConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(self.move_delay_ms)
    }

    pub fn lock_delay(&self) -> Duration {
        Duration::from_millis(self.lock_delay_ms)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Load from environment variables.
    ///
    /// `TILT_TETRIS_CONFIG` names an optional JSON file; `TILT_TETRIS_STEP_MS`,
    /// `TILT_TETRIS_MOVE_MS` and `TILT_TETRIS_LOCK_MS` override single fields.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`TimingConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup("TILT_TETRIS_CONFIG") {
            Some(path) if !path.trim().is_empty() => Self::from_json_file(path.trim())?,
            _ => Self::default(),
        };

        let overrides: [(&'static str, &mut u64); 3] = [
            ("TILT_TETRIS_STEP_MS", &mut config.step_delay_ms),
            ("TILT_TETRIS_MOVE_MS", &mut config.move_delay_ms),
            ("TILT_TETRIS_LOCK_MS", &mut config.lock_delay_ms),
        ];
        for (name, field) in overrides {
            if let Some(value) = lookup(name) {
                let parsed: Result<u64, _> = value.trim().parse();
                *field = parsed.map_err(|_| ConfigError::InvalidEnv { name, value })?;
            }
        }

        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.step_delay_ms == 0 {
            return Err(ConfigError::ZeroDelay("step_delay_ms"));
        }
        if self.move_delay_ms == 0 {
            return Err(ConfigError::ZeroDelay("move_delay_ms"));
        }
        if self.lock_delay_ms == 0 {
            return Err(ConfigError::ZeroDelay("lock_delay_ms"));
        }
        Ok(self)
    }
}
