//! Runtime configuration
//!
//! Every field has a default matching the stock behaviour (10 particles per
//! touch, speeds in [-0.01, 0.01], sizes in [5, 20), 0.99 decay, culled
//! below 1.0), so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors raised while loading or validating a [`SparksConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Rendering cadence policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Draw on every display refresh
    #[default]
    Continuously,
    /// Draw only when a render has been explicitly requested
    WhenDirty,
}

impl RenderMode {
    pub const ALL: &'static [RenderMode] = &[RenderMode::Continuously, RenderMode::WhenDirty];

    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Continuously => "Continuous",
            RenderMode::WhenDirty => "On demand",
        }
    }
}

/// Initial-state distribution for freshly spawned particles
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnParams {
    /// Particles added per touch event
    pub per_touch: usize,
    /// Velocity components are drawn from [-max_speed, max_speed]
    pub max_speed: f32,
    /// Sizes are drawn from [min_size, max_size)
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            per_touch: 10,
            max_speed: 0.01,
            min_size: 5.0,
            max_size: 20.0,
        }
    }
}

/// Per-frame physics constants
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Multiplicative size factor applied once per frame
    pub decay: f32,
    /// Particles smaller than this are culled
    pub cull_size: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            decay: 0.99,
            cull_size: 1.0,
        }
    }
}

/// Settings for the headless CLI driver
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    /// Simulated surface size in pixels
    pub surface_width: u32,
    pub surface_height: u32,
    /// Frame tick rate
    pub frames_per_second: u32,
    /// Interval between synthetic touch events
    pub touch_interval_ms: u64,
    /// Stop after this many seconds (runs until Ctrl-C when unset)
    pub duration_secs: Option<u64>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            surface_width: 1080,
            surface_height: 1920,
            frames_per_second: 60,
            touch_interval_ms: 50,
            duration_secs: None,
        }
    }
}

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparksConfig {
    pub spawn: SpawnParams,
    pub physics: PhysicsParams,
    pub render_mode: RenderMode,
    pub headless: HeadlessConfig,
}

impl SparksConfig {
    /// Parse and validate a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SparksConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let spawn = &self.spawn;
        if !(spawn.max_speed >= 0.0 && spawn.max_speed.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "spawn.max_speed must be a non-negative number, got {}",
                spawn.max_speed
            )));
        }
        if !(spawn.min_size > 0.0 && spawn.min_size < spawn.max_size && spawn.max_size.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "spawn size range [{}, {}) must be positive and non-empty",
                spawn.min_size, spawn.max_size
            )));
        }
        let physics = &self.physics;
        if !(physics.decay > 0.0 && physics.decay <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "physics.decay must be in (0, 1], got {}",
                physics.decay
            )));
        }
        if !(physics.cull_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "physics.cull_size must be positive, got {}",
                physics.cull_size
            )));
        }
        if self.headless.frames_per_second == 0 {
            return Err(ConfigError::Invalid("headless.frames_per_second must be non-zero".into()));
        }
        Ok(())
    }
}
