//! Operator settings surface and persisted user preferences.
//!
//! [`ParticleSettings`] is the admin-panel view of the engine: the enable
//! switch, capacity, spawn rate, decay time and the reduced-motion toggle,
//! with the numeric values constrained to the ranges the panel offers.  Applying it goes straight through the running
//! engine (config replacement plus the normal suspend/resume path), so no
//! restart is involved.
//!
//! [`UserPreferences`] is the small TOML file that remembers the visitor's
//! reduced-motion and theme choices between runs.

use crate::constants::{
    SETTINGS_DECAY_SECS_RANGE, SETTINGS_DECAY_STEP_SECS, SETTINGS_MAX_PARTICLES_RANGE,
    SETTINGS_PARTICLES_PER_SECOND_RANGE,
};
use crate::engine::ParticleEngine;
use crate::error::{validate_setting, EngineError, EngineResult};
use crate::theme::ThemeMode;
use bevy::log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default location of the persisted user preferences.
pub const DEFAULT_PREFERENCES_PATH: &str = "preferences.toml";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSettings {
    enabled: bool,
    max_particles: usize,
    particles_per_second: f32,
    decay_time_secs: f32,
    /// Effective reduced-motion state, whoever decided it.
    reduce_motion: bool,
    /// Explicit user choice; `None` leaves the platform signal in charge.
    motion_choice: Option<bool>,
}

impl ParticleSettings {
    /// Snapshot of what the engine currently uses.
    pub fn from_engine(engine: &ParticleEngine) -> Self {
        let config = engine.config();
        let policy = engine.policy();
        Self {
            enabled: config.enabled,
            max_particles: config.max_particles,
            particles_per_second: config.particles_per_second,
            decay_time_secs: config.decay_time_ms / 1000.0,
            reduce_motion: policy.is_reduced(),
            motion_choice: policy.user_preference,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    pub fn particles_per_second(&self) -> f32 {
        self.particles_per_second
    }

    pub fn decay_time_secs(&self) -> f32 {
        self.decay_time_secs
    }

    pub fn reduce_motion(&self) -> bool {
        self.reduce_motion
    }

    pub fn set_max_particles(&mut self, value: usize) -> EngineResult<()> {
        let (min, max) = SETTINGS_MAX_PARTICLES_RANGE;
        validate_setting("max_particles", value as f64, min as f64, max as f64)?;
        self.max_particles = value;
        Ok(())
    }

    pub fn set_particles_per_second(&mut self, value: f32) -> EngineResult<()> {
        let (min, max) = SETTINGS_PARTICLES_PER_SECOND_RANGE;
        validate_setting(
            "particles_per_second",
            f64::from(value),
            f64::from(min),
            f64::from(max),
        )?;
        self.particles_per_second = value;
        Ok(())
    }

    /// Decay in seconds, snapped to the panel's half-second step.
    pub fn set_decay_time_secs(&mut self, value: f32) -> EngineResult<()> {
        let (min, max) = SETTINGS_DECAY_SECS_RANGE;
        validate_setting(
            "decay_time_secs",
            f64::from(value),
            f64::from(min),
            f64::from(max),
        )?;
        self.decay_time_secs = (value / SETTINGS_DECAY_STEP_SECS).round() * SETTINGS_DECAY_STEP_SECS;
        Ok(())
    }

    pub fn set_enabled(&mut self, value: bool) {
        self.enabled = value;
    }

    /// Record an explicit user choice, overriding the platform signal.
    pub fn set_reduce_motion(&mut self, value: bool) {
        self.reduce_motion = value;
        self.motion_choice = Some(value);
    }

    /// Push the settings into the running engine.
    ///
    /// Capacity, rate and decay apply to future admissions and new particles
    /// only.  The enable switch and an explicit reduced-motion choice take
    /// effect immediately through the engine's suspend/resume path; without
    /// a choice the platform signal keeps deciding.
    pub fn apply(&self, engine: &mut ParticleEngine) -> EngineResult<()> {
        let mut config = engine.config().clone();
        config.enabled = self.enabled;
        config.max_particles = self.max_particles;
        config.particles_per_second = self.particles_per_second;
        config.decay_time_ms = self.decay_time_secs * 1000.0;
        engine.apply_config(config)?;
        engine.set_user_reduced_motion(self.motion_choice);
        Ok(())
    }
}

/// Visitor choices remembered between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub reduce_motion: Option<bool>,
    pub dark_mode: Option<bool>,
}

impl UserPreferences {
    /// Read preferences; a missing file yields the empty defaults.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(EngineError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&contents).map_err(|source| EngineError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Same as [`Self::load`], logging and discarding a broken file.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(preferences) => preferences,
            Err(err) => {
                warn!("{err}; ignoring saved preferences");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        let path = path.as_ref();
        let contents = toml::to_string(self)?;
        std::fs::write(path, contents).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Saved preferences to {}", path.display());
        Ok(())
    }

    /// Theme to start with when the visitor has a saved choice.
    pub fn theme(&self) -> Option<ThemeMode> {
        self.dark_mode.map(ThemeMode::from_dark)
    }
}
