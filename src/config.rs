//! Runtime engine configuration loaded from `assets/particles.toml`.
//!
//! [`EngineConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_engine_config`] reads the TOML
//! file and overwrites the defaults with any values present in it.  Missing
//! keys fall back to the compile-time defaults, so a minimal TOML can
//! override just the values you care about.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `EngineConfig::default()`.

use crate::constants::*;
use crate::error::{validate_non_negative, validate_positive, EngineError, EngineResult};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default location of the operator configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "assets/particles.toml";

/// Runtime-tunable particle engine configuration.
///
/// Read-only for the lifetime of a mounted engine; the settings surface
/// replaces it wholesale through [`crate::engine::ParticleEngine::apply_config`],
/// which only affects particles created afterwards.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // ── Operator switch ──────────────────────────────────────────────────────
    pub enabled: bool,

    // ── Pool ─────────────────────────────────────────────────────────────────
    pub max_particles: usize,
    pub particles_per_second: f32,

    // ── Lifetime ─────────────────────────────────────────────────────────────
    pub decay_time_ms: f32,
    pub lifespan_jitter_ms: f32,

    // ── Performance ──────────────────────────────────────────────────────────
    pub min_fps: f32,
    pub degrade_threshold: usize,

    // ── Click bursts ─────────────────────────────────────────────────────────
    pub click_burst_cooldown_ms: f32,
    pub click_burst_particles: usize,
    pub click_burst_stagger_ms: f32,

    // ── Particle shape and motion ────────────────────────────────────────────
    pub min_particle_size: f32,
    pub max_particle_size: f32,
    pub max_speed: f32,
    pub burst_speed_multiplier: f32,
    pub velocity_damping: f32,

    // ── Glow ─────────────────────────────────────────────────────────────────
    pub ambient_glow_blur: f32,
    pub burst_glow_blur: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: PARTICLES_ENABLED,
            max_particles: MAX_PARTICLES,
            particles_per_second: PARTICLES_PER_SECOND,
            decay_time_ms: DECAY_TIME_MS,
            lifespan_jitter_ms: LIFESPAN_JITTER_MS,
            min_fps: MIN_FPS,
            degrade_threshold: DEGRADE_THRESHOLD,
            click_burst_cooldown_ms: CLICK_BURST_COOLDOWN_MS,
            click_burst_particles: CLICK_BURST_PARTICLES,
            click_burst_stagger_ms: CLICK_BURST_STAGGER_MS,
            min_particle_size: MIN_PARTICLE_SIZE,
            max_particle_size: MAX_PARTICLE_SIZE,
            max_speed: MAX_SPEED,
            burst_speed_multiplier: BURST_SPEED_MULTIPLIER,
            velocity_damping: VELOCITY_DAMPING,
            ambient_glow_blur: AMBIENT_GLOW_BLUR,
            burst_glow_blur: BURST_GLOW_BLUR,
        }
    }
}

impl EngineConfig {
    /// Milliseconds between two ambient spawns, derived from the spawn rate.
    pub fn spawn_cooldown_ms(&self) -> f32 {
        1000.0 / self.particles_per_second
    }

    /// Reject values that would break pool or lifetime invariants.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_particles == 0 {
            return Err(EngineError::UnsafeConstant {
                name: "max_particles",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        validate_positive("particles_per_second", self.particles_per_second)?;
        validate_positive("decay_time_ms", self.decay_time_ms)?;
        validate_non_negative("lifespan_jitter_ms", self.lifespan_jitter_ms)?;
        validate_non_negative("min_fps", self.min_fps)?;
        validate_non_negative("click_burst_cooldown_ms", self.click_burst_cooldown_ms)?;
        validate_non_negative("click_burst_stagger_ms", self.click_burst_stagger_ms)?;
        validate_positive("min_particle_size", self.min_particle_size)?;
        validate_non_negative("max_speed", self.max_speed)?;
        validate_non_negative("burst_speed_multiplier", self.burst_speed_multiplier)?;
        validate_non_negative("ambient_glow_blur", self.ambient_glow_blur)?;
        validate_non_negative("burst_glow_blur", self.burst_glow_blur)?;
        if self.max_particle_size.is_nan() || self.max_particle_size < self.min_particle_size {
            return Err(EngineError::UnsafeConstant {
                name: "max_particle_size",
                value: f64::from(self.max_particle_size),
                safe_range: "[min_particle_size, ∞)",
            });
        }
        if self.velocity_damping <= 0.0 || !(..=1.0).contains(&self.velocity_damping) {
            return Err(EngineError::UnsafeConstant {
                name: "velocity_damping",
                value: f64::from(self.velocity_damping),
                safe_range: "(0.0, 1.0]",
            });
        }
        Ok(())
    }
}

/// Read and validate an [`EngineConfig`] from a TOML file.
///
/// Keys absent from the file keep their compiled defaults.
pub fn load_engine_config(path: impl AsRef<Path>) -> EngineResult<EngineConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: EngineConfig = toml::from_str(&contents).map_err(|source| EngineError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Load the configuration for the host, falling back to defaults.
///
/// A missing file is expected and logged at `info`; a malformed or unsafe
/// file is logged at `warn`.  Neither stops the background from running.
pub fn load_engine_config_or_default(path: impl AsRef<Path>) -> EngineConfig {
    let path = path.as_ref();
    match load_engine_config(path) {
        Ok(config) => {
            info!("Loaded particle config from {}", path.display());
            config
        }
        Err(EngineError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            info!("No {} found; using compiled defaults", path.display());
            EngineConfig::default()
        }
        Err(err) => {
            warn!("{err}; using compiled particle defaults");
            EngineConfig::default()
        }
    }
}
