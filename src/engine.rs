//! The particle background engine: one mounted instance composing the pool,
//! the frame driver, the click controller and the motion policy.
//!
//! ## Frame order
//!
//! | Step | Action                                              |
//! |------|-----------------------------------------------------|
//! | 1    | clear the surface                                   |
//! | 2    | degrade the pool if the measured FPS is too low     |
//! | 3    | spawn burst particles whose stagger delay elapsed   |
//! | 4    | ambient admission                                   |
//! | 5    | update + draw every live particle (new ones too)    |
//! | 6    | request the next frame unless motion is now off     |
//!
//! The engine runs only while it is mounted and enabled, has a surface and
//! the motion policy allows animation.  Any other combination is Suspended: no frame is
//! outstanding, the pool is empty and the surface is cleared once.

use crate::config::EngineConfig;
use crate::driver::{DriverState, FrameDriver, FrameHandle, FrameTiming};
use crate::error::EngineResult;
use crate::input::BurstController;
use crate::motion::MotionPolicy;
use crate::particle::ParticleKind;
use crate::pool::ParticlePool;
use crate::surface::{RenderSurface, SurfaceBounds};
use crate::theme::ThemeMode;
use bevy::log::info;
use bevy::prelude::*;

/// Cumulative counters since the engine was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub frames: u64,
    pub ambient_spawned: u64,
    pub burst_spawned: u64,
    pub evicted: u64,
    pub expired: u64,
    pub degraded: u64,
    pub clicks_accepted: u64,
    pub clicks_dropped: u64,
}

/// What a single frame did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub timing: FrameTiming,
    pub degraded: usize,
    pub burst_spawned: usize,
    pub ambient_spawned: bool,
    pub expired: usize,
    pub live: usize,
}

#[derive(Debug)]
pub struct ParticleEngine {
    config: EngineConfig,
    theme: ThemeMode,
    policy: MotionPolicy,
    bounds: Option<SurfaceBounds>,
    mounted: bool,
    pool: ParticlePool,
    driver: FrameDriver,
    bursts: BurstController,
    stats: EngineStats,
}

impl ParticleEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_pool(config, ParticlePool::new())
    }

    /// Engine with a deterministic random stream.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self::with_pool(config, ParticlePool::with_seed(seed))
    }

    fn with_pool(config: EngineConfig, pool: ParticlePool) -> Self {
        Self {
            config,
            theme: ThemeMode::default(),
            policy: MotionPolicy::default(),
            bounds: None,
            mounted: false,
            pool,
            driver: FrameDriver::new(),
            bursts: BurstController::new(),
            stats: EngineStats::default(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn policy(&self) -> MotionPolicy {
        self.policy
    }

    pub fn bounds(&self) -> Option<SurfaceBounds> {
        self.bounds
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn state(&self) -> DriverState {
        self.driver.state()
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn pending_bursts(&self) -> usize {
        self.bursts.pending_len()
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Mount the engine.  `None` means the surface is not available yet; the
    /// engine then stays suspended until [`Self::attach_surface`].
    pub fn mount(&mut self, bounds: Option<SurfaceBounds>) {
        self.mounted = true;
        self.bounds = bounds;
        self.refresh();
    }

    /// Cancel the outstanding frame and drop every particle.  Idempotent.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.refresh();
    }

    pub fn attach_surface(&mut self, bounds: SurfaceBounds) {
        self.bounds = Some(bounds);
        self.refresh();
    }

    pub fn detach_surface(&mut self) {
        self.bounds = None;
        self.refresh();
    }

    /// Update the surface geometry.  Live particles are left untouched; only
    /// future ambient spawns and clears use the new bounds.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.attach_surface(SurfaceBounds::new(width, height));
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
    }

    /// Platform reduced-motion notification.
    pub fn set_system_reduced_motion(&mut self, reduced: bool) {
        self.policy.system_prefers_reduced = reduced;
        self.refresh();
    }

    /// User reduced-motion choice; `None` defers to the platform.
    pub fn set_user_reduced_motion(&mut self, preference: Option<bool>) {
        self.policy.user_preference = preference;
        self.refresh();
    }

    /// Replace the configuration.  Live particles keep the parameters they
    /// were created with; admission and new particles use the new values.
    /// Flipping `enabled` suspends or resumes like a motion change.
    pub fn apply_config(&mut self, config: EngineConfig) -> EngineResult<()> {
        config.validate()?;
        if config != self.config {
            info!(
                "Particle config updated: enabled {}, capacity {}, {}/s, decay {} ms",
                config.enabled,
                config.max_particles,
                config.particles_per_second,
                config.decay_time_ms
            );
        }
        self.config = config;
        self.refresh();
        Ok(())
    }

    fn should_run(&self) -> bool {
        self.mounted
            && self.config.enabled
            && self.bounds.is_some()
            && self.policy.allows_motion()
    }

    /// Reconcile the driver state with mount/surface/policy.
    fn refresh(&mut self) {
        match (self.should_run(), self.driver.is_running()) {
            (true, false) => {
                self.pool.clear();
                self.bursts.clear();
                self.driver.start();
                info!("Particle background running");
            }
            (false, true) => {
                self.release();
                info!("Particle background suspended");
            }
            (false, false) => self.release(),
            (true, true) => {}
        }
    }

    fn release(&mut self) {
        self.driver.suspend();
        self.pool.clear();
        self.bursts.clear();
    }

    // ── Input ────────────────────────────────────────────────────────────────

    /// Pointer click in surface coordinates.  Returns whether a burst was
    /// queued; clicks during cooldown or while suspended are dropped.
    pub fn on_click(&mut self, x: f32, y: f32, now_ms: f64) -> bool {
        let motion_allowed = self.should_run();
        let accepted = self
            .bursts
            .on_click(Vec2::new(x, y), now_ms, motion_allowed, &self.config);
        if accepted {
            self.stats.clicks_accepted += 1;
        } else {
            self.stats.clicks_dropped += 1;
        }
        accepted
    }

    // ── Frames ───────────────────────────────────────────────────────────────

    /// The frame the host should run next, if the engine is running.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.driver.pending_frame()
    }

    /// Run the frame identified by `handle` at `timestamp` (ms, monotonic).
    ///
    /// Returns `None` without touching anything when the handle is stale or
    /// cancelled.
    pub fn frame(
        &mut self,
        handle: FrameHandle,
        timestamp: f64,
        surface: &mut dyn RenderSurface,
    ) -> Option<FrameReport> {
        let bounds = self.bounds?;
        let timing = self.driver.begin_frame(handle, timestamp)?;
        let delta_ms = timing.delta_ms as f32;

        surface.clear(bounds);

        let degraded = self.pool.degrade(timing.fps, &self.config);

        let mut burst_spawned = 0;
        while let Some(position) = self.bursts.pop_due(timestamp) {
            let outcome = self.pool.spawn(
                position,
                ParticleKind::Burst,
                &self.config,
                self.theme,
                timestamp,
            );
            self.stats.evicted += outcome.evicted as u64;
            burst_spawned += 1;
        }

        let ambient_spawned =
            self.pool
                .advance_ambient(delta_ms, bounds, &self.config, self.theme, timestamp);

        let expired = self.pool.tick(delta_ms, self.theme, surface);

        self.driver.finish_frame(timestamp, self.should_run());

        self.stats.frames += 1;
        self.stats.degraded += degraded as u64;
        self.stats.burst_spawned += burst_spawned as u64;
        self.stats.ambient_spawned += u64::from(ambient_spawned);
        self.stats.expired += expired as u64;

        Some(FrameReport {
            timing,
            degraded,
            burst_spawned,
            ambient_spawned,
            expired,
            live: self.pool.len(),
        })
    }

    /// Perform the single clear owed after a suspension.  Returns whether the
    /// surface was cleared.
    pub fn clear_if_suspended(&mut self, surface: &mut dyn RenderSurface) -> bool {
        if !self.driver.take_clear_request() {
            return false;
        }
        match self.bounds {
            Some(bounds) => {
                surface.clear(bounds);
                true
            }
            None => false,
        }
    }
}
