//! Bounded particle pool: admission, ambient spawning, degradation and the
//! per-frame update/draw sweep.
//!
//! ## Design
//!
//! The pool is the exclusive owner of every live [`Particle`].  Particles are
//! kept in a `VecDeque` in insertion order, so the front is always the oldest
//! entry and both eviction paths are O(1) per removed particle:
//!
//! | Operation          | Removes            | Trigger                                   |
//! |--------------------|--------------------|-------------------------------------------|
//! | `spawn`            | oldest, one by one | pool at `max_particles` on admission      |
//! | `degrade`          | oldest 20%         | measured FPS below `min_fps`              |
//! | `tick`             | expired            | `age >= lifespan` after update            |
//!
//! Every operation receives the current [`EngineConfig`] instead of caching
//! it, so settings changes only affect future admission decisions.

use crate::config::EngineConfig;
use crate::constants::DEGRADE_DIVISOR;
use crate::particle::{Particle, ParticleKind};
use crate::surface::{RenderSurface, SurfaceBounds};
use crate::theme::ThemeMode;
use bevy::log::debug;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;

/// Result of a single admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpawnOutcome {
    /// Oldest particles removed to make room.
    pub evicted: usize,
}

/// Owner of the live-particle collection (front = oldest).
#[derive(Debug)]
pub struct ParticlePool {
    particles: VecDeque<Particle>,
    spawn_timer_ms: f32,
    rng: StdRng,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticlePool {
    /// Pool seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Pool with a deterministic random stream, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            particles: VecDeque::new(),
            spawn_timer_ms: 0.0,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Live particles, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Drop every particle and reset the ambient timer.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.spawn_timer_ms = 0.0;
    }

    /// Admit one particle at `position`, evicting the oldest entries while
    /// the pool is at capacity.
    ///
    /// After this returns, `len() <= config.max_particles`.
    pub fn spawn(
        &mut self,
        position: Vec2,
        kind: ParticleKind,
        config: &EngineConfig,
        theme: ThemeMode,
        now_ms: f64,
    ) -> SpawnOutcome {
        let capacity = config.max_particles.max(1);
        let mut evicted = 0;
        while self.particles.len() >= capacity {
            self.particles.pop_front();
            evicted += 1;
        }
        let particle = Particle::create(position, kind, config, theme, now_ms, &mut self.rng);
        self.particles.push_back(particle);
        debug_assert!(self.particles.len() <= capacity);
        SpawnOutcome { evicted }
    }

    /// Update every particle in insertion order, keep the survivors and draw
    /// them.  Returns how many particles expired.
    ///
    /// The filter is stable: survivors keep their relative order.
    pub fn tick(
        &mut self,
        delta_ms: f32,
        theme: ThemeMode,
        surface: &mut dyn RenderSurface,
    ) -> usize {
        let before = self.particles.len();
        self.particles.retain_mut(|particle| {
            let alive = particle.update(delta_ms, theme);
            if alive {
                particle.draw(&mut *surface);
            }
            alive
        });
        before - self.particles.len()
    }

    /// Drop the oldest `floor(0.2 * len)` particles when the frame rate is
    /// below the configured floor and the pool is denser than the threshold.
    ///
    /// `fps == None` means the rate is unknown and never degrades.  Returns
    /// how many particles were removed.
    pub fn degrade(&mut self, fps: Option<f64>, config: &EngineConfig) -> usize {
        let Some(fps) = fps else {
            return 0;
        };
        if fps >= f64::from(config.min_fps) || self.particles.len() <= config.degrade_threshold {
            return 0;
        }
        let count = self.particles.len() / DEGRADE_DIVISOR;
        self.particles.drain(..count);
        debug!(
            "Degraded particle pool by {count} at {fps:.1} fps ({} left)",
            self.particles.len()
        );
        count
    }

    /// Accumulate `delta_ms` on the ambient timer and, once it passes the
    /// spawn cooldown with room in the pool, spawn one ambient particle at a
    /// random point of `bounds`.
    ///
    /// The timer resets to zero on spawn; overshoot is discarded.
    pub fn advance_ambient(
        &mut self,
        delta_ms: f32,
        bounds: SurfaceBounds,
        config: &EngineConfig,
        theme: ThemeMode,
        now_ms: f64,
    ) -> bool {
        self.spawn_timer_ms += delta_ms.max(0.0);
        if self.spawn_timer_ms <= config.spawn_cooldown_ms()
            || self.particles.len() >= config.max_particles
        {
            return false;
        }
        self.spawn_timer_ms = 0.0;
        let position = bounds.random_point(&mut self.rng);
        self.spawn(position, ParticleKind::Ambient, config, theme, now_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    fn spawn_n(pool: &mut ParticlePool, config: &EngineConfig, n: usize) {
        for i in 0..n {
            pool.spawn(
                Vec2::new(i as f32, 0.0),
                ParticleKind::Ambient,
                config,
                ThemeMode::Light,
                i as f64,
            );
        }
    }

    #[test]
    fn spawn_never_exceeds_capacity() {
        let config = EngineConfig {
            max_particles: 10,
            ..Default::default()
        };
        let mut pool = ParticlePool::with_seed(1);
        for i in 0..50 {
            let outcome = pool.spawn(Vec2::ZERO, ParticleKind::Burst, &config, ThemeMode::Dark, 0.0);
            assert!(pool.len() <= 10);
            assert_eq!(outcome.evicted, usize::from(i >= 10));
        }
    }

    #[test]
    fn lowered_capacity_is_enforced_on_next_admission() {
        let mut config = EngineConfig::default();
        let mut pool = ParticlePool::with_seed(2);
        spawn_n(&mut pool, &config, 100);

        config.max_particles = 60;
        assert_eq!(pool.len(), 100);
        let outcome = pool.spawn(Vec2::ZERO, ParticleKind::Ambient, &config, ThemeMode::Light, 0.0);
        assert_eq!(outcome.evicted, 41);
        assert_eq!(pool.len(), 60);
    }

    #[test]
    fn degrade_drops_oldest_fifth() {
        let config = EngineConfig::default();
        let mut pool = ParticlePool::with_seed(3);
        spawn_n(&mut pool, &config, 150);

        let removed = pool.degrade(Some(30.0), &config);
        assert_eq!(removed, 30);
        assert_eq!(pool.len(), 120);
        assert_eq!(pool.iter().next().map(|p| p.position.x), Some(30.0));
    }

    #[test]
    fn degrade_skips_unknown_rate_small_pools_and_healthy_fps() {
        let config = EngineConfig::default();
        let mut pool = ParticlePool::with_seed(4);
        spawn_n(&mut pool, &config, 50);
        assert_eq!(pool.degrade(Some(10.0), &config), 0);

        spawn_n(&mut pool, &config, 50);
        assert_eq!(pool.degrade(None, &config), 0);
        assert_eq!(pool.degrade(Some(60.0), &config), 0);
        assert_eq!(pool.degrade(Some(45.0), &config), 0);
        assert_eq!(pool.len(), 100);
    }

    #[test]
    fn tick_draws_survivors_and_drops_expired() {
        let config = EngineConfig::default();
        let mut pool = ParticlePool::with_seed(5);
        spawn_n(&mut pool, &config, 5);

        let mut surface = RecordingSurface::new();
        assert_eq!(pool.tick(16.0, ThemeMode::Light, &mut surface), 0);
        assert_eq!(surface.commands.len(), 5);

        surface.reset();
        let longest = config.decay_time_ms + config.lifespan_jitter_ms;
        assert_eq!(pool.tick(longest, ThemeMode::Light, &mut surface), 5);
        assert!(pool.is_empty());
        assert!(surface.commands.is_empty());
    }

    #[test]
    fn tick_keeps_survivor_order() {
        let config = EngineConfig::default();
        let mut pool = ParticlePool::with_seed(6);
        spawn_n(&mut pool, &config, 3);
        let longest = config.decay_time_ms + config.lifespan_jitter_ms;
        pool.tick(longest, ThemeMode::Dark, &mut RecordingSurface::new());
        spawn_n(&mut pool, &config, 4);

        let mut surface = RecordingSurface::new();
        assert_eq!(pool.tick(16.0, ThemeMode::Dark, &mut surface), 0);
        let births: Vec<f64> = pool.iter().map(|p| p.birth_ms).collect();
        assert_eq!(births, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn ambient_spawns_after_cooldown_and_discards_overshoot() {
        let config = EngineConfig::default();
        let bounds = SurfaceBounds::new(800.0, 600.0);
        let mut pool = ParticlePool::with_seed(7);

        assert!(!pool.advance_ambient(30.0, bounds, &config, ThemeMode::Dark, 0.0));
        assert!(!pool.advance_ambient(20.0, bounds, &config, ThemeMode::Dark, 0.0));
        assert!(pool.advance_ambient(5.0, bounds, &config, ThemeMode::Dark, 0.0));
        assert_eq!(pool.len(), 1);
        assert!(bounds.contains(pool.iter().next().map(|p| p.position).unwrap_or_default()));

        // A single long frame still yields exactly one particle.
        assert!(pool.advance_ambient(500.0, bounds, &config, ThemeMode::Dark, 0.0));
        assert_eq!(pool.len(), 2);
        assert!(!pool.advance_ambient(1.0, bounds, &config, ThemeMode::Dark, 0.0));
    }

    #[test]
    fn ambient_waits_while_pool_is_full() {
        let config = EngineConfig {
            max_particles: 3,
            ..Default::default()
        };
        let bounds = SurfaceBounds::new(100.0, 100.0);
        let mut pool = ParticlePool::with_seed(8);
        spawn_n(&mut pool, &config, 3);
        assert!(!pool.advance_ambient(100.0, bounds, &config, ThemeMode::Dark, 0.0));
        assert_eq!(pool.len(), 3);
    }
}
