//! A single ambient or burst particle: pure data plus its per-frame update.
//!
//! ## Motion model
//!
//! Velocities are expressed in pixels per nominal 16 ms frame, and every
//! update scales them by `delta_ms / 16`, so motion is independent of the
//! actual frame rate.  After integrating, the velocity is multiplied by the
//! damping factor captured at creation, which makes particles drift to a
//! gradual stop.
//!
//! Opacity fades linearly from the creation opacity to zero over the
//! particle's lifespan.

use crate::config::EngineConfig;
use crate::constants::NOMINAL_FRAME_MS;
use crate::surface::RenderSurface;
use crate::theme::ThemeMode;
use bevy::prelude::*;
use rand::Rng;

/// How a particle was admitted.  Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Spawned by the background timer.
    Ambient,
    /// Spawned in response to a pointer click.
    Burst,
}

/// Short-lived visual particle owned by [`crate::pool::ParticlePool`].
#[derive(Debug, Clone)]
pub struct Particle {
    /// Surface-space position (px, y down).
    pub position: Vec2,
    /// Velocity (px per 16 ms frame).
    pub velocity: Vec2,
    /// Radius (px).
    pub size: f32,
    /// Engine timestamp at creation (ms).
    pub birth_ms: f64,
    age_ms: f32,
    lifespan_ms: f32,
    base_opacity: f32,
    opacity: f32,
    kind: ParticleKind,
    damping: f32,
    glow_blur: f32,
    color: Color,
}

impl Particle {
    /// Build a particle at `position` with randomised size, velocity and
    /// opacity inside the configured bounds.
    pub fn create<R: Rng + ?Sized>(
        position: Vec2,
        kind: ParticleKind,
        config: &EngineConfig,
        theme: ThemeMode,
        now_ms: f64,
        rng: &mut R,
    ) -> Self {
        let size_span = config.max_particle_size - config.min_particle_size;
        let size = config.min_particle_size + rng.gen::<f32>() * size_span;

        let speed_span = match kind {
            ParticleKind::Ambient => config.max_speed,
            ParticleKind::Burst => config.max_speed * config.burst_speed_multiplier,
        };
        let velocity = Vec2::new(
            (rng.gen::<f32>() - 0.5) * speed_span,
            (rng.gen::<f32>() - 0.5) * speed_span,
        );

        let opacity = match kind {
            ParticleKind::Ambient => 0.5 + rng.gen::<f32>() * 0.5,
            ParticleKind::Burst => 1.0,
        };
        let lifespan_ms = config.decay_time_ms + rng.gen::<f32>() * config.lifespan_jitter_ms;
        let glow_blur = match kind {
            ParticleKind::Ambient => config.ambient_glow_blur,
            ParticleKind::Burst => config.burst_glow_blur,
        };

        Self {
            position,
            velocity,
            size,
            birth_ms: now_ms,
            age_ms: 0.0,
            lifespan_ms,
            base_opacity: opacity,
            opacity,
            kind,
            damping: config.velocity_damping,
            glow_blur,
            color: theme.particle_color(opacity),
        }
    }

    /// Advance the particle by `delta_ms` and report whether it is still alive.
    ///
    /// Returns `false` once the accumulated age reaches the lifespan; the
    /// pool drops the particle at that point and never draws it again.
    pub fn update(&mut self, delta_ms: f32, theme: ThemeMode) -> bool {
        let delta_ms = delta_ms.max(0.0);
        self.age_ms += delta_ms;

        self.integrate(delta_ms);
        self.velocity *= self.damping;

        let life_fraction = (1.0 - self.age_ms / self.lifespan_ms).max(0.0);
        self.opacity = (self.base_opacity * life_fraction).clamp(0.0, 1.0);
        self.color = theme.particle_color(self.opacity);

        self.age_ms < self.lifespan_ms
    }

    /// Move by the current velocity scaled to `delta_ms`.
    fn integrate(&mut self, delta_ms: f32) {
        self.position += self.velocity * (delta_ms / NOMINAL_FRAME_MS);
    }

    /// Paint the particle.  Burst particles glow wider than ambient ones.
    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.fill_circle(self.position, self.size, self.color, self.glow_blur);
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn is_burst(&self) -> bool {
        self.kind == ParticleKind::Burst
    }

    pub fn age_ms(&self) -> f32 {
        self.age_ms
    }

    pub fn lifespan_ms(&self) -> f32 {
        self.lifespan_ms
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make(kind: ParticleKind, config: &EngineConfig) -> Particle {
        let mut rng = StdRng::seed_from_u64(42);
        Particle::create(
            Vec2::new(100.0, 100.0),
            kind,
            config,
            ThemeMode::Dark,
            0.0,
            &mut rng,
        )
    }

    #[test]
    fn create_respects_configured_bounds() {
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let p = Particle::create(
                Vec2::ZERO,
                ParticleKind::Ambient,
                &config,
                ThemeMode::Light,
                0.0,
                &mut rng,
            );
            assert!(p.size >= config.min_particle_size && p.size < config.max_particle_size);
            assert!(p.velocity.x.abs() <= config.max_speed / 2.0);
            assert!(p.velocity.y.abs() <= config.max_speed / 2.0);
            assert!(p.opacity() >= 0.5 && p.opacity() <= 1.0);
            assert!(p.lifespan_ms() >= config.decay_time_ms);
            assert!(p.lifespan_ms() < config.decay_time_ms + config.lifespan_jitter_ms);
        }
    }

    #[test]
    fn burst_particles_start_opaque_and_faster() {
        let config = EngineConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut fastest = 0.0_f32;
        for _ in 0..200 {
            let p = Particle::create(
                Vec2::ZERO,
                ParticleKind::Burst,
                &config,
                ThemeMode::Dark,
                0.0,
                &mut rng,
            );
            assert_eq!(p.opacity(), 1.0);
            assert!(p.is_burst());
            assert_eq!(p.kind(), ParticleKind::Burst);
            fastest = fastest.max(p.velocity.x.abs());
        }
        assert!(fastest > config.max_speed / 2.0);
        assert!(fastest <= config.max_speed * config.burst_speed_multiplier / 2.0);
    }

    #[test]
    fn opacity_is_non_increasing_until_death() {
        let config = EngineConfig::default();
        let mut p = make(ParticleKind::Ambient, &config);
        let lifespan = p.lifespan_ms();
        let mut previous = p.opacity();
        let mut elapsed = 0.0;
        while elapsed + 16.0 < lifespan {
            assert!(p.update(16.0, ThemeMode::Dark));
            elapsed += 16.0;
            assert!(p.opacity() <= previous);
            assert!((0.0..=1.0).contains(&p.opacity()));
            previous = p.opacity();
        }
        assert!(!p.update(lifespan, ThemeMode::Dark));
        assert_eq!(p.opacity(), 0.0);
    }

    #[test]
    fn lifespan_never_changes() {
        let config = EngineConfig::default();
        let mut p = make(ParticleKind::Burst, &config);
        let lifespan = p.lifespan_ms();
        for _ in 0..10 {
            p.update(100.0, ThemeMode::Light);
        }
        assert_eq!(p.lifespan_ms(), lifespan);
    }

    #[test]
    fn motion_is_frame_rate_independent_without_damping() {
        let config = EngineConfig {
            velocity_damping: 1.0,
            ..Default::default()
        };
        let mut split = make(ParticleKind::Ambient, &config);
        let mut whole = split.clone();

        split.update(7.0, ThemeMode::Dark);
        split.update(25.0, ThemeMode::Dark);
        whole.update(32.0, ThemeMode::Dark);

        assert!((split.position - whole.position).length() < 1e-4);
    }

    #[test]
    fn damping_slows_the_particle() {
        let config = EngineConfig::default();
        let mut p = make(ParticleKind::Burst, &config);
        let initial = p.velocity.length();
        p.update(16.0, ThemeMode::Dark);
        assert!((p.velocity.length() - initial * 0.99).abs() < 1e-5);
    }

    #[test]
    fn theme_is_applied_on_update() {
        let config = EngineConfig::default();
        let mut p = make(ParticleKind::Burst, &config);
        p.update(0.0, ThemeMode::Light);
        let color = p.color().to_srgba();
        assert!((color.red - 103.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn draw_uses_kind_specific_glow() {
        let config = EngineConfig::default();
        let mut surface = RecordingSurface::new();
        make(ParticleKind::Ambient, &config).draw(&mut surface);
        make(ParticleKind::Burst, &config).draw(&mut surface);
        let blurs: Vec<f32> = surface
            .commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Circle { blur, .. } => Some(*blur),
                DrawCommand::Clear(_) => None,
            })
            .collect();
        assert_eq!(blurs, vec![config.ambient_glow_blur, config.burst_glow_blur]);
    }
}
