//! Centralised particle engine constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place.  [`crate::config::EngineConfig::default`] reads
//! every value from this module; `assets/particles.toml` can override any of
//! them at startup.
//!
//! ## Tuning guidance
//!
//! Times are in milliseconds, distances in surface pixels, speeds in pixels
//! per nominal 16 ms frame.

// ── Operator switch ───────────────────────────────────────────────────────────

/// Whether the background animates at all.  Turning it off suspends the
/// engine exactly like reduced motion does.
pub const PARTICLES_ENABLED: bool = true;

// ── Pool ──────────────────────────────────────────────────────────────────────

/// Hard ceiling on live particles.
///
/// Admission evicts the oldest particle once this is reached, so the pool
/// never grows past it.  Steady state with the default spawn rate and decay
/// sits around 110 particles, leaving headroom for click bursts.
pub const MAX_PARTICLES: usize = 150;

/// Ambient particles spawned per second.  The spawn cooldown is derived as
/// `1000 / PARTICLES_PER_SECOND` milliseconds.
pub const PARTICLES_PER_SECOND: f32 = 20.0;

// ── Lifetime ──────────────────────────────────────────────────────────────────

/// Base lifespan of every particle.
pub const DECAY_TIME_MS: f32 = 5000.0;

/// Upper bound of the uniform random jitter added to [`DECAY_TIME_MS`].
pub const LIFESPAN_JITTER_MS: f32 = 1000.0;

// ── Performance ───────────────────────────────────────────────────────────────

/// Measured frame rate below which the pool is degraded.
pub const MIN_FPS: f32 = 45.0;

/// Degradation is skipped while the pool holds this many particles or fewer.
pub const DEGRADE_THRESHOLD: usize = 50;

/// Fraction of the pool dropped by one degradation step, expressed as a
/// divisor: `len / DEGRADE_DIVISOR` equals `floor(0.2 * len)`.
pub const DEGRADE_DIVISOR: usize = 5;

// ── Click bursts ──────────────────────────────────────────────────────────────

/// Minimum gap between two accepted clicks.
pub const CLICK_BURST_COOLDOWN_MS: f32 = 300.0;

/// Particles queued per accepted click.
pub const CLICK_BURST_PARTICLES: usize = 5;

/// Delay between consecutive spawns of one burst.
pub const CLICK_BURST_STAGGER_MS: f32 = 30.0;

// ── Particle shape and motion ─────────────────────────────────────────────────

/// Smallest particle radius.
pub const MIN_PARTICLE_SIZE: f32 = 2.0;

/// Largest particle radius (exclusive).
pub const MAX_PARTICLE_SIZE: f32 = 4.0;

/// Span of each ambient velocity axis; each axis is drawn from
/// `[-MAX_SPEED / 2, MAX_SPEED / 2)`.
pub const MAX_SPEED: f32 = 2.0;

/// Burst particles use `MAX_SPEED * BURST_SPEED_MULTIPLIER` as their span.
pub const BURST_SPEED_MULTIPLIER: f32 = 2.0;

/// Per-update velocity multiplier.  Below 1.0 particles drift to a stop.
pub const VELOCITY_DAMPING: f32 = 0.99;

/// Nominal frame length that velocities are expressed against.
pub const NOMINAL_FRAME_MS: f32 = 16.0;

// ── Glow ──────────────────────────────────────────────────────────────────────

/// Glow radius drawn around ambient particles.
pub const AMBIENT_GLOW_BLUR: f32 = 10.0;

/// Glow radius drawn around burst particles.
pub const BURST_GLOW_BLUR: f32 = 20.0;

// ── Settings panel ranges ─────────────────────────────────────────────────────

/// Capacity range offered by the settings surface.
pub const SETTINGS_MAX_PARTICLES_RANGE: (usize, usize) = (50, 300);

/// Spawn-rate range offered by the settings surface.
pub const SETTINGS_PARTICLES_PER_SECOND_RANGE: (f32, f32) = (5.0, 50.0);

/// Decay range (seconds) offered by the settings surface.
pub const SETTINGS_DECAY_SECS_RANGE: (f32, f32) = (3.0, 10.0);

/// Decay slider granularity (seconds).
pub const SETTINGS_DECAY_STEP_SECS: f32 = 0.5;

/// Capacity change applied by one press of the capacity hotkeys.
pub const SETTINGS_CAPACITY_STEP: usize = 10;
