//! Ambient particle background engine
//!
//! A bounded, frame-rate-adaptive particle layer that drifts behind page
//! content and erupts into short bursts on click.  The engine core
//! ([`engine::ParticleEngine`]) is plain Rust; [`plugin::ParticlesBackgroundPlugin`]
//! hosts it inside a Bevy app.

pub mod config;
pub mod constants;
pub mod driver;
pub mod engine;
pub mod error;
pub mod graphics;
pub mod input;
pub mod motion;
pub mod particle;
pub mod plugin;
pub mod pool;
pub mod settings;
pub mod surface;
pub mod theme;
