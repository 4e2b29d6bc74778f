use bevy::prelude::*;
use bevy::window::WindowResolution;
use nawi_particles::graphics;
use nawi_particles::plugin::{ParticlesBackgroundPlugin, SystemMotionPreference};
use std::env;

/// Platform reduced-motion signal.  Desktop platforms expose no portable
/// query, so the host takes it from `REDUCE_MOTION` (`1`, `true` or `reduce`).
fn system_prefers_reduced_motion() -> bool {
    env::var("REDUCE_MOTION")
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "reduce"))
        .unwrap_or(false)
}

fn main() {
    let reduced = system_prefers_reduced_motion();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Nawi Studio".into(),
                resolution: WindowResolution::new(1200, 680),
                ..Default::default()
            }),
            ..Default::default()
        }))
        // Inserted before the plugin so `init_resource` keeps this value.
        .insert_resource(SystemMotionPreference { reduced })
        .add_plugins(ParticlesBackgroundPlugin::default())
        .add_systems(Startup, graphics::setup_camera)
        .run();
}
