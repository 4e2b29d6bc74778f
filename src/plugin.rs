//! Bevy host for the particle background.
//!
//! ## Design
//!
//! The engine itself never touches the ECS world.  This plugin owns it as the
//! [`BackgroundEngine`] resource and feeds it from Bevy each frame:
//!
//! | System                           | Schedule | Purpose                                         |
//! |----------------------------------|----------|-------------------------------------------------|
//! | `load_background_settings_system`| Startup  | Apply `assets/particles.toml` and preferences   |
//! | `mount_background_system`        | Startup  | Mount against the primary window, if any        |
//! | `sync_surface_system`            | Update   | Window size → bounds; no window → suspend       |
//! | `sync_motion_preference_system`  | Update   | Platform reduced-motion signal → engine         |
//! | `settings_hotkeys_system`        | Update   | `P` on/off, `M` motion, `T` theme, `=`/`-` cap  |
//! | `click_burst_system`             | Update   | Left click → burst request                      |
//! | `animate_particles_system`       | Update   | Run the outstanding frame through gizmos        |
//! | `sync_clear_color_system`        | Update   | Theme background → `ClearColor`                 |
//!
//! The Update systems are chained so every input lands before the frame that
//! consumes it.

use crate::config::{load_engine_config_or_default, DEFAULT_CONFIG_PATH};
use crate::constants::{SETTINGS_CAPACITY_STEP, SETTINGS_MAX_PARTICLES_RANGE};
use crate::engine::ParticleEngine;
use crate::graphics::GizmoSurface;
use crate::settings::{ParticleSettings, UserPreferences, DEFAULT_PREFERENCES_PATH};
use crate::surface::SurfaceBounds;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use std::path::PathBuf;

// ── Resources ────────────────────────────────────────────────────────────────

/// The single mounted engine instance.
#[derive(Resource, Debug)]
pub struct BackgroundEngine(pub ParticleEngine);

/// Platform-level "prefers reduced motion" signal.
///
/// Hosts update this resource when the platform preference changes; the
/// engine picks the change up before the next frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemMotionPreference {
    pub reduced: bool,
}

/// Where the operator config and visitor preferences live on disk.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct BackgroundPaths {
    pub config: PathBuf,
    pub preferences: PathBuf,
}

impl Default for BackgroundPaths {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            preferences: PathBuf::from(DEFAULT_PREFERENCES_PATH),
        }
    }
}

// ── Plugin ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct ParticlesBackgroundPlugin {
    pub paths: BackgroundPaths,
}

impl Plugin for ParticlesBackgroundPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(BackgroundEngine(ParticleEngine::new(Default::default())))
            .insert_resource(self.paths.clone())
            .init_resource::<SystemMotionPreference>()
            .add_systems(
                Startup,
                (load_background_settings_system, mount_background_system).chain(),
            )
            .add_systems(
                Update,
                (
                    sync_surface_system,
                    sync_motion_preference_system,
                    settings_hotkeys_system,
                    click_burst_system,
                    animate_particles_system,
                    sync_clear_color_system,
                )
                    .chain(),
            );
    }
}

// ── Startup systems ──────────────────────────────────────────────────────────

/// Load the operator config and the visitor's saved preferences.
///
/// Broken files are logged and ignored; the background keeps its defaults.
pub fn load_background_settings_system(
    paths: Res<BackgroundPaths>,
    mut engine: ResMut<BackgroundEngine>,
) {
    let config = load_engine_config_or_default(&paths.config);
    if let Err(err) = engine.0.apply_config(config) {
        warn!("{err}; keeping compiled particle defaults");
    }

    let preferences = UserPreferences::load_or_default(&paths.preferences);
    engine.0.set_user_reduced_motion(preferences.reduce_motion);
    if let Some(theme) = preferences.theme() {
        engine.0.set_theme(theme);
    }
}

/// Mount the engine against the primary window.  Without a window the engine
/// stays suspended until [`sync_surface_system`] sees one.
pub fn mount_background_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    system: Res<SystemMotionPreference>,
    mut engine: ResMut<BackgroundEngine>,
) {
    engine.0.set_system_reduced_motion(system.reduced);
    let bounds = windows
        .single()
        .ok()
        .map(|window| SurfaceBounds::new(window.width(), window.height()));
    engine.0.mount(bounds);
}

// ── Update systems ───────────────────────────────────────────────────────────

/// Track the primary window size; losing the window suspends the engine.
pub fn sync_surface_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut engine: ResMut<BackgroundEngine>,
) {
    match windows.single() {
        Ok(window) => {
            let bounds = SurfaceBounds::new(window.width(), window.height());
            if engine.0.bounds() != Some(bounds) {
                engine.0.attach_surface(bounds);
            }
        }
        Err(_) => {
            if engine.0.bounds().is_some() {
                engine.0.detach_surface();
            }
        }
    }
}

pub fn sync_motion_preference_system(
    system: Res<SystemMotionPreference>,
    mut engine: ResMut<BackgroundEngine>,
) {
    if system.is_changed() {
        engine.0.set_system_reduced_motion(system.reduced);
    }
}

/// Keyboard stand-in for the settings panel.
pub fn settings_hotkeys_system(
    keys: Res<ButtonInput<KeyCode>>,
    paths: Res<BackgroundPaths>,
    mut engine: ResMut<BackgroundEngine>,
) {
    let engine = &mut engine.0;
    let mut settings = ParticleSettings::from_engine(engine);
    let mut settings_changed = false;
    let mut preferences_changed = false;

    if keys.just_pressed(KeyCode::KeyP) {
        settings.set_enabled(!settings.enabled());
        settings_changed = true;
    }
    if keys.just_pressed(KeyCode::KeyM) {
        settings.set_reduce_motion(!settings.reduce_motion());
        settings_changed = true;
        preferences_changed = true;
    }
    if keys.just_pressed(KeyCode::Equal) || keys.just_pressed(KeyCode::Minus) {
        let (min, max) = SETTINGS_MAX_PARTICLES_RANGE;
        let capacity = if keys.just_pressed(KeyCode::Equal) {
            settings.max_particles() + SETTINGS_CAPACITY_STEP
        } else {
            settings.max_particles().saturating_sub(SETTINGS_CAPACITY_STEP)
        };
        match settings.set_max_particles(capacity.clamp(min, max)) {
            Ok(()) => settings_changed = true,
            Err(err) => warn!("{err}"),
        }
    }
    if keys.just_pressed(KeyCode::KeyT) {
        engine.set_theme(engine.theme().toggled());
        preferences_changed = true;
    }

    if settings_changed {
        if let Err(err) = settings.apply(engine) {
            warn!("{err}; settings not applied");
        }
    }
    if preferences_changed {
        let preferences = UserPreferences {
            reduce_motion: engine.policy().user_preference,
            dark_mode: Some(engine.theme().is_dark()),
        };
        if let Err(err) = preferences.save(&paths.preferences) {
            warn!("{err}");
        }
    }
}

/// Turn left clicks inside the primary window into burst requests.
pub fn click_burst_system(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time>,
    mut engine: ResMut<BackgroundEngine>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    if let Some(cursor) = window.cursor_position() {
        let now_ms = time.elapsed_secs_f64() * 1000.0;
        engine.0.on_click(cursor.x, cursor.y, now_ms);
    }
}

/// Run the outstanding frame, or the one-shot clear while suspended.
pub fn animate_particles_system(
    time: Res<Time>,
    mut gizmos: Gizmos,
    mut engine: ResMut<BackgroundEngine>,
) {
    let engine = &mut engine.0;
    let bounds = engine.bounds().unwrap_or(SurfaceBounds::new(0.0, 0.0));
    let mut surface = GizmoSurface::new(&mut gizmos, bounds);

    match engine.pending_frame() {
        Some(handle) => {
            let now_ms = time.elapsed_secs_f64() * 1000.0;
            engine.frame(handle, now_ms, &mut surface);
        }
        None => {
            engine.clear_if_suspended(&mut surface);
        }
    }
}

pub fn sync_clear_color_system(
    engine: Res<BackgroundEngine>,
    clear_color: Option<ResMut<ClearColor>>,
) {
    let Some(mut clear_color) = clear_color else {
        return;
    };
    let background = engine.0.theme().background();
    if clear_color.0 != background {
        clear_color.0 = background;
    }
}
