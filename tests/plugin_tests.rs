//! Headless tests for the Bevy host systems.
//!
//! These tests use [`MinimalPlugins`]: no window, no rendering, no gizmos.
//! Systems that need a window or gizmos are exercised through the engine
//! tests instead.
//!
//! Covered scenarios:
//! 1. The platform reduced-motion resource suspends and resumes the engine.
//! 2. No primary window detaches the surface and suspends silently.
//! 3. The `M` and `T` hotkeys toggle motion and theme and persist both.
//!    `P` switches the background off; capacity keys leave motion alone.
//! 4. Startup loading applies the operator config and saved preferences.

use bevy::prelude::*;
use nawi_particles::config::EngineConfig;
use nawi_particles::engine::ParticleEngine;
use nawi_particles::plugin::{
    load_background_settings_system, settings_hotkeys_system, sync_motion_preference_system,
    sync_surface_system, BackgroundEngine, BackgroundPaths, SystemMotionPreference,
};
use nawi_particles::settings::UserPreferences;
use nawi_particles::surface::SurfaceBounds;
use nawi_particles::theme::ThemeMode;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Minimal app holding a mounted engine and temp-dir backed paths.
fn app_with_engine(dir: &tempfile::TempDir) -> App {
    let mut engine = ParticleEngine::with_seed(EngineConfig::default(), 77);
    engine.mount(Some(SurfaceBounds::new(800.0, 600.0)));

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(BackgroundEngine(engine));
    app.insert_resource(SystemMotionPreference::default());
    app.insert_resource(BackgroundPaths {
        config: dir.path().join("particles.toml"),
        preferences: dir.path().join("preferences.toml"),
    });
    app
}

fn engine(app: &App) -> &ParticleEngine {
    &app.world().resource::<BackgroundEngine>().0
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn platform_signal_suspends_and_resumes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut app = app_with_engine(&dir);
    app.add_systems(Update, sync_motion_preference_system);

    app.update();
    assert!(engine(&app).is_running());

    app.world_mut()
        .resource_mut::<SystemMotionPreference>()
        .reduced = true;
    app.update();
    assert!(!engine(&app).is_running());
    assert!(engine(&app).pool().is_empty());

    app.world_mut()
        .resource_mut::<SystemMotionPreference>()
        .reduced = false;
    app.update();
    assert!(engine(&app).is_running());
}

#[test]
fn missing_window_suspends_silently() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut app = app_with_engine(&dir);
    app.add_systems(Update, sync_surface_system);

    app.update();
    assert_eq!(engine(&app).bounds(), None);
    assert!(!engine(&app).is_running());
    assert!(engine(&app).pending_frame().is_none());
}

#[test]
fn hotkeys_toggle_motion_and_theme_and_persist() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut app = app_with_engine(&dir);
    let mut keys = ButtonInput::<KeyCode>::default();
    keys.press(KeyCode::KeyM);
    keys.press(KeyCode::KeyT);
    app.insert_resource(keys);
    app.add_systems(Update, settings_hotkeys_system);

    app.update();

    let engine = engine(&app);
    assert!(!engine.is_running());
    assert_eq!(engine.policy().user_preference, Some(true));
    assert_eq!(engine.theme(), ThemeMode::Dark);

    let saved = UserPreferences::load(dir.path().join("preferences.toml")).expect("saved");
    assert_eq!(saved.reduce_motion, Some(true));
    assert_eq!(saved.dark_mode, Some(true));
}

#[test]
fn capacity_hotkey_stays_within_panel_range() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut app = app_with_engine(&dir);
    let mut keys = ButtonInput::<KeyCode>::default();
    keys.press(KeyCode::Equal);
    app.insert_resource(keys);
    app.add_systems(Update, settings_hotkeys_system);

    app.update();
    assert_eq!(engine(&app).config().max_particles, 160);
    assert!(engine(&app).is_running());
    assert_eq!(engine(&app).policy().user_preference, None);
}

#[test]
fn power_hotkey_disables_the_background() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut app = app_with_engine(&dir);
    let mut keys = ButtonInput::<KeyCode>::default();
    keys.press(KeyCode::KeyP);
    app.insert_resource(keys);
    app.add_systems(Update, settings_hotkeys_system);

    app.update();
    assert!(!engine(&app).config().enabled);
    assert!(!engine(&app).is_running());
    assert!(engine(&app).pool().is_empty());
}

#[test]
fn startup_loading_applies_config_and_preferences() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("particles.toml"), "max_particles = 90\n").expect("write");
    UserPreferences {
        reduce_motion: Some(false),
        dark_mode: Some(true),
    }
    .save(dir.path().join("preferences.toml"))
    .expect("save");

    let mut app = app_with_engine(&dir);
    app.add_systems(Startup, load_background_settings_system);
    app.update();

    let engine = engine(&app);
    assert_eq!(engine.config().max_particles, 90);
    assert_eq!(engine.theme(), ThemeMode::Dark);
    assert_eq!(engine.policy().user_preference, Some(false));
    assert!(engine.is_running());
}
