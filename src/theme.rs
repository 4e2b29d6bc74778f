//! Light/dark theme signal consumed by the particle engine.
//!
//! The engine never reads a global theme flag: the host passes the current
//! [`ThemeMode`] in, and particles receive it on creation and on every update.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Site colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Particle palette entry (sRGB bytes).
    ///
    /// Dark mode uses a light sky-blue so particles read against the navy
    /// background; light mode uses the brand sky-blue.
    pub fn particle_rgb(self) -> (u8, u8, u8) {
        match self {
            ThemeMode::Dark => (159, 227, 255),
            ThemeMode::Light => (103, 199, 255),
        }
    }

    /// Palette colour at the given opacity (clamped to `[0, 1]`).
    pub fn particle_color(self, opacity: f32) -> Color {
        let (r, g, b) = self.particle_rgb();
        Color::srgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            opacity.clamp(0.0, 1.0),
        )
    }

    /// Page background behind the particle layer.
    pub fn background(self) -> Color {
        match self {
            ThemeMode::Dark => Color::srgb_u8(0x0F, 0x17, 0x24),
            ThemeMode::Light => Color::srgb_u8(0xFF, 0xFF, 0xFF),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_differ_per_mode() {
        assert_ne!(
            ThemeMode::Dark.particle_rgb(),
            ThemeMode::Light.particle_rgb()
        );
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_dark(true), ThemeMode::Dark);
    }

    #[test]
    fn particle_color_carries_clamped_opacity() {
        let color = ThemeMode::Dark.particle_color(1.7).to_srgba();
        assert_eq!(color.alpha, 1.0);
        let color = ThemeMode::Light.particle_color(0.25).to_srgba();
        assert!((color.alpha - 0.25).abs() < 1e-6);
        assert!((color.red - 103.0 / 255.0).abs() < 1e-6);
    }
}
