use crate::surface::{RenderSurface, SurfaceBounds};
use bevy::math::Isometry2d;
use bevy::prelude::*;

/// Halo rings drawn around each particle; the outermost reaches half the
/// blur radius past the particle edge.
const HALO_RINGS: u32 = 4;

/// Setup camera for 2D rendering
pub fn setup_camera(mut commands: Commands) {
    // Default Camera2d shows the full window with the origin at its centre.
    commands.spawn(Camera2d);
    debug!("[SETUP] Camera spawned");
}

/// [`RenderSurface`] backed by Bevy gizmos.
///
/// Gizmos are immediate-mode: nothing drawn last frame survives into this
/// one, so `clear` only records the bounds used for the coordinate
/// conversion.  Filled circles are approximated with concentric outlines,
/// and the glow with faint rings fading outward.
pub struct GizmoSurface<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's>,
    bounds: SurfaceBounds,
}

impl<'a, 'w, 's> GizmoSurface<'a, 'w, 's> {
    pub fn new(gizmos: &'a mut Gizmos<'w, 's>, bounds: SurfaceBounds) -> Self {
        Self { gizmos, bounds }
    }

    /// Canvas coordinates (top-left, y down) to centred y-up world space.
    fn to_world(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x - self.bounds.width / 2.0,
            self.bounds.height / 2.0 - point.y,
        )
    }
}

impl RenderSurface for GizmoSurface<'_, '_, '_> {
    fn clear(&mut self, bounds: SurfaceBounds) {
        self.bounds = bounds;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, blur: f32) {
        let isometry = Isometry2d::from_translation(self.to_world(center));

        let fill_rings = radius.ceil().max(1.0) as u32;
        for i in 1..=fill_rings {
            let r = radius * i as f32 / fill_rings as f32;
            self.gizmos.circle_2d(isometry, r, color);
        }

        if blur <= 0.0 {
            return;
        }
        let alpha = color.alpha();
        for i in 1..=HALO_RINGS {
            let t = i as f32 / HALO_RINGS as f32;
            let halo = color.with_alpha(alpha * 0.3 * (1.0 - t + 1.0 / HALO_RINGS as f32));
            self.gizmos
                .circle_2d(isometry, radius + blur * 0.5 * t, halo);
        }
    }
}
