//! Render surface abstraction: geometry plus the two drawing primitives the
//! particle engine needs.
//!
//! Coordinates are surface-local in the canvas convention: origin top-left,
//! x right, y down.  Hosts that render elsewhere (see
//! [`crate::graphics::GizmoSurface`]) convert on their side.

use bevy::prelude::*;
use rand::Rng;

/// Current drawable area of the render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBounds {
    pub width: f32,
    pub height: f32,
}

impl SurfaceBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.width && point.y <= self.height
    }

    /// Uniformly distributed point inside the bounds.
    ///
    /// Degenerate (zero-sized) bounds yield points on the origin edge rather
    /// than panicking on an empty range.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.gen::<f32>() * self.width,
            rng.gen::<f32>() * self.height,
        )
    }
}

/// A 2D raster target supporting clear and filled-circle-with-glow.
pub trait RenderSurface {
    /// Erase the whole drawable area.
    fn clear(&mut self, bounds: SurfaceBounds);

    /// Paint a filled circle with a glow of radius `blur` in the same colour.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, blur: f32);
}

/// One recorded drawing primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear(SurfaceBounds),
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        blur: f32,
    },
}

/// In-memory surface that records every primitive it receives.
///
/// Used by headless hosts and tests to observe exactly what a frame drew.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Circles drawn since the most recent clear.
    pub fn circles_since_clear(&self) -> Vec<DrawCommand> {
        let start = self
            .commands
            .iter()
            .rposition(|command| matches!(command, DrawCommand::Clear(_)))
            .map_or(0, |index| index + 1);
        self.commands[start..].to_vec()
    }

    pub fn clear_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Clear(_)))
            .count()
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self, bounds: SurfaceBounds) {
        self.commands.push(DrawCommand::Clear(bounds));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, blur: f32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            blur,
        });
    }
}
