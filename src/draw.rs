//! The one-way paint contract between the engine and a rendering surface.
//!
//! The engine never computes device pixels: painting walks the node set and
//! the connector cache, converts world coordinates through the supplied
//! [`Camera`], and hands view-space primitives to a [`Painter`]. Rendering
//! order is fixed: nodes, then connectors, then the cursor highlight, then
//! the pending-grow preview.

pub mod curve;
pub mod text;

use crate::color::Color;
use crate::geometry::{Circle, Rect, Vector};

use curve::ConnectCurve;

/// World-to-view coordinate transform supplied by the embedding view layer.
pub trait Camera {
    /// Converts a world-space point into view coordinates
    fn to_view(&self, world: Vector) -> Vector;

    /// Returns the current uniform zoom factor
    fn scale(&self) -> f32;
}

/// A camera with a fixed offset and zoom, used by exporters and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedCamera {
    offset: Vector,
    scale: f32,
}

impl FixedCamera {
    /// Creates a camera that scales world coordinates and then shifts them
    pub fn new(offset: Vector, scale: f32) -> Self {
        Self { offset, scale }
    }

    /// The identity transform: view coordinates equal world coordinates
    pub fn identity() -> Self {
        Self::new(Vector::default(), 1.0)
    }
}

impl Camera for FixedCamera {
    fn to_view(&self, world: Vector) -> Vector {
        world.scale(self.scale).add(self.offset)
    }

    fn scale(&self) -> f32 {
        self.scale
    }
}

/// A drawing surface handle.
///
/// All coordinates and lengths passed to a painter are view coordinates;
/// callers are expected to have applied the camera transform already.
pub trait Painter {
    /// Draws a filled, stroked rectangle with rounded corners
    fn draw_rect(
        &mut self,
        rect: Rect,
        fill: Color,
        stroke: Color,
        stroke_width: f32,
        corner_radius: f32,
    );

    /// Draws a stroked circle
    fn draw_circle(&mut self, circle: Circle, fill: Color, stroke: Color, stroke_width: f32);

    /// Draws a single line of text centered on the given point
    fn draw_text_centered(&mut self, center: Vector, text: &str, font_size: f32, color: Color);

    /// Draws a multi-line block of text on a background panel, anchored at
    /// its left-top corner and wrapped to the given width
    fn draw_paragraph(
        &mut self,
        left_top: Vector,
        text: &str,
        wrap_width: f32,
        font_size: f32,
        color: Color,
        background: Color,
    );

    /// Draws a cubic connector curve
    fn draw_curve(&mut self, curve: ConnectCurve, color: Color, width: f32);

    /// Draws a straight line with an arrowhead at its end
    fn draw_arrow(&mut self, from: Vector, to: Vector, color: Color, width: f32, head_length: f32);
}

/// Everything a paint pass needs: the surface and the transform.
///
/// A paint pass is a read-only traversal of the node set and connector
/// cache; callers must not interleave it with an edit.
pub struct PaintContext<'a> {
    pub painter: &'a mut dyn Painter,
    pub camera: &'a dyn Camera,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_camera_identity() {
        let camera = FixedCamera::identity();
        let p = Vector::new(12.0, -3.0);
        assert_eq!(camera.to_view(p), p);
        assert_eq!(camera.scale(), 1.0);
    }

    #[test]
    fn test_fixed_camera_scales_then_shifts() {
        let camera = FixedCamera::new(Vector::new(10.0, 20.0), 2.0);
        let view = camera.to_view(Vector::new(1.0, 1.0));
        assert_eq!(view, Vector::new(12.0, 22.0));
    }
}
