//! Drawing primitives shared by the chart layouts and the surfaces.

use image::Rgba;

/// A position in backing-store pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Rectangle with rounded corners. The radius is already clamped to half the
/// width and height by [`RoundRect::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
}

impl RoundRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64, radius: f64) -> Self {
        let radius = radius.min(width / 2.0).min(height / 2.0).max(0.0);
        Self {
            x,
            y,
            width,
            height,
            radius,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// One drawing command. Angles are radians, increasing clockwise on screen
/// (y grows downward), with 0 pointing right.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Straight stroke with butt caps.
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Rgba<u8>,
    },
    /// Filled rounded rectangle.
    RoundRect { rect: RoundRect, color: Rgba<u8> },
    /// Circular arc stroke with round caps.
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        thickness: f64,
        color: Rgba<u8>,
    },
    /// Text horizontally centered on `anchor`, with `anchor.y` as baseline.
    Text {
        text: String,
        anchor: Point,
        size: f64,
        color: Rgba<u8>,
    },
}
