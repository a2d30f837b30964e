//! Canvas-like drawing surface and DPI-aware backing-store sizing.

use super::geometry::Shape;

/// A drawable 2D area with a logical (CSS pixel) size and a backing store
/// measured in device pixels.
pub trait Surface {
    /// Logical width and height in CSS pixels.
    fn logical_size(&self) -> (f64, f64);

    /// Device pixel ratio, if the host knows it.
    fn device_pixel_ratio(&self) -> Option<f64>;

    /// Reallocate the backing store. Previous contents are discarded.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Erase the backing store to its background.
    fn clear(&mut self);

    /// Draw one shape in backing-store pixel coordinates.
    fn draw(&mut self, shape: &Shape);
}

/// Resolved backing-store size and the scale used to produce it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMetrics {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
}

impl SurfaceMetrics {
    pub fn width_f(&self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f(&self) -> f64 {
        f64::from(self.height)
    }
}

/// Size the backing store to `max(1, floor(logical * dpr))` in each
/// dimension. Unknown or unusable ratios fall back to 1.
pub fn resize_surface<S: Surface + ?Sized>(surface: &mut S) -> SurfaceMetrics {
    let scale = surface
        .device_pixel_ratio()
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(1.0);
    let (logical_w, logical_h) = surface.logical_size();
    let width = backing_dimension(logical_w, scale);
    let height = backing_dimension(logical_h, scale);

    surface.set_backing_size(width, height);
    log::trace!("resized surface to {width}x{height} @ {scale}");

    SurfaceMetrics {
        width,
        height,
        scale,
    }
}

fn backing_dimension(logical: f64, scale: f64) -> u32 {
    let px = (logical * scale).floor();
    if px.is_finite() && px >= 1.0 {
        px.min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}

/// Surface double that records every call instead of drawing pixels.
#[cfg(test)]
pub(crate) mod recording {
    use super::{Shape, Surface};

    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub logical: (f64, f64),
        pub dpr: Option<f64>,
        pub backing: (u32, u32),
        pub resizes: usize,
        pub clears: usize,
        pub shapes: Vec<Shape>,
    }

    impl RecordingSurface {
        pub fn new(width: f64, height: f64, dpr: Option<f64>) -> Self {
            Self {
                logical: (width, height),
                dpr,
                ..Default::default()
            }
        }
    }

    impl Surface for RecordingSurface {
        fn logical_size(&self) -> (f64, f64) {
            self.logical
        }

        fn device_pixel_ratio(&self) -> Option<f64> {
            self.dpr
        }

        fn set_backing_size(&mut self, width: u32, height: u32) {
            self.backing = (width, height);
            self.resizes += 1;
            self.shapes.clear();
        }

        fn clear(&mut self) {
            self.clears += 1;
            self.shapes.clear();
        }

        fn draw(&mut self, shape: &Shape) {
            self.shapes.push(shape.clone());
        }
    }
}
