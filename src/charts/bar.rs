//! Bar chart: grid lines plus one rounded, glowing bar per value that grows
//! upward from the bottom padding line.

use super::geometry::{Point, RoundRect, Shape};
use super::palette::{BAR_FILL, BAR_GLOW, GRID};
use super::surface::{resize_surface, Surface, SurfaceMetrics};

/// Horizontal bands the surface height is divided into.
pub const GRID_BANDS: usize = 5;
/// Padding on every side, in CSS pixels.
pub const PADDING: f64 = 18.0;
/// Bar corner radius, in CSS pixels.
pub const CORNER_RADIUS: f64 = 10.0;
/// Fraction of a slot left empty before the bar starts.
pub const BAR_OFFSET: f64 = 0.18;
/// Fraction of a slot covered by the bar.
pub const BAR_WIDTH: f64 = 0.64;

/// Geometry of one bar for a given progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Height at progress 1.
    pub target_height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    /// y positions of the grid lines, top to bottom.
    pub grid: Vec<f64>,
    pub bars: Vec<BarGeometry>,
    /// Height available to a bar of the maximum value.
    pub drawable_height: f64,
}

/// Compute grid and bar geometry without touching a surface.
///
/// Values are expected to be non-negative. The tallest value reaches the full
/// drawable height; an empty or all-zero dataset scales against 1.
pub fn layout_bars(metrics: &SurfaceMetrics, values: &[f64], progress: f64) -> BarLayout {
    let w = metrics.width_f();
    let h = metrics.height_f();
    let progress = progress.clamp(0.0, 1.0);

    let grid = (1..GRID_BANDS)
        .map(|i| h / GRID_BANDS as f64 * i as f64)
        .collect();

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let max = if max > 0.0 { max } else { 1.0 };

    let pad = PADDING * metrics.scale;
    let drawable_height = (h - pad * 2.0).max(0.0);
    let bars = if values.is_empty() {
        Vec::new()
    } else {
        let slot = (w - pad * 2.0).max(0.0) / values.len() as f64;
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let target_height = drawable_height * v / max;
                let height = target_height * progress;
                BarGeometry {
                    x: pad + i as f64 * slot + slot * BAR_OFFSET,
                    y: h - pad - height,
                    width: slot * BAR_WIDTH,
                    height,
                    target_height,
                }
            })
            .collect()
    };

    BarLayout {
        grid,
        bars,
        drawable_height,
    }
}

/// Draw one animation frame of the bar chart. An empty dataset draws the grid
/// only.
pub fn draw_bar_chart<S: Surface + ?Sized>(surface: &mut S, values: &[f64], progress: f64) {
    let metrics = resize_surface(surface);
    let layout = layout_bars(&metrics, values, progress);

    surface.clear();

    let line_width = metrics.scale;
    for &y in &layout.grid {
        surface.draw(&Shape::Line {
            from: Point::new(0.0, y),
            to: Point::new(metrics.width_f(), y),
            width: line_width,
            color: GRID,
        });
    }

    let radius = CORNER_RADIUS * metrics.scale;
    for bar in &layout.bars {
        let rect = RoundRect::new(bar.x, bar.y, bar.width, bar.height, radius);
        // solid body, then the translucent glow on top
        surface.draw(&Shape::RoundRect {
            rect,
            color: BAR_FILL,
        });
        surface.draw(&Shape::RoundRect {
            rect,
            color: BAR_GLOW,
        });
    }
}
