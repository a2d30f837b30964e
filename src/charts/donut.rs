//! Donut chart: proportional ring segments revealed by a clockwise sweep from
//! 12 o'clock, with a centered label.

use std::f64::consts::{FRAC_PI_2, TAU};

use super::geometry::{Point, Shape};
use super::palette::{Palette, LABEL};
use super::surface::{resize_surface, Surface, SurfaceMetrics};

/// Outer radius as a fraction of the smaller surface dimension.
pub const RADIUS_FACTOR: f64 = 0.32;
/// Ring thickness as a fraction of the radius.
pub const THICKNESS_FACTOR: f64 = 0.45;
/// 12 o'clock.
pub const START_ANGLE: f64 = -FRAC_PI_2;
pub const LABEL_SIZE: f64 = 16.0;
pub const LABEL_OFFSET: f64 = 6.0;
pub const DEFAULT_LABEL: &str = "Allocation";

/// One ring segment. `draw_end` is `None` when the sweep has not reached the
/// segment yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DonutSegment {
    pub index: usize,
    pub start_angle: f64,
    pub nominal_end: f64,
    pub draw_end: Option<f64>,
}

#[cfg(test)]
impl DonutSegment {
    fn nominal_extent(&self) -> f64 {
        self.nominal_end - self.start_angle
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonutLayout {
    pub center: Point,
    pub radius: f64,
    pub thickness: f64,
    pub segments: Vec<DonutSegment>,
    pub label_anchor: Point,
    pub label_size: f64,
}

/// Compute ring geometry without touching a surface.
///
/// Each segment starts where the previous one nominally ended, even when the
/// previous one was cut short by the sweep.
pub fn layout_donut(metrics: &SurfaceMetrics, parts: &[f64], progress: f64) -> DonutLayout {
    let w = metrics.width_f();
    let h = metrics.height_f();
    let progress = progress.clamp(0.0, 1.0);

    let center = Point::new(w / 2.0, h / 2.0);
    let radius = w.min(h) * RADIUS_FACTOR;
    let thickness = radius * THICKNESS_FACTOR;

    let total: f64 = parts.iter().sum();
    let total = if total > 0.0 { total } else { 1.0 };
    let sweep_limit = START_ANGLE + TAU * progress;

    let mut start = START_ANGLE;
    let segments = parts
        .iter()
        .enumerate()
        .map(|(index, &part)| {
            let nominal_end = start + part / total * TAU;
            let clamped = nominal_end.min(sweep_limit);
            let segment = DonutSegment {
                index,
                start_angle: start,
                nominal_end,
                draw_end: (clamped > start).then_some(clamped),
            };
            start = nominal_end;
            segment
        })
        .collect();

    DonutLayout {
        center,
        radius,
        thickness,
        segments,
        label_anchor: Point::new(center.x, center.y + LABEL_OFFSET * metrics.scale),
        label_size: LABEL_SIZE * metrics.scale,
    }
}

/// Draw one animation frame of the donut. An empty `parts` draws the label
/// only.
pub fn draw_donut<S: Surface + ?Sized>(
    surface: &mut S,
    parts: &[f64],
    progress: f64,
    palette: &Palette,
    label: &str,
) {
    let metrics = resize_surface(surface);
    let layout = layout_donut(&metrics, parts, progress);

    surface.clear();

    for segment in &layout.segments {
        let Some(end_angle) = segment.draw_end else {
            continue;
        };
        surface.draw(&Shape::Arc {
            center: layout.center,
            radius: layout.radius,
            start_angle: segment.start_angle,
            end_angle,
            thickness: layout.thickness,
            color: palette.color(segment.index),
        });
    }

    surface.draw(&Shape::Text {
        text: label.to_string(),
        anchor: layout.label_anchor,
        size: layout.label_size,
        color: LABEL,
    });
}
