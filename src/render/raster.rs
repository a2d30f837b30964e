//! Raster Surface
//! An `RgbaImage` backed surface drawn with `imageproc`. Each shape is traced
//! into a coverage mask first and then composited once through a `Blend`
//! canvas, so overlapping pieces of one shape (ring body and round caps) do
//! not double up translucent colors.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::path::Path;

use ab_glyph::FontArc;
use image::{GrayImage, ImageBuffer, ImageResult, Luma, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut, Blend, Canvas,
};
use imageproc::point::Point as PolyPoint;

use super::text;
use crate::charts::{Point, RoundRect, Shape, Surface};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const COVERED: Luma<u8> = Luma([255]);
/// Polygon segments per quarter turn of a curve.
const CURVE_STEPS: usize = 12;

/// Text the surface could not rasterize because no font was loaded. The host
/// can paint it with its own text engine. Coordinates are backing pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredText {
    pub text: String,
    pub anchor: Point,
    pub size: f64,
    pub color: Rgba<u8>,
}

pub struct RasterSurface {
    logical: (f64, f64),
    device_pixel_ratio: Option<f64>,
    background: Rgba<u8>,
    font: Option<FontArc>,
    canvas: Blend<RgbaImage>,
    deferred_text: Vec<DeferredText>,
}

impl RasterSurface {
    pub fn new(logical_width: f64, logical_height: f64) -> Self {
        Self {
            logical: (logical_width, logical_height),
            device_pixel_ratio: None,
            background: TRANSPARENT,
            font: None,
            canvas: Blend(ImageBuffer::from_pixel(1, 1, TRANSPARENT)),
            deferred_text: Vec::new(),
        }
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = Some(ratio);
        self
    }

    pub fn with_background(mut self, background: Rgba<u8>) -> Self {
        self.background = background;
        self
    }

    pub fn with_font(mut self, font: Option<FontArc>) -> Self {
        self.font = font;
        self
    }

    /// Update the size the host lays the surface out at. Returns `true` if
    /// anything changed.
    pub fn set_layout(&mut self, logical_width: f64, logical_height: f64, ratio: f64) -> bool {
        let changed = self.logical != (logical_width, logical_height)
            || self.device_pixel_ratio != Some(ratio);
        self.logical = (logical_width, logical_height);
        self.device_pixel_ratio = Some(ratio);
        changed
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas.0
    }

    pub fn deferred_text(&self) -> &[DeferredText] {
        &self.deferred_text
    }

    pub fn save_png(&self, path: &Path) -> ImageResult<()> {
        self.canvas.0.save(path)
    }

    fn new_mask(&self) -> GrayImage {
        let (w, h) = self.canvas.0.dimensions();
        GrayImage::new(w, h)
    }

    /// Source-over every covered mask pixel with `color`.
    fn composite(&mut self, mask: &GrayImage, color: Rgba<u8>) {
        for (x, y, px) in mask.enumerate_pixels() {
            if px[0] > 0 {
                self.canvas.draw_pixel(x, y, color);
            }
        }
    }

    fn fill_line(&mut self, from: Point, to: Point, width: f64, color: Rgba<u8>) {
        let len = from.distance(to);
        if len <= 0.0 || width <= 0.0 {
            return;
        }
        // butt caps: a quad offset half the width to either side
        let (nx, ny) = (
            -(to.y - from.y) / len * width / 2.0,
            (to.x - from.x) / len * width / 2.0,
        );
        let quad = [
            (from.x + nx, from.y + ny),
            (to.x + nx, to.y + ny),
            (to.x - nx, to.y - ny),
            (from.x - nx, from.y - ny),
        ];

        let mut mask = self.new_mask();
        fill_polygon(&mut mask, &quad);
        self.composite(&mask, color);
    }

    fn fill_round_rect(&mut self, rect: RoundRect, color: Rgba<u8>) {
        if rect.is_empty() {
            return;
        }
        let r = rect.radius;
        let (left, top) = (rect.x, rect.y);
        let (right, bottom) = (rect.x + rect.width, rect.y + rect.height);
        // corner centers, clockwise from top-right, with the angle each
        // corner's quarter turn starts at
        let corners = [
            (right - r, top + r, -FRAC_PI_2),
            (right - r, bottom - r, 0.0),
            (left + r, bottom - r, FRAC_PI_2),
            (left + r, top + r, PI),
        ];

        let mut outline = Vec::with_capacity(4 * (CURVE_STEPS + 1));
        for (cx, cy, start) in corners {
            outline.extend(arc_points(cx, cy, r, start, FRAC_PI_2));
        }

        let mut mask = self.new_mask();
        fill_polygon(&mut mask, &outline);
        self.composite(&mask, color);
    }

    fn stroke_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        thickness: f64,
        color: Rgba<u8>,
    ) {
        let sweep = (end_angle - start_angle).min(TAU);
        if sweep <= 0.0 || thickness <= 0.0 {
            return;
        }
        let half = thickness / 2.0;

        let mut body = arc_points(center.x, center.y, radius + half, start_angle, sweep);
        let mut inner = arc_points(center.x, center.y, (radius - half).max(0.0), start_angle, sweep);
        inner.reverse();
        body.extend(inner);

        let mut mask = self.new_mask();
        fill_polygon(&mut mask, &body);
        for angle in [start_angle, start_angle + sweep] {
            let cap = (
                (center.x + radius * angle.cos()).round() as i32,
                (center.y + radius * angle.sin()).round() as i32,
            );
            draw_filled_circle_mut(&mut mask, cap, half.round() as i32, COVERED);
        }
        self.composite(&mask, color);
    }
}

/// Points along a circular arc, both ends included.
fn arc_points(cx: f64, cy: f64, radius: f64, start: f64, sweep: f64) -> Vec<(f64, f64)> {
    let steps = ((sweep / FRAC_PI_2) * CURVE_STEPS as f64).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|i| {
            let angle = start + sweep * i as f64 / steps as f64;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

/// Fill a polygon into the mask. Consecutive duplicate pixels are merged;
/// outlines that collapse below a triangle are drawn as a segment.
fn fill_polygon(mask: &mut GrayImage, outline: &[(f64, f64)]) {
    let mut poly: Vec<PolyPoint<i32>> = Vec::with_capacity(outline.len());
    for &(x, y) in outline {
        let p = PolyPoint::new(x.round() as i32, y.round() as i32);
        if poly.last() != Some(&p) {
            poly.push(p);
        }
    }
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }

    match poly.len() {
        0 => {}
        1 | 2 => {
            let (a, b) = (poly[0], poly[poly.len() - 1]);
            draw_line_segment_mut(
                mask,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                COVERED,
            );
        }
        _ => draw_polygon_mut(mask, &poly, COVERED),
    }
}

impl Surface for RasterSurface {
    fn logical_size(&self) -> (f64, f64) {
        self.logical
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        self.device_pixel_ratio
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas = Blend(ImageBuffer::from_pixel(width, height, self.background));
        self.deferred_text.clear();
    }

    fn clear(&mut self) {
        let background = self.background;
        self.canvas.0.pixels_mut().for_each(|p| *p = background);
        self.deferred_text.clear();
    }

    fn draw(&mut self, shape: &Shape) {
        match shape {
            Shape::Line {
                from,
                to,
                width,
                color,
            } => self.fill_line(*from, *to, *width, *color),
            Shape::RoundRect { rect, color } => self.fill_round_rect(*rect, *color),
            Shape::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                thickness,
                color,
            } => self.stroke_arc(*center, *radius, *start_angle, *end_angle, *thickness, *color),
            Shape::Text {
                text: content,
                anchor,
                size,
                color,
            } => match &self.font {
                Some(font) => {
                    text::draw_centered(&mut self.canvas.0, font, content, *anchor, *size, *color)
                }
                None => self.deferred_text.push(DeferredText {
                    text: content.clone(),
                    anchor: *anchor,
                    size: *size,
                    color: *color,
                }),
            },
        }
    }
}

/// Straight-alpha source-over blend, with the source alpha scaled by glyph
/// `coverage`.
pub(crate) fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let sa = f32::from(src[3]) / 255.0 * coverage;
    if sa <= 0.0 {
        return;
    }
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = TRANSPARENT;
        return;
    }
    for i in 0..3 {
        let c = (f32::from(src[i]) * sa + f32::from(dst[i]) * da * (1.0 - sa)) / out_a;
        dst[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
