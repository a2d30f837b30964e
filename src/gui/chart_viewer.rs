//! Chart Viewer Widget
//! Lays the mounted charts out in a row, feeds the allocated size and the
//! window's pixel density back to their surfaces, and paints the backing
//! stores as textures.

use std::collections::HashMap;

use egui::{Align2, Color32, FontId, Rect, RichText, Sense, TextureHandle, TextureOptions};

use crate::animation::FrameOutcome;
use crate::charts::Surface;
use crate::page::ChartPage;
use crate::render::{DeferredText, RasterSurface};

const CHART_SPACING: f32 = 18.0;
const MIN_CHART_WIDTH: f32 = 120.0;
const CARD_FILL: Color32 = Color32::from_rgb(20, 24, 33);
const CARD_ROUNDING: f32 = 14.0;

/// Displays a [`ChartPage`] and keeps one texture per chart.
pub struct ChartViewer {
    textures: HashMap<String, TextureHandle>,
    /// Height / width of each chart, taken from its configured size.
    aspect: HashMap<String, f32>,
}

impl ChartViewer {
    pub fn new(page: &ChartPage<RasterSurface>) -> Self {
        let aspect = page
            .charts()
            .iter()
            .map(|chart| {
                let (w, h) = chart.surface.logical_size();
                (chart.element_id.clone(), (h / w) as f32)
            })
            .collect();
        Self {
            textures: HashMap::new(),
            aspect,
        }
    }

    /// Draw one frame of the page.
    pub fn show(&mut self, ui: &mut egui::Ui, page: &mut ChartPage<RasterSurface>) {
        if page.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No chart surfaces configured").size(20.0));
            });
            return;
        }

        let ppp = ui.ctx().pixels_per_point();
        let rects = self.layout(ui, page, ppp);

        let now_ms = ui.ctx().input(|i| i.time) * 1000.0;
        let outcome = page.frame(now_ms);
        if outcome.needs_another_frame() {
            ui.ctx().request_repaint();
        }

        let painter = ui.painter();
        for (chart, rect) in page.charts().iter().zip(&rects) {
            painter.rect_filled(*rect, CARD_ROUNDING, CARD_FILL);

            let stale = outcome != FrameOutcome::Idle;
            let texture = self.upload(ui.ctx(), &chart.element_id, &chart.surface, stale);
            painter.image(
                texture.id(),
                *rect,
                Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );

            for text in chart.surface.deferred_text() {
                paint_text(painter, *rect, text, ppp);
            }
        }
    }

    /// Allocate a rect per chart and restart the reveal if any surface
    /// changed size or density.
    fn layout(
        &self,
        ui: &mut egui::Ui,
        page: &mut ChartPage<RasterSurface>,
        ppp: f32,
    ) -> Vec<Rect> {
        let ids: Vec<String> = page
            .charts()
            .iter()
            .map(|c| c.element_id.clone())
            .collect();
        let n = ids.len() as f32;
        let width = ((ui.available_width() - CHART_SPACING * (n - 1.0)) / n).max(MIN_CHART_WIDTH);

        let mut rects = Vec::with_capacity(ids.len());
        let mut resized = false;
        ui.horizontal_top(|ui| {
            ui.spacing_mut().item_spacing.x = CHART_SPACING;
            for id in &ids {
                let aspect = self.aspect.get(id).copied().unwrap_or(0.5);
                let size = egui::vec2(width, width * aspect);
                let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
                if let Some(surface) = page.surface_mut(id) {
                    resized |=
                        surface.set_layout(f64::from(size.x), f64::from(size.y), f64::from(ppp));
                }
                rects.push(rect);
            }
        });

        if resized {
            log::debug!("chart layout changed at {ppp} px/pt");
            page.on_resize();
        }
        rects
    }

    fn upload(
        &mut self,
        ctx: &egui::Context,
        id: &str,
        surface: &RasterSurface,
        stale: bool,
    ) -> &TextureHandle {
        let to_color_image = || {
            let img = surface.image();
            egui::ColorImage::from_rgba_unmultiplied(
                [img.width() as usize, img.height() as usize],
                img.as_raw(),
            )
        };

        if stale {
            if let Some(texture) = self.textures.get_mut(id) {
                texture.set(to_color_image(), TextureOptions::LINEAR);
            }
        }
        self.textures.entry(id.to_string()).or_insert_with(|| {
            ctx.load_texture(format!("chart-{id}"), to_color_image(), TextureOptions::LINEAR)
        })
    }
}

fn paint_text(painter: &egui::Painter, rect: Rect, text: &DeferredText, ppp: f32) {
    let [r, g, b, a] = text.color.0;
    let pos = rect.min + egui::vec2(text.anchor.x as f32 / ppp, text.anchor.y as f32 / ppp);
    painter.text(
        pos,
        Align2::CENTER_BOTTOM,
        &text.text,
        FontId::proportional(text.size as f32 / ppp),
        Color32::from_rgba_unmultiplied(r, g, b, a),
    );
}
