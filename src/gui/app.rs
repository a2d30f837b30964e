//! Aurora Charts Viewer
//! Main window acting as the host page for the chart surfaces.

use egui::{CentralPanel, Color32, Frame, RichText};

use crate::gui::ChartViewer;
use crate::page::ChartPage;
use crate::render::RasterSurface;

const PAGE_FILL: Color32 = Color32::from_rgb(11, 13, 18);

pub struct ChartsApp {
    page: ChartPage<RasterSurface>,
    chart_viewer: ChartViewer,
}

impl ChartsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, mut page: ChartPage<RasterSurface>) -> Self {
        let chart_viewer = ChartViewer::new(&page);
        page.start();
        Self { page, chart_viewer }
    }
}

impl eframe::App for ChartsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        CentralPanel::default()
            .frame(Frame::default().fill(PAGE_FILL).inner_margin(24.0))
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("Portfolio overview")
                        .size(22.0)
                        .color(Color32::from_rgb(247, 248, 251)),
                );
                ui.add_space(16.0);
                self.chart_viewer.show(ui, &mut self.page);
            });
    }
}
