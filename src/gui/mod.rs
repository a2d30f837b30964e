//! GUI module - Live viewer for the animated charts

mod app;
mod chart_viewer;

pub use app::ChartsApp;
pub use chart_viewer::ChartViewer;
