//! Aurora Charts - Animated bar & donut charts on DPI-aware surfaces
//!
//! Renders the site's chart panels without a charting library, either live
//! in a window or as PNG frames.

mod animation;
mod charts;
mod config;
mod export;
mod gui;
mod page;
mod render;
mod session;
mod theme;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use eframe::egui;

use config::RenderConfig;
use export::ExportOptions;
use gui::ChartsApp;

#[derive(Parser, Debug)]
#[command(name = "aurora-charts", version, about)]
struct Cli {
    /// JSON render configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the live viewer (default)
    View,
    /// Render the reveal animation to PNG frames
    Export {
        /// Output directory
        #[arg(short, long, default_value = "frames")]
        out: PathBuf,
        /// Simulated frame rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Write only the settled frame
        #[arg(long)]
        final_only: bool,
        /// Override the configured device pixel ratio
        #[arg(long)]
        dpr: Option<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };

    match cli.command.unwrap_or(Command::View) {
        Command::View => run_viewer(&config),
        Command::Export {
            out,
            fps,
            final_only,
            dpr,
        } => {
            if let Some(dpr) = dpr {
                config.device_pixel_ratio = dpr;
                config.validate()?;
            }
            let mut page = session::build_raster_page(&config)?;
            let options = ExportOptions {
                out_dir: out,
                fps,
                final_only,
            };
            let summary = export::export_frames(&mut page, &options)
                .context("exporting chart frames")?;
            println!("{} frame(s), {} file(s)", summary.frames, summary.files.len());
            Ok(())
        }
    }
}

fn run_viewer(config: &RenderConfig) -> anyhow::Result<()> {
    let page = session::build_raster_page(config)?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 520.0])
            .with_min_inner_size([480.0, 320.0])
            .with_title("Aurora Charts"),
        ..Default::default()
    };

    eframe::run_native(
        "Aurora Charts",
        options,
        Box::new(|cc| Ok(Box::new(ChartsApp::new(cc, page)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
