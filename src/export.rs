//! Frame Exporter
//! Drives the reveal with a simulated frame clock and writes every chart's
//! backing store to PNG.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::animation::{FrameOutcome, RevealState};
use crate::page::ChartPage;
use crate::render::RasterSurface;

/// Frames past the nominal count the clock may take to land on the duration.
const FRAME_SLACK: u32 = 2;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Frame rate must be positive, got {0}")]
    InvalidFrameRate(f64),
    #[error("Reveal did not settle within {frames} frames")]
    NotSettled { frames: u32 },
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    pub fps: f64,
    /// Write only the settled frame.
    pub final_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSummary {
    /// Frames rendered until the reveal settled.
    pub frames: u32,
    pub files: Vec<PathBuf>,
}

/// Run one full reveal and write the frames.
pub fn export_frames(
    page: &mut ChartPage<RasterSurface>,
    options: &ExportOptions,
) -> Result<ExportSummary, ExportError> {
    if !(options.fps > 0.0 && options.fps.is_finite()) {
        return Err(ExportError::InvalidFrameRate(options.fps));
    }
    if page.is_empty() {
        log::info!("No chart surfaces on the page, nothing to export");
        return Ok(ExportSummary::default());
    }

    fs::create_dir_all(&options.out_dir).map_err(|source| ExportError::CreateDir {
        path: options.out_dir.clone(),
        source,
    })?;

    let frame_ms = 1000.0 / options.fps;
    let max_frames = frame_budget(page.animation().duration_ms(), options.fps);
    let mut summary = ExportSummary::default();
    page.start();

    for index in 0..max_frames {
        let outcome = page.frame(f64::from(index) * frame_ms);
        if outcome == FrameOutcome::Idle {
            break;
        }
        summary.frames += 1;

        let finished = outcome == FrameOutcome::Finished;
        if finished || !options.final_only {
            let label = if finished && options.final_only {
                "final".to_string()
            } else {
                format!("{index:04}")
            };
            write_frame(page, &options.out_dir, &label, &mut summary.files)?;
        }
        if finished {
            break;
        }
    }

    if page.animation().state() != RevealState::Settled {
        return Err(ExportError::NotSettled {
            frames: summary.frames,
        });
    }

    log::info!(
        "Exported {} frame(s), {} file(s) to {}",
        summary.frames,
        summary.files.len(),
        options.out_dir.display()
    );
    Ok(summary)
}

/// Frames needed to cover `duration_ms` at `fps`, plus slack for rounding.
fn frame_budget(duration_ms: f64, fps: f64) -> u32 {
    let nominal = (duration_ms.max(0.0) * fps / 1000.0).ceil();
    if nominal.is_finite() && nominal < f64::from(u32::MAX - FRAME_SLACK) {
        nominal as u32 + FRAME_SLACK
    } else {
        u32::MAX
    }
}

fn write_frame(
    page: &ChartPage<RasterSurface>,
    out_dir: &Path,
    label: &str,
    files: &mut Vec<PathBuf>,
) -> Result<(), ExportError> {
    for chart in page.charts() {
        let path = out_dir.join(format!("{}-{label}.png", chart.element_id));
        chart
            .surface
            .save_png(&path)
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;
        log::trace!("wrote {}", path.display());
        files.push(path);
    }
    Ok(())
}
