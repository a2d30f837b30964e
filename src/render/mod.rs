//! Render module - Pixel backends for chart surfaces

mod raster;
mod text;

pub use raster::{DeferredText, RasterSurface};
pub use text::{load_font, FontError};
