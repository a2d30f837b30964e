//! Charts module - Bar and donut layouts drawn onto DPI-aware surfaces

mod bar;
mod donut;
mod geometry;
mod palette;
mod surface;

pub use bar::draw_bar_chart;
pub use donut::{draw_donut, DEFAULT_LABEL};
pub use geometry::{Point, RoundRect, Shape};
pub use palette::{parse_color, ColorError, FixedPalette, Palette, PaletteProvider};
pub use surface::{resize_surface, Surface};

#[cfg(test)]
pub(crate) use surface::recording::RecordingSurface;
