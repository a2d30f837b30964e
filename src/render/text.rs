//! Label text rasterization with `ab_glyph`.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use thiserror::Error;

use super::raster::blend;
use crate::charts::Point;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("Failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid font data in {0}")]
    Invalid(PathBuf),
}

/// Load a TrueType/OpenType font for chart labels.
pub fn load_font(path: &Path) -> Result<FontArc, FontError> {
    let bytes = fs::read(path).map_err(|source| FontError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    FontArc::try_from_vec(bytes).map_err(|_| FontError::Invalid(path.to_path_buf()))
}

/// Horizontal advance of `text` at `size` pixels, kerning included.
pub fn measure(font: &FontArc, text: &str, size: f64) -> f32 {
    let scaled = font.as_scaled(PxScale::from(size as f32));
    let mut width = 0.0;
    let mut previous: Option<GlyphId> = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

/// Draw `text` centered on `anchor.x` with its baseline on `anchor.y`.
pub fn draw_centered(
    img: &mut RgbaImage,
    font: &FontArc,
    text: &str,
    anchor: Point,
    size: f64,
    color: Rgba<u8>,
) {
    let scale = PxScale::from(size as f32);
    let scaled = font.as_scaled(scale);
    let mut caret = anchor.x as f32 - measure(font, text, size) / 2.0;
    let baseline = anchor.y as f32;
    let mut previous: Option<GlyphId> = None;

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x as i64 + i64::from(gx);
            let py = bounds.min.y as i64 + i64::from(gy);
            if px >= 0 && py >= 0 && (px as u32) < img.width() && (py as u32) < img.height() {
                blend(img.get_pixel_mut(px as u32, py as u32), color, coverage);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_font_missing_file() {
        let err = load_font(Path::new("/nonexistent/label.ttf")).unwrap_err();
        assert!(matches!(err, FontError::Read { .. }));
    }

    #[test]
    fn test_load_font_rejects_non_font_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a font").unwrap();

        let err = load_font(file.path()).unwrap_err();
        assert!(matches!(err, FontError::Invalid(_)));
    }
}
