//! Builds a raster-backed chart page from a [`RenderConfig`].

use std::collections::HashMap;

use image::Rgba;
use thiserror::Error;

use crate::charts::{parse_color, ColorError, FixedPalette, Palette, PaletteProvider};
use crate::config::RenderConfig;
use crate::page::ChartPage;
use crate::render::{load_font, FontError, RasterSurface};
use crate::theme::{ThemeError, ThemeVariables};

#[derive(Error, Debug)]
pub enum SetupError {
    #[error(transparent)]
    Theme(#[from] ThemeError),
    #[error(transparent)]
    Font(#[from] FontError),
    #[error("Invalid background color: {0}")]
    Background(#[from] ColorError),
}

/// Palette from the configured stylesheet, or the fallbacks.
pub fn resolve_palette(config: &RenderConfig) -> Result<Palette, SetupError> {
    let provider: Box<dyn PaletteProvider> = match &config.stylesheet {
        Some(path) => Box::new(ThemeVariables::load(path)?),
        None => Box::new(FixedPalette::default()),
    };
    Ok(provider.palette())
}

/// Mount one raster surface per configured element id.
pub fn build_raster_page(config: &RenderConfig) -> Result<ChartPage<RasterSurface>, SetupError> {
    let palette = resolve_palette(config)?;
    let font = config.label_font.as_deref().map(load_font).transpose()?;
    let background = match &config.background {
        Some(css) => parse_color(css)?,
        None => Rgba([0, 0, 0, 0]),
    };

    let mut host: HashMap<String, RasterSurface> = config
        .surfaces
        .iter()
        .map(|s| {
            let surface = RasterSurface::new(s.width, s.height)
                .with_device_pixel_ratio(config.device_pixel_ratio)
                .with_background(background)
                .with_font(font.clone());
            (s.id.clone(), surface)
        })
        .collect();

    Ok(ChartPage::mount(
        &mut host,
        &config.datasets,
        palette,
        config.label.clone(),
        config.duration_ms,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SurfaceConfig;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_palette_from_stylesheet() {
        let mut css = tempfile::NamedTempFile::new().unwrap();
        write!(css, ":root {{ --aViolet: #010203; }}").unwrap();
        let config = RenderConfig {
            stylesheet: Some(css.path().to_path_buf()),
            ..RenderConfig::default()
        };

        let palette = resolve_palette(&config).unwrap();
        assert_eq!(palette.colors[2], Rgba([1, 2, 3, 255]));
        assert_eq!(palette.colors[0], Palette::default().colors[0]);
        assert_eq!(
            resolve_palette(&RenderConfig::default()).unwrap(),
            Palette::default()
        );
    }

    #[test]
    fn test_default_config_mounts_three_charts() {
        let page = build_raster_page(&RenderConfig::default()).unwrap();
        assert_eq!(page.charts().len(), 3);
    }

    #[test]
    fn test_unknown_ids_give_an_empty_page() {
        let config = RenderConfig {
            surfaces: vec![SurfaceConfig {
                id: "hero".to_string(),
                width: 100.0,
                height: 100.0,
            }],
            ..RenderConfig::default()
        };
        assert!(build_raster_page(&config).unwrap().is_empty());
    }

    #[test]
    fn test_bad_background_and_missing_font_error() {
        let config = RenderConfig {
            background: Some("midnight".to_string()),
            ..RenderConfig::default()
        };
        assert!(matches!(
            build_raster_page(&config),
            Err(SetupError::Background(_))
        ));

        let config = RenderConfig {
            label_font: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..RenderConfig::default()
        };
        assert!(matches!(build_raster_page(&config), Err(SetupError::Font(_))));
    }
}
