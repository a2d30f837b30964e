//! Render Configuration
//! JSON settings shared by the live viewer and the frame exporter.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::DEFAULT_DURATION_MS;
use crate::charts::DEFAULT_LABEL;
use crate::page::Datasets;

/// Largest backing store one surface may allocate, in device pixels (4096²).
pub const MAX_BACKING_PIXELS: f64 = 16_777_216.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Dataset `{dataset}` has invalid value {value} at index {index}")]
    InvalidValue {
        dataset: &'static str,
        index: usize,
        value: f64,
    },
    #[error("Animation duration must be positive, got {0} ms")]
    InvalidDuration(f64),
    #[error("Surface `{id}` must have a positive size, got {width}x{height}")]
    InvalidSurface { id: String, width: f64, height: f64 },
    #[error("Device pixel ratio must be positive, got {0}")]
    InvalidPixelRatio(f64),
    #[error("Surface `{id}` needs {pixels} backing pixels, limit is 16777216")]
    SurfaceTooLarge { id: String, pixels: f64 },
}

/// A canvas element the page provides, with its CSS size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

impl SurfaceConfig {
    fn new(id: &str, width: f64, height: f64) -> Self {
        Self {
            id: id.to_string(),
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Reveal length.
    pub duration_ms: f64,
    /// Used by the exporter; the viewer takes the window's ratio.
    pub device_pixel_ratio: f64,
    /// Stylesheet providing the `--aGreen`/`--aBlue`/`--aViolet`/`--aPink`
    /// palette variables.
    pub stylesheet: Option<PathBuf>,
    /// Donut center label.
    pub label: String,
    /// Font for rasterized labels. Without one, labels are left to the host.
    pub label_font: Option<PathBuf>,
    /// Color the backing stores are cleared to. Transparent when unset.
    pub background: Option<String>,
    pub surfaces: Vec<SurfaceConfig>,
    pub datasets: Datasets,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            device_pixel_ratio: 1.0,
            stylesheet: None,
            label: DEFAULT_LABEL.to_string(),
            label_font: None,
            background: None,
            surfaces: vec![
                SurfaceConfig::new("chartBar", 360.0, 180.0),
                SurfaceConfig::new("chartDonut", 240.0, 240.0),
                SurfaceConfig::new("chartBar2", 360.0, 180.0),
            ],
            datasets: Datasets::default(),
        }
    }
}

impl RenderConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded render config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Datasets must be finite and non-negative; sizes and durations
    /// positive. Each surface's backing store must fit
    /// [`MAX_BACKING_PIXELS`] at the configured ratio.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.duration_ms > 0.0 && self.duration_ms.is_finite()) {
            return Err(ConfigError::InvalidDuration(self.duration_ms));
        }
        if !(self.device_pixel_ratio > 0.0 && self.device_pixel_ratio.is_finite()) {
            return Err(ConfigError::InvalidPixelRatio(self.device_pixel_ratio));
        }
        for surface in &self.surfaces {
            let valid = |v: f64| v > 0.0 && v.is_finite();
            if !valid(surface.width) || !valid(surface.height) {
                return Err(ConfigError::InvalidSurface {
                    id: surface.id.clone(),
                    width: surface.width,
                    height: surface.height,
                });
            }
            let pixels = (surface.width * self.device_pixel_ratio).floor()
                * (surface.height * self.device_pixel_ratio).floor();
            if pixels > MAX_BACKING_PIXELS {
                return Err(ConfigError::SurfaceTooLarge {
                    id: surface.id.clone(),
                    pixels,
                });
            }
        }

        let datasets = [
            ("bar", &self.datasets.bar),
            ("donut", &self.datasets.donut),
            ("bar2", &self.datasets.bar2),
        ];
        for (dataset, values) in datasets {
            if let Some((index, &value)) = values
                .iter()
                .enumerate()
                .find(|(_, v)| !(v.is_finite() && **v >= 0.0))
            {
                return Err(ConfigError::InvalidValue {
                    dataset,
                    index,
                    value,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::DEFAULT_BAR;
    use std::io::Write;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = RenderConfig::from_json("{}").unwrap();
        assert_eq!(config, RenderConfig::default());
        assert_eq!(config.duration_ms, 700.0);
        assert_eq!(config.label, "Allocation");
        assert_eq!(config.datasets.donut, vec![60.0, 25.0, 10.0, 5.0]);
    }

    #[test]
    fn test_partial_override() {
        let config = RenderConfig::from_json(
            r#"{
                "duration_ms": 400,
                "device_pixel_ratio": 2,
                "surfaces": [{ "id": "donutChart", "width": 300, "height": 300 }],
                "datasets": { "donut": [1, 2, 3] }
            }"#,
        )
        .unwrap();

        assert_eq!(config.duration_ms, 400.0);
        assert_eq!(config.surfaces.len(), 1);
        assert_eq!(config.surfaces[0].id, "donutChart");
        assert_eq!(config.datasets.donut, vec![1.0, 2.0, 3.0]);
        assert_eq!(config.datasets.bar, DEFAULT_BAR.to_vec());
    }

    #[test]
    fn test_rejects_negative_values() {
        let err = RenderConfig::from_json(r#"{ "datasets": { "bar2": [1, -2] } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                dataset: "bar2",
                index: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_duration_and_surface() {
        assert!(matches!(
            RenderConfig::from_json(r#"{ "duration_ms": 0 }"#),
            Err(ConfigError::InvalidDuration(_))
        ));
        assert!(matches!(
            RenderConfig::from_json(r#"{ "surfaces": [{ "id": "chartBar", "width": 0, "height": 10 }] }"#),
            Err(ConfigError::InvalidSurface { .. })
        ));
        assert!(matches!(
            RenderConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_backing_store() {
        let err = RenderConfig::from_json(
            r#"{ "surfaces": [{ "id": "chartBar", "width": 1000000, "height": 1000000 }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::SurfaceTooLarge { ref id, .. } if id == "chartBar"));

        // 4096 x 4096 fits at ratio 1 but not at ratio 2
        let mut config = RenderConfig {
            surfaces: vec![SurfaceConfig::new("chartDonut", 4096.0, 4096.0)],
            ..RenderConfig::default()
        };
        assert!(config.validate().is_ok());
        config.device_pixel_ratio = 2.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SurfaceTooLarge { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "label": "Split" }}"#).unwrap();

        let config = RenderConfig::load(file.path()).unwrap();
        assert_eq!(config.label, "Split");
    }
}
