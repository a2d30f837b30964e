//! Chart colors: the four-color ring palette, fixed chart furniture colors,
//! and parsing of CSS color strings.

use image::Rgba;
use thiserror::Error;

/// Theme variables that feed the donut ring palette, with their fallbacks.
pub const PALETTE_VARIABLES: [(&str, &str); 4] = [
    ("--aGreen", "rgba(92,246,181,.38)"),
    ("--aBlue", "rgba(72,168,255,.34)"),
    ("--aViolet", "rgba(168,95,255,.28)"),
    ("--aPink", "rgba(255,120,205,.20)"),
];

// Chart furniture (RGBA)
pub const GRID: Rgba<u8> = Rgba([255, 255, 255, 36]); // .14
pub const BAR_FILL: Rgba<u8> = Rgba([255, 255, 255, 217]); // .85
pub const BAR_GLOW: Rgba<u8> = Rgba([72, 168, 255, 36]); // .14
pub const LABEL: Rgba<u8> = Rgba([247, 248, 251, 219]); // .86

#[derive(Error, Debug, PartialEq)]
pub enum ColorError {
    #[error("Unsupported color syntax: {0}")]
    Unsupported(String),
    #[error("Invalid color component `{component}` in {input}")]
    Component { component: String, input: String },
}

/// Four colors cycled through by donut segment index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub colors: [Rgba<u8>; 4],
}

impl Palette {
    /// Build a palette from a variable lookup. Missing, empty or unparsable
    /// variables use the documented fallback.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut colors = [Rgba([0, 0, 0, 0]); 4];
        for (slot, (name, fallback)) in colors.iter_mut().zip(PALETTE_VARIABLES) {
            let value = lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            *slot = match value.as_deref().map(parse_color) {
                Some(Ok(color)) => color,
                Some(Err(e)) => {
                    log::warn!("{name}: {e}; using fallback {fallback}");
                    fallback_color(fallback)
                }
                None => fallback_color(fallback),
            };
        }
        Self { colors }
    }

    pub fn color(&self, index: usize) -> Rgba<u8> {
        self.colors[index % self.colors.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn fallback_color(css: &str) -> Rgba<u8> {
    parse_color(css).unwrap_or(Rgba([255, 255, 255, 255]))
}

/// Source of the ring palette.
pub trait PaletteProvider {
    fn palette(&self) -> Palette;
}

/// A palette that never consults a theme.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPalette(pub Palette);

impl PaletteProvider for FixedPalette {
    fn palette(&self) -> Palette {
        self.0
    }
}

/// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(...)` and `rgba(...)`.
/// Function syntax accepts commas or spaces, an optional `/ alpha`, and
/// alpha as a fraction or percentage.
pub fn parse_color(input: &str) -> Result<Rgba<u8>, ColorError> {
    let s = input.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorError::Unsupported(input.to_string()));
    }

    let lower = s.to_ascii_lowercase();
    let body = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| ColorError::Unsupported(input.to_string()))?;

    let parts: Vec<&str> = body
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(ColorError::Unsupported(input.to_string()));
    }

    let bad = |component: &str| ColorError::Component {
        component: component.to_string(),
        input: input.to_string(),
    };

    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        let value = match part.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().map(|v| v / 100.0 * 255.0),
            None => part.parse::<f64>(),
        }
        .map_err(|_| bad(part))?;
        if !value.is_finite() {
            return Err(bad(part));
        }
        *slot = value.round().clamp(0.0, 255.0) as u8;
    }

    let alpha = match parts.get(3) {
        Some(part) => {
            let value = match part.strip_suffix('%') {
                Some(pct) => pct.parse::<f64>().map(|v| v / 100.0),
                None => part.parse::<f64>(),
            }
            .map_err(|_| bad(part))?;
            if !value.is_finite() {
                return Err(bad(part));
            }
            (value.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };

    Ok(Rgba([rgb[0], rgb[1], rgb[2], alpha]))
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba([digit(0)?, digit(1)?, digit(2)?, 255])),
        4 => Some(Rgba([digit(0)?, digit(1)?, digit(2)?, digit(3)?])),
        6 => Some(Rgba([pair(0)?, pair(2)?, pair(4)?, 255])),
        8 => Some(Rgba([pair(0)?, pair(2)?, pair(4)?, pair(6)?])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgba_with_leading_dot_alpha() {
        assert_eq!(
            parse_color("rgba(92,246,181,.38)").unwrap(),
            Rgba([92, 246, 181, 97])
        );
        assert_eq!(
            parse_color("rgb(10 20 30 / 50%)").unwrap(),
            Rgba([10, 20, 30, 128])
        );
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_color("#fff").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_color("#0b0d12").unwrap(), Rgba([11, 13, 18, 255]));
        assert_eq!(parse_color("#ff000080").unwrap(), Rgba([255, 0, 0, 128]));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_color("aurora"),
            Err(ColorError::Unsupported(_))
        ));
        assert!(matches!(
            parse_color("rgba(1,2,x,1)"),
            Err(ColorError::Component { .. })
        ));
        assert!(parse_color("#12345").is_err());
    }

    #[test]
    fn test_fallback_palette() {
        let palette = Palette::default();
        assert_eq!(palette.colors[0], Rgba([92, 246, 181, 97]));
        assert_eq!(palette.colors[3], Rgba([255, 120, 205, 51]));
        assert_eq!(palette.color(5), palette.colors[1]);
    }

    #[test]
    fn test_lookup_overrides_and_falls_back() {
        let palette = Palette::from_lookup(|name| match name {
            "--aGreen" => Some("#00ff00".to_string()),
            "--aBlue" => Some("   ".to_string()),
            "--aViolet" => Some("not-a-color".to_string()),
            _ => None,
        });

        assert_eq!(palette.colors[0], Rgba([0, 255, 0, 255]));
        assert_eq!(palette.colors[1], Rgba([72, 168, 255, 87]));
        assert_eq!(palette.colors[2], Rgba([168, 95, 255, 71]));
    }
}
