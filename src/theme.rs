//! Theme variables: CSS custom properties (`--name: value;`) read from the
//! site stylesheet. Later declarations win, like the cascade on `:root`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::charts::{Palette, PaletteProvider};

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Failed to read stylesheet {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeVariables {
    vars: HashMap<String, String>,
}

impl ThemeVariables {
    pub fn load(path: &Path) -> Result<Self, ThemeError> {
        let css = fs::read_to_string(path).map_err(|source| ThemeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let theme = Self::from_css(&css);
        log::info!(
            "Loaded {} theme variables from {}",
            theme.vars.len(),
            path.display()
        );
        Ok(theme)
    }

    /// Collect every custom property declaration in `css`, regardless of
    /// selector.
    pub fn from_css(css: &str) -> Self {
        let css = strip_comments(css);
        let mut vars = HashMap::new();

        for decl in css.split([';', '{', '}']) {
            let decl = decl.trim();
            if !decl.starts_with("--") {
                continue;
            }
            let Some((name, value)) = decl.split_once(':') else {
                continue;
            };
            vars.insert(name.trim().to_string(), value.trim().to_string());
        }

        Self { vars }
    }

    /// Value of a variable, or `None` if absent or empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

impl PaletteProvider for ThemeVariables {
    fn palette(&self) -> Palette {
        Palette::from_lookup(|name| self.get(name).map(str::to_string))
    }
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::io::Write;

    const CSS: &str = r#"
        /* aurora palette */
        :root {
            --aGreen: rgba(10, 20, 30, .5);
            --aBlue:#123456;
            --radius: 18px; /* --aPink: #ffffff; */
        }
        .dark { --aViolet: ; }
        body { color: white; }
    "#;

    #[test]
    fn test_parses_custom_properties() {
        let theme = ThemeVariables::from_css(CSS);
        assert_eq!(theme.get("--aGreen"), Some("rgba(10, 20, 30, .5)"));
        assert_eq!(theme.get("--aBlue"), Some("#123456"));
        assert_eq!(theme.get("--radius"), Some("18px"));
        assert_eq!(theme.get("--aViolet"), None);
        assert_eq!(theme.get("--aPink"), None);
        assert_eq!(theme.get("color"), None);
    }

    #[test]
    fn test_later_declarations_win() {
        let theme = ThemeVariables::from_css(":root{--aBlue:#000} .x{--aBlue:#fff}");
        assert_eq!(theme.get("--aBlue"), Some("#fff"));
    }

    #[test]
    fn test_palette_mixes_theme_and_fallbacks() {
        let palette = ThemeVariables::from_css(CSS).palette();
        assert_eq!(palette.colors[0], Rgba([10, 20, 30, 128]));
        assert_eq!(palette.colors[1], Rgba([0x12, 0x34, 0x56, 255]));
        assert_eq!(palette.colors[2], Palette::default().colors[2]);
        assert_eq!(palette.colors[3], Palette::default().colors[3]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, ":root {{ --aPink: #ff00ff; }}").unwrap();

        let theme = ThemeVariables::load(file.path()).unwrap();
        assert_eq!(theme.palette().colors[3], Rgba([255, 0, 255, 255]));
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = ThemeVariables::load(Path::new("/nonexistent/site.css")).unwrap_err();
        assert!(matches!(err, ThemeError::Read { .. }));
    }
}
