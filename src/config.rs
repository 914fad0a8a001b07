//! Application configuration.
//!
//! Loaded from a JSON file. Every section and field has a default, so an
//! empty object (or no file at all) yields a working setup for 1280×720
//! YouTube thumbnails.
//!
//! ```json
//! {
//!   "canvas": { "width": 1280, "height": 720 },
//!   "paths": { "templates_dir": "templates", "output_dir": "output" },
//!   "output": { "jpeg_quality": 95 },
//!   "text": { "font_paths": ["/opt/fonts/NotoSansJP-Bold.otf"] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::color::{self, HexColor};
use crate::compose::{Compositor, CompositorStyle, Shadow};
use crate::error::{Result, ThumbError};
use crate::font::FontResolver;
use crate::output::JPEG_QUALITY;
use crate::presets::{CANVAS_SIZES, CanvasSize};

/// Root of the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub text: TextConfig,
}

/// Canvas size in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Where templates, renders and history live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub history_file: PathBuf,
    /// Entries kept in the recent files list.
    pub history_limit: usize,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("output"),
            history_file: PathBuf::from("recent_files.json"),
            history_limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 1 to 100.
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

/// Font search and text decoration defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Probed before the built-in platform candidates.
    pub font_paths: Vec<PathBuf>,
    pub shadow_offset: (i32, i32),
    pub shadow_color: HexColor,
    pub label_padding: (u32, u32),
    pub label_radius: u32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_paths: Vec::new(),
            shadow_offset: (3, 3),
            shadow_color: color::known(HexColor::BLACK),
            label_padding: (20, 10),
            label_radius: 5,
        }
    }
}

impl AppConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`load`](Self::load), but falls back to defaults. A missing file
    /// is silent; a broken one is logged.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ThumbError::Config(format!(
                "canvas size {}x{} must be non-zero",
                self.canvas.width, self.canvas.height
            )));
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(ThumbError::Config(format!(
                "jpeg_quality {} outside 1..=100",
                self.output.jpeg_quality
            )));
        }
        Ok(())
    }

    /// Replace the canvas dimensions with a named [`CanvasSize`] preset.
    pub fn with_canvas_size(mut self, name: &str) -> Result<Self> {
        let size = CanvasSize::by_name(name).ok_or_else(|| {
            let names: Vec<&str> = CANVAS_SIZES.iter().map(|s| s.name).collect();
            ThumbError::Config(format!(
                "unknown canvas size '{}' (expected one of: {})",
                name,
                names.join(", ")
            ))
        })?;
        self.canvas = CanvasConfig {
            width: size.width,
            height: size.height,
        };
        Ok(self)
    }

    pub fn compositor_style(&self) -> CompositorStyle {
        CompositorStyle {
            shadow: Shadow {
                offset: self.text.shadow_offset,
                color: self.text.shadow_color.rgba(),
            },
            label_padding: self.text.label_padding,
            label_radius: self.text.label_radius,
        }
    }

    pub fn font_resolver(&self) -> FontResolver {
        FontResolver::new(self.text.font_paths.iter().cloned())
    }

    /// Compositor sized and styled from this config.
    pub fn compositor(&self) -> Compositor {
        Compositor::new(self.canvas.width, self.canvas.height)
            .with_fonts(self.font_resolver())
            .with_style(self.compositor_style())
    }
}
