//! Encoding and writing finished thumbnails.
//!
//! PNG keeps the alpha channel; JPEG is flattened to RGB at a fixed quality.
//! Files are written to a temporary sibling and renamed into place, so a
//! failed write never leaves a truncated image behind.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, ThumbError};

/// Default JPEG quality.
pub const JPEG_QUALITY: u8 = 95;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    /// File extension including the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => ".png",
            OutputFormat::Jpeg => ".jpg",
        }
    }

    /// Guess from a path's extension (`.jpg`/`.jpeg` → JPEG, anything else PNG).
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => OutputFormat::Jpeg,
            _ => OutputFormat::Png,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            other => Err(ThumbError::Output(format!(
                "unknown format '{}' (expected png or jpeg)",
                other
            ))),
        }
    }
}

/// Encode a canvas into file bytes.
pub fn encode_image(image: &RgbaImage, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        OutputFormat::Png => {
            image
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .map_err(|e| ThumbError::Image(format!("PNG encoding failed: {}", e)))?;
        }
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let encoder = JpegEncoder::new_with_quality(&mut bytes, jpeg_quality.clamp(1, 100));
            DynamicImage::ImageRgb8(rgb)
                .write_with_encoder(encoder)
                .map_err(|e| ThumbError::Image(format!("JPEG encoding failed: {}", e)))?;
        }
    }
    Ok(bytes)
}

/// Write `bytes` to `path` via a temporary file in the same directory.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| ThumbError::Output(format!("not a file path: {}", path.display())))?;

    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    let tmp_path = dir.join(tmp_name);

    let written = fs::File::create(&tmp_path).and_then(|mut f| {
        f.write_all(bytes)?;
        f.sync_all()
    });

    if let Err(e) = written.and_then(|_| fs::rename(&tmp_path, path)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(ThumbError::Output(format!(
            "failed to write {}: {}",
            path.display(),
            e
        )));
    }

    Ok(())
}

/// Encode and write a canvas to `path`.
pub fn save_image(image: &RgbaImage, path: &Path, format: OutputFormat, jpeg_quality: u8) -> Result<()> {
    let bytes = encode_image(image, format, jpeg_quality)?;
    write_atomic(path, &bytes)?;
    log::info!("saved {}", path.display());
    Ok(())
}

/// Suggested file name for a thumbnail titled `title`.
///
/// Keeps letters, digits, spaces, `-` and `_`, so Japanese titles survive;
/// falls back to `thumbnail` when nothing usable is left.
pub fn default_file_name(title: &str, format: OutputFormat) -> String {
    let safe: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let safe = safe.trim();
    let stem = if safe.is_empty() { "thumbnail" } else { safe };
    format!("{}{}", stem, format.extension())
}
