//! Fitting a source image onto a fixed-size canvas.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbaImage};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, ThumbError};

/// Resampling filter for every resize. Lanczos keeps downscaled photos and
/// line art free of aliasing.
pub const RESAMPLE: FilterType = FilterType::Lanczos3;

/// How a background image maps onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to cover the canvas, then center-crop the overflow.
    #[default]
    Cover,
    /// Scale to fit inside the canvas; the canvas shows around it.
    Contain,
    /// Resize to the canvas size, ignoring aspect ratio.
    Stretch,
}

impl FromStr for FitMode {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cover" => Ok(FitMode::Cover),
            "contain" => Ok(FitMode::Contain),
            "stretch" => Ok(FitMode::Stretch),
            other => Err(ThumbError::Image(format!(
                "unknown fit mode '{}' (expected cover, contain or stretch)",
                other
            ))),
        }
    }
}

/// Size a `cover` fit scales to before cropping.
///
/// The axis that is relatively shorter is matched exactly; the other is
/// truncated, never below the target.
pub fn cover_size(src: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let src_ratio = src.0 as f64 / src.1 as f64;
    let target_ratio = target.0 as f64 / target.1 as f64;

    if src_ratio > target_ratio {
        let w = (target.1 as f64 * src_ratio) as u32;
        (w.max(target.0), target.1)
    } else {
        let h = (target.0 as f64 / src_ratio) as u32;
        (target.0, h.max(target.1))
    }
}

/// Produce the image that will be placed on a `width × height` canvas.
///
/// `cover` and `stretch` return exactly `width × height`; `contain` returns
/// the scaled image, at most that size with one side matching.
pub fn fit_image(image: &DynamicImage, width: u32, height: u32, mode: FitMode) -> Result<RgbaImage> {
    let (sw, sh) = image.dimensions();
    if sw == 0 || sh == 0 {
        return Err(ThumbError::Image("source image is empty".to_string()));
    }
    if width == 0 || height == 0 {
        return Err(ThumbError::Image(format!(
            "cannot fit onto a {}x{} canvas",
            width, height
        )));
    }

    let fitted = match mode {
        FitMode::Cover => {
            let (nw, nh) = cover_size((sw, sh), (width, height));
            let resized = image.resize_exact(nw, nh, RESAMPLE);
            let left = (nw - width) / 2;
            let top = (nh - height) / 2;
            resized.crop_imm(left, top, width, height).to_rgba8()
        }
        FitMode::Contain => image.resize(width, height, RESAMPLE).to_rgba8(),
        FitMode::Stretch => image.resize_exact(width, height, RESAMPLE).to_rgba8(),
    };

    Ok(fitted)
}
