//! # Layer Compositor
//!
//! A [`Compositor`] owns one RGBA canvas and stacks layers onto it in call
//! order: background, gradient, sprites, badges, text.
//!
//! ## Lifecycle
//!
//! | Phase    | Calls                                                        |
//! |----------|--------------------------------------------------------------|
//! | init     | `create_canvas`, `set_background`, `set_background_image`    |
//! | compose  | `paste_sprite`, `draw_label`, `draw_text`, `add_gradient_overlay`, `draw_caption` |
//! | finalize | `image`, `into_image`, `encode`, `save`                      |
//!
//! Compose calls on a compositor with no canvas yet create one in
//! [`DEFAULT_BACKGROUND`]. Every compose call returns a `Result`; on error the
//! canvas is exactly as it was before the call.

mod fit;
mod gradient;
mod text;

pub use fit::{FitMode, RESAMPLE, cover_size, fit_image};
pub use gradient::{gradient_image, ramp};
pub use text::{CaptionStyle, Shadow, TextStyle, fill_rounded_rect, label_image, paint_mask, paint_text};

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage, imageops};
use std::path::Path;

use crate::color::{self, HexColor};
use crate::error::{Result, ThumbError};
use crate::font::FontResolver;
use crate::geometry::{Anchor, anchor_at, anchor_origin};
use crate::output::{self, OutputFormat};
use crate::template::{DEFAULT_BACKGROUND, GradientDirection, LabelSpec};

/// Canvas-wide drawing defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositorStyle {
    /// Drop shadow for text elements that do not override it.
    pub shadow: Shadow,
    /// Horizontal and vertical space between badge text and badge edge.
    pub label_padding: (u32, u32),
    pub label_radius: u32,
}

impl Default for CompositorStyle {
    fn default() -> Self {
        Self {
            shadow: Shadow {
                offset: (3, 3),
                color: Rgba([0, 0, 0, 255]),
            },
            label_padding: (20, 10),
            label_radius: 5,
        }
    }
}

/// Single-canvas layer compositor.
pub struct Compositor {
    width: u32,
    height: u32,
    canvas: Option<RgbaImage>,
    fonts: FontResolver,
    style: CompositorStyle,
}

impl Compositor {
    /// Compositor for a `width × height` canvas using the default font
    /// candidates. No canvas exists until the first init or compose call.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            canvas: None,
            fonts: FontResolver::default(),
            style: CompositorStyle::default(),
        }
    }

    /// Compositor wrapping an existing image as its canvas.
    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            canvas: Some(image),
            ..Self::new(width, height)
        }
    }

    pub fn with_fonts(mut self, fonts: FontResolver) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn with_style(mut self, style: CompositorStyle) -> Self {
        self.style = style;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn style(&self) -> &CompositorStyle {
        &self.style
    }

    pub fn fonts_mut(&mut self) -> &mut FontResolver {
        &mut self.fonts
    }

    pub fn has_canvas(&self) -> bool {
        self.canvas.is_some()
    }

    /// Drop the canvas so the next render starts from scratch.
    pub fn clear(&mut self) {
        self.canvas = None;
    }

    fn canvas_mut(&mut self) -> &mut RgbaImage {
        let (w, h) = (self.width, self.height);
        self.canvas.get_or_insert_with(|| default_canvas(w, h))
    }

    // ------------------------------------------------------------------------
    // Init
    // ------------------------------------------------------------------------

    /// Replace the canvas with a solid fill.
    pub fn create_canvas(&mut self, color: &HexColor) {
        self.canvas = Some(RgbaImage::from_pixel(self.width, self.height, color.rgba()));
    }

    /// Decode `path` and use it as the background.
    pub fn set_background_image(&mut self, path: &Path, mode: FitMode) -> Result<()> {
        let image = open_image(path)?;
        self.set_background(&image, mode)
    }

    /// Fit `image` onto the canvas.
    ///
    /// `cover` and `stretch` replace the canvas; `contain` centers the scaled
    /// image on the current canvas so its fill shows around it.
    pub fn set_background(&mut self, image: &DynamicImage, mode: FitMode) -> Result<()> {
        let fitted = fit_image(image, self.width, self.height, mode)?;

        match mode {
            FitMode::Contain => {
                let x = (self.width - fitted.width()) / 2;
                let y = (self.height - fitted.height()) / 2;
                imageops::overlay(self.canvas_mut(), &fitted, x as i64, y as i64);
            }
            FitMode::Cover | FitMode::Stretch => self.canvas = Some(fitted),
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Compose
    // ------------------------------------------------------------------------

    /// Decode `path` and composite it as a sprite.
    pub fn paste_sprite(
        &mut self,
        path: &Path,
        position: (i32, i32),
        size: Option<(u32, u32)>,
        anchor: &str,
    ) -> Result<()> {
        let image = open_image(path)?;
        self.paste_sprite_image(&image, position, size, anchor)
    }

    /// Composite `image` with its `anchor` point on `position`, resized to
    /// exactly `size` when given. Alpha is respected.
    pub fn paste_sprite_image(
        &mut self,
        image: &DynamicImage,
        position: (i32, i32),
        size: Option<(u32, u32)>,
        anchor: &str,
    ) -> Result<()> {
        let (sw, sh) = image.dimensions();
        if sw == 0 || sh == 0 {
            return Err(ThumbError::Image("sprite image is empty".to_string()));
        }

        let sprite = match size {
            Some((0, _)) | Some((_, 0)) => {
                return Err(ThumbError::Image(format!(
                    "invalid sprite size {:?}",
                    size.unwrap_or_default()
                )));
            }
            Some((w, h)) if (w, h) != (sw, sh) => image.resize_exact(w, h, RESAMPLE).to_rgba8(),
            _ => image.to_rgba8(),
        };

        let (x, y) = anchor_at(position, sprite.dimensions(), Anchor::for_sprite(anchor));
        imageops::overlay(self.canvas_mut(), &sprite, x as i64, y as i64);
        Ok(())
    }

    /// Draw `text` with its anchor point on `position`.
    ///
    /// Empty text, or text with no ink, leaves the canvas untouched.
    pub fn draw_text(&mut self, text: &str, position: (i32, i32), style: &TextStyle) -> Result<()> {
        let mask = self.fonts.resolve(style.font_size).rasterize(text);
        if mask.is_empty() {
            return Ok(());
        }

        let origin = anchor_at(position, (mask.width, mask.height), style.anchor);
        paint_text(self.canvas_mut(), &mask, origin, style);
        Ok(())
    }

    /// Draw a rounded badge with its top-left corner at the label position.
    pub fn draw_label(&mut self, label: &LabelSpec) -> Result<()> {
        let mask = self.fonts.resolve(label.font_size).rasterize(&label.text);
        let badge = label_image(
            &mask,
            self.style.label_padding,
            self.style.label_radius,
            label.bg_color.rgba(),
            label.text_color.rgba(),
        );

        let (x, y) = label.position;
        imageops::overlay(self.canvas_mut(), &badge, x as i64, y as i64);
        Ok(())
    }

    /// Darken (or tint) toward one edge with a linear alpha ramp.
    pub fn add_gradient_overlay(
        &mut self,
        direction: GradientDirection,
        color: &HexColor,
        opacity: f32,
    ) -> Result<()> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(ThumbError::Image(format!(
                "gradient opacity {} outside 0..=1",
                opacity
            )));
        }

        let overlay = gradient_image(self.width, self.height, direction, color, opacity);
        imageops::overlay(self.canvas_mut(), &overlay, 0, 0);
        Ok(())
    }

    /// Stamp `text` relative to the canvas edges (`"top-left"`,
    /// `"bottom-right"`, `"center"`, ...).
    pub fn draw_caption(&mut self, text: &str, placement: &str, style: &CaptionStyle) -> Result<()> {
        let size = style.size_for(self.height);
        let mask = self.fonts.resolve(size).rasterize(text);
        if mask.is_empty() {
            return Ok(());
        }

        let origin = anchor_origin(
            self.width,
            self.height,
            mask.width,
            mask.height,
            placement,
            style.margin,
        );
        let text_style = TextStyle {
            stroke_width: style.stroke_width,
            stroke_color: style.stroke_color,
            ..TextStyle::plain(size, style.color, Anchor::TOP_LEFT)
        };
        paint_text(self.canvas_mut(), &mask, origin, &text_style);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Finalize
    // ------------------------------------------------------------------------

    /// Current canvas, if any layer has been drawn.
    pub fn image(&self) -> Option<&RgbaImage> {
        self.canvas.as_ref()
    }

    /// Take the canvas, creating the default fill if nothing was drawn.
    pub fn into_image(mut self) -> RgbaImage {
        self.take_image()
    }

    /// Take the canvas and leave the compositor empty for the next render.
    pub fn take_image(&mut self) -> RgbaImage {
        let (w, h) = (self.width, self.height);
        self.canvas.take().unwrap_or_else(|| default_canvas(w, h))
    }

    pub fn encode(&self, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
        let canvas = self.require_canvas()?;
        output::encode_image(canvas, format, jpeg_quality)
    }

    pub fn save(&self, path: &Path, format: OutputFormat, jpeg_quality: u8) -> Result<()> {
        let canvas = self.require_canvas()?;
        output::save_image(canvas, path, format, jpeg_quality)
    }

    fn require_canvas(&self) -> Result<&RgbaImage> {
        self.canvas
            .as_ref()
            .ok_or_else(|| ThumbError::Output("nothing has been drawn yet".to_string()))
    }
}

fn default_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color::known(DEFAULT_BACKGROUND).rgba())
}

/// Decode an image file, mapping failures to [`ThumbError::Image`].
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| ThumbError::Image(format!("{}: {}", path.display(), e)))
}

/// Copy of `image` with `title` stamped at `placement`.
pub fn stamp_caption(
    image: &RgbaImage,
    title: &str,
    placement: &str,
    style: &CaptionStyle,
    fonts: FontResolver,
) -> Result<RgbaImage> {
    let mut compositor = Compositor::from_image(image.clone()).with_fonts(fonts);
    compositor.draw_caption(title, placement, style)?;
    Ok(compositor.into_image())
}
