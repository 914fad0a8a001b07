//! Text, badge and caption rasterization onto an RGBA canvas.
//!
//! Every text layer is a [`GlyphMask`] painted in one color. Strokes are the
//! same mask grown by a disc, painted underneath the fill; shadows are the
//! fill mask offset and painted first.

use image::{Pixel, Rgba, RgbaImage};

use crate::color::HexColor;
use crate::font::GlyphMask;
use crate::geometry::Anchor;
use crate::template::TextElement;

/// Drop shadow under a text fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub offset: (i32, i32),
    pub color: Rgba<u8>,
}

/// Resolved look of one text draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size: u32,
    pub color: Rgba<u8>,
    pub anchor: Anchor,
    /// Outline radius in pixels; 0 draws fill only.
    pub stroke_width: u32,
    pub stroke_color: Rgba<u8>,
    pub shadow: Option<Shadow>,
}

impl TextStyle {
    /// Plain fill with no outline or shadow.
    pub fn plain(font_size: u32, color: Rgba<u8>, anchor: Anchor) -> Self {
        Self {
            font_size,
            color,
            anchor,
            stroke_width: 0,
            stroke_color: Rgba([0, 0, 0, 255]),
            shadow: None,
        }
    }

    /// Style for a template text element. Shadow color/offset fall back to
    /// `default_shadow` when the element does not override them.
    pub fn from_element(element: &TextElement, default_shadow: Shadow) -> Self {
        let shadow = element.shadow.then(|| Shadow {
            offset: element.shadow_offset.unwrap_or(default_shadow.offset),
            color: element
                .shadow_color
                .as_ref()
                .map(HexColor::rgba)
                .unwrap_or(default_shadow.color),
        });

        Self {
            font_size: element.font_size,
            color: element.font_color.rgba(),
            anchor: Anchor::for_text(&element.anchor),
            stroke_width: element.stroke_width,
            stroke_color: element.stroke_color.rgba(),
            shadow,
        }
    }
}

/// Look of a caption stamped relative to the canvas edges.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionStyle {
    /// `None` picks max(20, 5% of the canvas height).
    pub font_size: Option<u32>,
    pub color: Rgba<u8>,
    pub stroke_color: Rgba<u8>,
    pub stroke_width: u32,
    /// Distance from the edges for non-centered placements.
    pub margin: i32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_size: None,
            color: Rgba([255, 255, 255, 255]),
            stroke_color: Rgba([0, 0, 0, 255]),
            stroke_width: 2,
            margin: 20,
        }
    }
}

impl CaptionStyle {
    pub fn size_for(&self, canvas_height: u32) -> u32 {
        self.font_size
            .unwrap_or_else(|| ((canvas_height as f32 * 0.05) as u32).max(20))
    }
}

/// Blend `color` through `mask` onto `canvas` with the mask's top-left at
/// `origin`. Pixels outside the canvas are clipped.
pub fn paint_mask(canvas: &mut RgbaImage, mask: &GlyphMask, origin: (i32, i32), color: Rgba<u8>) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);

    for my in 0..mask.height {
        let y = origin.1 as i64 + my as i64;
        if y < 0 || y >= ch {
            continue;
        }
        for mx in 0..mask.width {
            let x = origin.0 as i64 + mx as i64;
            if x < 0 || x >= cw {
                continue;
            }
            let coverage = mask.coverage[(my * mask.width + mx) as usize];
            if coverage <= 0.0 {
                continue;
            }
            let alpha = (coverage.min(1.0) * color[3] as f32).round() as u8;
            if alpha == 0 {
                continue;
            }
            let src = Rgba([color[0], color[1], color[2], alpha]);
            canvas.get_pixel_mut(x as u32, y as u32).blend(&src);
        }
    }
}

/// Paint shadow, stroke and fill of an already-rasterized text mask whose
/// top-left sits at `origin`.
pub fn paint_text(canvas: &mut RgbaImage, mask: &GlyphMask, origin: (i32, i32), style: &TextStyle) {
    if let Some(shadow) = style.shadow {
        let at = (origin.0 + shadow.offset.0, origin.1 + shadow.offset.1);
        paint_mask(canvas, mask, at, shadow.color);
    }

    if style.stroke_width > 0 {
        let r = style.stroke_width as i32;
        let outline = mask.dilate(style.stroke_width);
        paint_mask(canvas, &outline, (origin.0 - r, origin.1 - r), style.stroke_color);
    }

    paint_mask(canvas, mask, origin, style.color);
}

/// Fill a rounded rectangle covering the whole of `image`.
pub fn fill_rounded_rect(image: &mut RgbaImage, radius: u32, color: Rgba<u8>) {
    let (w, h) = image.dimensions();
    let r = radius.min(w / 2).min(h / 2) as f32;

    for (x, y, px) in image.enumerate_pixels_mut() {
        // Distance from the pixel center to the nearest corner circle center
        let cx = (x as f32 + 0.5).clamp(r, w as f32 - r);
        let cy = (y as f32 + 0.5).clamp(r, h as f32 - r);
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        if dx * dx + dy * dy <= r * r {
            *px = color;
        }
    }
}

/// Badge raster: rounded background with the text inset by `padding`.
pub fn label_image(
    mask: &GlyphMask,
    padding: (u32, u32),
    radius: u32,
    background: Rgba<u8>,
    text_color: Rgba<u8>,
) -> RgbaImage {
    let w = mask.width + 2 * padding.0;
    let h = mask.height + 2 * padding.1;
    let mut label = RgbaImage::new(w, h);
    fill_rounded_rect(&mut label, radius, background);
    paint_mask(&mut label, mask, (padding.0 as i32, padding.1 as i32), text_color);
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(w: u32, h: u32) -> GlyphMask {
        let mut m = GlyphMask::new(w, h);
        m.coverage.iter_mut().for_each(|c| *c = 1.0);
        m
    }

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn test_paint_mask_clips() {
        let mut canvas = RgbaImage::from_pixel(10, 10, BLACK);
        paint_mask(&mut canvas, &block(5, 5), (-2, 8), WHITE);
        assert_eq!(canvas.get_pixel(0, 8), &WHITE);
        assert_eq!(canvas.get_pixel(2, 9), &WHITE);
        assert_eq!(canvas.get_pixel(3, 9), &BLACK);
        assert_eq!(canvas.get_pixel(0, 7), &BLACK);
    }

    #[test]
    fn test_partial_coverage_blends() {
        let mut canvas = RgbaImage::from_pixel(1, 1, BLACK);
        let mut mask = GlyphMask::new(1, 1);
        mask.coverage[0] = 0.5;
        paint_mask(&mut canvas, &mask, (0, 0), WHITE);
        let v = canvas.get_pixel(0, 0)[0];
        assert!((120..=135).contains(&v), "got {}", v);
    }

    #[test]
    fn test_shadow_lands_offset() {
        let mut canvas = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 255, 255]));
        let style = TextStyle {
            shadow: Some(Shadow {
                offset: (3, 3),
                color: BLACK,
            }),
            ..TextStyle::plain(24, WHITE, Anchor::TOP_LEFT)
        };
        paint_text(&mut canvas, &block(10, 10), (5, 5), &style);

        // Fill at origin, shadow peeking out past the fill's bottom-right
        assert_eq!(canvas.get_pixel(5, 5), &WHITE);
        assert_eq!(canvas.get_pixel(16, 16), &BLACK);
        assert_eq!(canvas.get_pixel(20, 20), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_stroke_surrounds_fill() {
        let mut canvas = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 255, 255]));
        let style = TextStyle {
            stroke_width: 2,
            stroke_color: BLACK,
            ..TextStyle::plain(24, WHITE, Anchor::TOP_LEFT)
        };
        paint_text(&mut canvas, &block(10, 10), (10, 10), &style);

        assert_eq!(canvas.get_pixel(15, 15), &WHITE);
        assert_eq!(canvas.get_pixel(8, 15), &BLACK);
        assert_eq!(canvas.get_pixel(21, 15), &BLACK);
        assert_eq!(canvas.get_pixel(5, 15), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_rounded_rect_corners_transparent() {
        let mut img = RgbaImage::new(40, 20);
        fill_rounded_rect(&mut img, 5, WHITE);
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(39, 19)[3], 0);
        assert_eq!(img.get_pixel(20, 0), &WHITE);
        assert_eq!(img.get_pixel(0, 10), &WHITE);
    }

    #[test]
    fn test_label_image_padding() {
        let red = Rgba([255, 0, 0, 255]);
        let label = label_image(&block(12, 24), (20, 10), 5, red, WHITE);
        assert_eq!(label.dimensions(), (52, 44));
        assert_eq!(label.get_pixel(10, 5), &red);
        assert_eq!(label.get_pixel(25, 15), &WHITE);
    }

    #[test]
    fn test_caption_default_size() {
        let style = CaptionStyle::default();
        assert_eq!(style.size_for(720), 36);
        assert_eq!(style.size_for(300), 20);
        let fixed = CaptionStyle {
            font_size: Some(50),
            ..CaptionStyle::default()
        };
        assert_eq!(fixed.size_for(720), 50);
    }

    #[test]
    fn test_style_from_element_overrides() {
        let mut te = TextElement::new("title", "Title");
        let default_shadow = Shadow {
            offset: (3, 3),
            color: BLACK,
        };
        let style = TextStyle::from_element(&te, default_shadow);
        assert_eq!(style.shadow, Some(default_shadow));

        te.shadow_offset = Some((5, 7));
        te.shadow_color = Some(HexColor::parse("#333333").unwrap());
        let style = TextStyle::from_element(&te, default_shadow);
        let shadow = style.shadow.unwrap();
        assert_eq!(shadow.offset, (5, 7));
        assert_eq!(shadow.color, Rgba([0x33, 0x33, 0x33, 255]));

        te.shadow = false;
        assert!(TextStyle::from_element(&te, default_shadow).shadow.is_none());
    }
}
