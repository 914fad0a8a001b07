//! TTF/OTF/TTC text rendering.
//!
//! Lays out a line (or several, split on `\n`) with ab_glyph, measures the
//! union of the glyph ink boxes and rasterizes into an anti-aliased coverage
//! mask cropped to exactly that box.

use ab_glyph::{Font, FontArc, Glyph, OutlinedGlyph, PxScale, ScaleFont, point};

use super::GlyphMask;

/// A loaded outline font at a fixed pixel size.
#[derive(Clone)]
pub struct OutlineFont {
    font: FontArc,
    scale: PxScale,
}

/// Ink bounding box in layout coordinates (min inclusive, max exclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
struct InkBox {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl OutlineFont {
    /// Wrap a parsed font so that `size_px` is the em size in pixels.
    ///
    /// ab_glyph scales by line height (ascent - descent); converting keeps
    /// sizes in templates comparable to point sizes in other tools.
    pub fn new(font: FontArc, size_px: u32) -> Self {
        let size = size_px.max(1) as f32;
        let scale = match font.units_per_em() {
            Some(upem) if upem > 0.0 => PxScale::from(size * font.height_unscaled() / upem),
            _ => PxScale::from(size),
        };
        Self { font, scale }
    }

    /// Position every glyph and outline those with ink.
    fn layout(&self, text: &str) -> Vec<OutlinedGlyph> {
        let scaled = self.font.as_scaled(self.scale);
        let line_height = scaled.height() + scaled.line_gap();

        let mut outlined = Vec::new();
        let mut caret_x = 0.0f32;
        let mut baseline_y = scaled.ascent();
        let mut previous = None;

        for ch in text.chars() {
            if ch == '\n' {
                caret_x = 0.0;
                baseline_y += line_height;
                previous = None;
                continue;
            }

            let glyph_id = self.font.glyph_id(ch);
            if let Some(prev) = previous {
                caret_x += scaled.kern(prev, glyph_id);
            }

            let glyph: Glyph =
                glyph_id.with_scale_and_position(self.scale, point(caret_x, baseline_y));
            caret_x += scaled.h_advance(glyph_id);
            previous = Some(glyph_id);

            if let Some(g) = self.font.outline_glyph(glyph) {
                outlined.push(g);
            }
        }

        outlined
    }

    fn ink_box(glyphs: &[OutlinedGlyph]) -> Option<InkBox> {
        glyphs.iter().fold(None, |acc, g| {
            let b = g.px_bounds();
            let next = InkBox {
                min_x: b.min.x.floor() as i32,
                min_y: b.min.y.floor() as i32,
                max_x: b.max.x.ceil() as i32,
                max_y: b.max.y.ceil() as i32,
            };
            Some(match acc {
                None => next,
                Some(a) => InkBox {
                    min_x: a.min_x.min(next.min_x),
                    min_y: a.min_y.min(next.min_y),
                    max_x: a.max_x.max(next.max_x),
                    max_y: a.max_y.max(next.max_y),
                },
            })
        })
    }

    /// Width and height of the text's ink box. Whitespace-only text is 0×0.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match Self::ink_box(&self.layout(text)) {
            Some(b) => ((b.max_x - b.min_x) as u32, (b.max_y - b.min_y) as u32),
            None => (0, 0),
        }
    }

    /// Render text into a coverage mask the size of its ink box.
    pub fn rasterize(&self, text: &str) -> GlyphMask {
        let glyphs = self.layout(text);
        let Some(ink) = Self::ink_box(&glyphs) else {
            return GlyphMask::new(0, 0);
        };

        let width = (ink.max_x - ink.min_x) as u32;
        let height = (ink.max_y - ink.min_y) as u32;
        let mut mask = GlyphMask::new(width, height);

        for g in &glyphs {
            let bounds = g.px_bounds();
            let ox = bounds.min.x.floor() as i32 - ink.min_x;
            let oy = bounds.min.y.floor() as i32 - ink.min_y;
            g.draw(|px, py, coverage| {
                // Accumulate coverage (clamped)
                mask.add(ox + px as i32, oy + py as i32, coverage);
            });
        }

        mask
    }
}
