//! Built-in bitmap fallback font.
//!
//! Uses the Spleen 12×24 font, which is compiled into the binary, so text
//! always renders even on a machine with none of the candidate font files.
//! The glyph size is fixed; the requested pixel size is ignored.

use spleen_font::{FONT_12X24, PSF2Font};

use super::GlyphMask;

/// Cell width of the fallback font.
pub const CHAR_WIDTH: u32 = 12;
/// Cell height of the fallback font.
pub const CHAR_HEIGHT: u32 = 24;

/// Generate a glyph bitmap for a character using the Spleen font.
///
/// Returns `CHAR_WIDTH * CHAR_HEIGHT` bytes, 1 for ink and 0 for blank.
/// Characters the font does not carry (CJK, emoji) draw as a box outline.
pub fn generate_glyph(ch: char) -> Vec<u8> {
    let (w, h) = (CHAR_WIDTH as usize, CHAR_HEIGHT as usize);
    let mut glyph = vec![0u8; w * h];

    if ch == ' ' {
        return glyph;
    }

    // Embedded in the crate, so parsing only fails on a broken build.
    let mut spleen = PSF2Font::new(FONT_12X24).expect("embedded Spleen 12x24 font");
    let utf8_bytes = ch.to_string();

    let found = match spleen.glyph_for_utf8(utf8_bytes.as_bytes()) {
        Some(spleen_glyph) => {
            for (row_y, row) in spleen_glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    let idx = row_y * w + col_x;
                    if col_x < w && idx < glyph.len() {
                        glyph[idx] = if on { 1 } else { 0 };
                    }
                }
            }
            true
        }
        None => false,
    };

    if !found {
        draw_box(&mut glyph, w, h);
    }

    glyph
}

/// Draw a box outline in the glyph buffer, inset by one pixel so adjacent
/// boxes stay distinguishable.
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    let (x0, x1) = (1, width - 2);
    let (y0, y1) = (2, height - 3);
    for x in x0..=x1 {
        glyph[y0 * width + x] = 1;
        glyph[y1 * width + x] = 1;
    }
    for y in y0..=y1 {
        glyph[y * width + x0] = 1;
        glyph[y * width + x1] = 1;
    }
}

/// Cell-grid size of a (possibly multi-line) string.
pub fn measure(text: &str) -> (u32, u32) {
    let lines: Vec<&str> = text.split('\n').collect();
    let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
    if cols == 0 {
        return (0, 0);
    }
    (cols * CHAR_WIDTH, lines.len() as u32 * CHAR_HEIGHT)
}

/// Render text into a 0/1 coverage mask, one cell per character.
pub fn rasterize(text: &str) -> GlyphMask {
    let (width, height) = measure(text);
    let mut mask = GlyphMask::new(width, height);
    if width == 0 {
        return mask;
    }

    for (line_idx, line) in text.split('\n').enumerate() {
        let top = line_idx as i32 * CHAR_HEIGHT as i32;
        for (col, ch) in line.chars().enumerate() {
            let left = col as i32 * CHAR_WIDTH as i32;
            let glyph = generate_glyph(ch);
            for (i, &on) in glyph.iter().enumerate() {
                if on != 0 {
                    let gx = (i % CHAR_WIDTH as usize) as i32;
                    let gy = (i / CHAR_WIDTH as usize) as i32;
                    mask.add(left + gx, top + gy, 1.0);
                }
            }
        }
    }

    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_glyph() {
        let glyph = generate_glyph('A');
        assert_eq!(glyph.len(), 12 * 24);
        // Should have some ink pixels
        assert!(glyph.iter().any(|&p| p != 0));
    }

    #[test]
    fn test_space_is_blank() {
        assert!(generate_glyph(' ').iter().all(|&p| p == 0));
    }

    #[test]
    fn test_missing_glyph_draws_box() {
        let glyph = generate_glyph('曲');
        let mut expected = vec![0u8; 12 * 24];
        draw_box(&mut expected, 12, 24);
        assert_eq!(glyph, expected);
    }

    #[test]
    fn test_measure_cells() {
        assert_eq!(measure("NEW"), (36, 24));
        assert_eq!(measure("ab\nabcd"), (48, 48));
        assert_eq!(measure(""), (0, 0));
    }

    #[test]
    fn test_rasterize_matches_measure() {
        let mask = rasterize("LIVE");
        assert_eq!((mask.width, mask.height), (48, 24));
        assert!(mask.coverage.iter().any(|&c| c > 0.0));
    }
}
