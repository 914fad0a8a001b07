//! # Font Resolution
//!
//! Finds a usable font for a requested pixel size and turns text into
//! coverage masks that the compositor paints with fill, stroke and shadow
//! colors.
//!
//! ## Resolution order
//!
//! ```text
//! configured extra paths → platform candidates → built-in Spleen 12×24
//! ```
//!
//! The first candidate that exists and parses wins. Font bytes are read once
//! per path and shared between sizes; a path that failed to parse is
//! remembered and not retried. Resolution never fails.

mod bitmap;
mod outline;

use ab_glyph::FontArc;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub use outline::OutlineFont;

/// Platform font files probed in order. Japanese-capable faces come first
/// because titles and artist names are usually Japanese.
pub const FONT_CANDIDATES: &[&str] = &[
    // Windows
    "C:/Windows/Fonts/meiryo.ttc",
    "C:/Windows/Fonts/msgothic.ttc",
    "C:/Windows/Fonts/YuGothM.ttc",
    // macOS
    "/System/Library/Fonts/ヒラギノ角ゴシック W6.ttc",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "/Library/Fonts/Arial Unicode.ttf",
    // Linux
    "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/noto/NotoSansJP-Regular.otf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];

/// Anti-aliased text coverage: 0.0 = no ink, 1.0 = full ink.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    pub width: u32,
    pub height: u32,
    /// Row-major, `width * height` entries.
    pub coverage: Vec<f32>,
}

impl GlyphMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            coverage: vec![0.0; width as usize * height as usize],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Coverage at (x, y); 0.0 outside the mask.
    pub fn get(&self, x: i32, y: i32) -> f32 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0.0;
        }
        self.coverage[y as usize * self.width as usize + x as usize]
    }

    /// Add coverage at (x, y), clamped to 1.0. Out-of-bounds writes are dropped.
    pub fn add(&mut self, x: i32, y: i32, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.coverage[idx] = (self.coverage[idx] + coverage).min(1.0);
    }

    /// Grow the ink by a disc of `radius` pixels (outline stroke).
    ///
    /// The result is padded by `radius` on every side, so the original mask
    /// sits at offset `(radius, radius)` inside it.
    pub fn dilate(&self, radius: u32) -> GlyphMask {
        if radius == 0 {
            return self.clone();
        }

        let r = radius as i32;
        let mut out = GlyphMask::new(self.width + 2 * radius, self.height + 2 * radius);

        // Disc offsets, computed once
        let offsets: Vec<(i32, i32)> = (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
            .filter(|(dx, dy)| dx * dx + dy * dy <= r * r)
            .collect();

        for y in 0..out.height as i32 {
            for x in 0..out.width as i32 {
                let sx = x - r;
                let sy = y - r;
                let mut best = 0.0f32;
                for &(dx, dy) in &offsets {
                    let c = self.get(sx + dx, sy + dy);
                    if c > best {
                        best = c;
                        if best >= 1.0 {
                            break;
                        }
                    }
                }
                out.coverage[y as usize * out.width as usize + x as usize] = best;
            }
        }

        out
    }
}

/// A font ready to measure and rasterize text at one size.
#[derive(Clone)]
pub enum FontHandle {
    /// Scalable font loaded from disk.
    Outline(OutlineFont),
    /// Built-in fixed-size fallback.
    Bitmap,
}

impl FontHandle {
    pub fn is_bitmap(&self) -> bool {
        matches!(self, FontHandle::Bitmap)
    }

    /// Pixel size of the text's ink box.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match self {
            FontHandle::Outline(f) => f.measure(text),
            FontHandle::Bitmap => bitmap::measure(text),
        }
    }

    /// Coverage mask of exactly [`measure`](Self::measure) size.
    pub fn rasterize(&self, text: &str) -> GlyphMask {
        match self {
            FontHandle::Outline(f) => f.rasterize(text),
            FontHandle::Bitmap => bitmap::rasterize(text),
        }
    }
}

/// Probes candidate font files and hands out [`FontHandle`]s.
pub struct FontResolver {
    candidates: Vec<PathBuf>,
    /// `None` marks a path that exists but failed to parse.
    loaded: HashMap<PathBuf, Option<FontArc>>,
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FontResolver {
    /// Resolver probing `extra` first, then [`FONT_CANDIDATES`].
    pub fn new(extra: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut candidates: Vec<PathBuf> = extra.into_iter().collect();
        candidates.extend(FONT_CANDIDATES.iter().map(PathBuf::from));
        Self::with_candidates(candidates)
    }

    /// Resolver probing exactly `candidates`, in order.
    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            loaded: HashMap::new(),
        }
    }

    /// Resolver that always returns the built-in bitmap font.
    pub fn bitmap_only() -> Self {
        Self::with_candidates(Vec::new())
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First usable candidate at `size_px`, else the bitmap fallback.
    pub fn resolve(&mut self, size_px: u32) -> FontHandle {
        for i in 0..self.candidates.len() {
            let path = self.candidates[i].clone();
            if let Some(font) = self.load(&path) {
                return FontHandle::Outline(OutlineFont::new(font, size_px));
            }
        }
        log::debug!("no candidate font usable, using built-in bitmap font");
        FontHandle::Bitmap
    }

    fn load(&mut self, path: &Path) -> Option<FontArc> {
        if let Some(cached) = self.loaded.get(path) {
            return cached.clone();
        }
        if !path.exists() {
            return None;
        }

        let font = fs::read(path)
            .map_err(|e| e.to_string())
            .and_then(|data| FontArc::try_from_vec(data).map_err(|e| e.to_string()));

        let entry = match font {
            Ok(font) => {
                log::debug!("loaded font {}", path.display());
                Some(font)
            }
            Err(e) => {
                log::debug!("skipping font {}: {}", path.display(), e);
                None
            }
        };
        self.loaded.insert(path.to_path_buf(), entry.clone());
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_candidates_fall_back_to_bitmap() {
        let mut resolver =
            FontResolver::with_candidates(vec![PathBuf::from("/definitely/not/a/font.ttf")]);
        assert!(resolver.resolve(72).is_bitmap());
    }

    #[test]
    fn test_corrupt_font_is_skipped_and_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("broken.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();

        let mut resolver = FontResolver::with_candidates(vec![bogus.clone()]);
        assert!(resolver.resolve(48).is_bitmap());
        assert_eq!(resolver.loaded.get(&bogus).map(|f| f.is_none()), Some(true));
        assert!(resolver.resolve(24).is_bitmap());
    }

    #[test]
    fn test_extra_paths_probe_first() {
        let resolver = FontResolver::new(vec![PathBuf::from("/opt/fonts/custom.ttf")]);
        assert_eq!(resolver.candidates()[0], PathBuf::from("/opt/fonts/custom.ttf"));
        assert_eq!(resolver.candidates().len(), FONT_CANDIDATES.len() + 1);
    }

    #[test]
    fn test_bitmap_ignores_size() {
        let mut resolver = FontResolver::bitmap_only();
        let small = resolver.resolve(12).measure("NEW");
        let large = resolver.resolve(96).measure("NEW");
        assert_eq!(small, large);
    }

    #[test]
    fn test_dilate_pads_and_grows() {
        let mut mask = GlyphMask::new(1, 1);
        mask.add(0, 0, 1.0);
        let grown = mask.dilate(2);
        assert_eq!((grown.width, grown.height), (5, 5));
        assert_eq!(grown.get(2, 2), 1.0);
        assert_eq!(grown.get(0, 2), 1.0);
        assert_eq!(grown.get(2, 4), 1.0);
        // corners are outside the disc
        assert_eq!(grown.get(0, 0), 0.0);
    }

    #[test]
    fn test_mask_add_clamps() {
        let mut mask = GlyphMask::new(2, 2);
        mask.add(1, 1, 0.7);
        mask.add(1, 1, 0.7);
        mask.add(5, 5, 1.0);
        assert_eq!(mask.get(1, 1), 1.0);
        assert_eq!(mask.get(-1, 0), 0.0);
    }
}
