//! # Quick Layout Presets
//!
//! The template-free flow: pick a text style and a placement, type a title
//! and artist, and optionally a subtitle, description and release date.
//!
//! | Style     | Title | Artist | Fill      | Stroke          | Shadow             |
//! |-----------|-------|--------|-----------|-----------------|--------------------|
//! | `impact`  | 80    | 56     | `#FFFFFF` | 8 `#000000`     | `#000000` (4, 4)   |
//! | `pop`     | 72    | 48     | `#FFEB3B` | 6 `#E91E63`     | `#000000` (3, 3)   |
//! | `simple`  | 64    | 40     | `#FFFFFF` | 3 `#000000`     | none               |
//! | `elegant` | 60    | 36     | `#FFFFFF` | 2 `#333333`     | `#666666` (2, 2)   |
//! | `neon`    | 72    | 48     | `#00FFFF` | 4 `#FF00FF`     | `#0000FF` (3, 3)   |
//!
//! Placements are laid out for a 1280×720 canvas.

use image::Rgba;

use crate::color;
use crate::compose::{Compositor, FitMode, Shadow, TextStyle};
use crate::geometry::Anchor;
use crate::render::{ImageSource, Layer, RenderOutcome, Warnings};
use crate::template::DEFAULT_BACKGROUND;

/// Style names accepted by [`StylePreset::by_name`], in menu order.
pub const STYLE_NAMES: &[&str] = &["impact", "pop", "simple", "elegant", "neon"];

/// Placement names accepted by [`Placement::by_name`], in menu order.
pub const PLACEMENT_NAMES: &[&str] = &["top-left", "middle-left", "bottom-left", "center", "right"];

/// Look shared by the title and artist lines.
#[derive(Debug, Clone, PartialEq)]
pub struct StylePreset {
    pub name: &'static str,
    pub display_name: &'static str,
    pub title_size: u32,
    pub artist_size: u32,
    pub color: Rgba<u8>,
    pub stroke_width: u32,
    pub stroke_color: Rgba<u8>,
    pub shadow: Option<Shadow>,
}

fn rgba(hex: &str) -> Rgba<u8> {
    color::known(hex).rgba()
}

fn shadow(hex: &str, offset: (i32, i32)) -> Option<Shadow> {
    Some(Shadow {
        offset,
        color: rgba(hex),
    })
}

impl StylePreset {
    pub fn by_name(name: &str) -> Option<Self> {
        let preset = match name.to_lowercase().as_str() {
            "impact" => Self::impact(),
            "pop" => Self {
                name: "pop",
                display_name: "ポップ",
                title_size: 72,
                artist_size: 48,
                color: rgba("#FFEB3B"),
                stroke_width: 6,
                stroke_color: rgba("#E91E63"),
                shadow: shadow("#000000", (3, 3)),
            },
            "simple" => Self {
                name: "simple",
                display_name: "シンプル",
                title_size: 64,
                artist_size: 40,
                color: rgba("#FFFFFF"),
                stroke_width: 3,
                stroke_color: rgba("#000000"),
                shadow: None,
            },
            "elegant" => Self {
                name: "elegant",
                display_name: "エレガント",
                title_size: 60,
                artist_size: 36,
                color: rgba("#FFFFFF"),
                stroke_width: 2,
                stroke_color: rgba("#333333"),
                shadow: shadow("#666666", (2, 2)),
            },
            "neon" => Self {
                name: "neon",
                display_name: "ネオン",
                title_size: 72,
                artist_size: 48,
                color: rgba("#00FFFF"),
                stroke_width: 4,
                stroke_color: rgba("#FF00FF"),
                shadow: shadow("#0000FF", (3, 3)),
            },
            _ => return None,
        };
        Some(preset)
    }

    fn impact() -> Self {
        Self {
            name: "impact",
            display_name: "インパクト",
            title_size: 80,
            artist_size: 56,
            color: rgba("#FFFFFF"),
            stroke_width: 8,
            stroke_color: rgba("#000000"),
            shadow: shadow("#000000", (4, 4)),
        }
    }

    fn text_style(&self, font_size: u32, anchor: Anchor) -> TextStyle {
        TextStyle {
            font_size,
            color: self.color,
            anchor,
            stroke_width: self.stroke_width,
            stroke_color: self.stroke_color,
            shadow: self.shadow,
        }
    }
}

impl Default for StylePreset {
    fn default() -> Self {
        Self::impact()
    }
}

/// Where the title and artist lines go.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub name: &'static str,
    pub title: (i32, i32),
    pub artist: (i32, i32),
    pub anchor: &'static str,
}

impl Placement {
    pub fn by_name(name: &str) -> Option<Self> {
        let (name, title, artist, anchor) = match name.to_lowercase().as_str() {
            "top-left" => ("top-left", (50, 120), (50, 220), "left"),
            "middle-left" => ("middle-left", (50, 300), (50, 400), "left"),
            "bottom-left" => ("bottom-left", (50, 480), (50, 580), "left"),
            "center" => ("center", (640, 300), (640, 420), "center"),
            "right" => ("right", (1230, 300), (1230, 400), "right"),
            _ => return None,
        };
        Some(Self {
            name,
            title,
            artist,
            anchor,
        })
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            name: "top-left",
            title: (50, 120),
            artist: (50, 220),
            anchor: "left",
        }
    }
}

/// Common output sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

pub const CANVAS_SIZES: &[CanvasSize] = &[
    CanvasSize {
        name: "youtube-thumbnail",
        width: 1280,
        height: 720,
    },
    CanvasSize {
        name: "x-header",
        width: 1500,
        height: 500,
    },
    CanvasSize {
        name: "youtube-channel-art",
        width: 2560,
        height: 1440,
    },
    CanvasSize {
        name: "niconico-header",
        width: 1280,
        height: 300,
    },
];

impl CanvasSize {
    pub fn by_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        CANVAS_SIZES.iter().copied().find(|s| s.name == name)
    }
}

/// Everything typed into the quick layout form.
#[derive(Debug, Clone, Default)]
pub struct QuickLayout {
    pub title: String,
    pub artist: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub style: StylePreset,
    pub placement: Placement,
}

/// Secondary lines: fixed size, white, 2px black outline, no shadow.
fn secondary(font_size: u32, color: Rgba<u8>, anchor: Anchor) -> TextStyle {
    TextStyle {
        stroke_width: 2,
        stroke_color: rgba("#000000"),
        ..TextStyle::plain(font_size, color, anchor)
    }
}

fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.is_empty())
}

/// Draw a quick layout: background, then subtitle (60px above the title),
/// title, artist, description (70px below the artist) and the date near the
/// bottom-right corner. Empty lines are skipped.
pub fn render_quick(
    compositor: &mut Compositor,
    background: Option<&ImageSource>,
    layout: &QuickLayout,
) -> RenderOutcome {
    let mut warnings = Warnings::default();
    compositor.create_canvas(&color::known(DEFAULT_BACKGROUND));

    if let Some(source) = background {
        let result = source
            .load()
            .and_then(|image| compositor.set_background(&image, FitMode::Cover));
        warnings.check(Layer::Background, result);
    }

    let anchor = Anchor::for_text(layout.placement.anchor);
    let (title_x, title_y) = layout.placement.title;
    let (artist_x, artist_y) = layout.placement.artist;
    let white = rgba("#FFFFFF");

    if let Some(subtitle) = non_empty(&layout.subtitle) {
        let result = compositor.draw_text(subtitle, (title_x, title_y - 60), &secondary(28, white, anchor));
        warnings.check(Layer::Text, result);
    }

    if !layout.title.is_empty() {
        let style = layout.style.text_style(layout.style.title_size, anchor);
        let result = compositor.draw_text(&layout.title, layout.placement.title, &style);
        warnings.check(Layer::Text, result);
    }

    if !layout.artist.is_empty() {
        let style = layout.style.text_style(layout.style.artist_size, anchor);
        let result = compositor.draw_text(&layout.artist, layout.placement.artist, &style);
        warnings.check(Layer::Text, result);
    }

    if let Some(description) = non_empty(&layout.description) {
        let result =
            compositor.draw_text(description, (artist_x, artist_y + 70), &secondary(24, white, anchor));
        warnings.check(Layer::Text, result);
    }

    if let Some(date) = non_empty(&layout.date) {
        // (1230, 670) on the default canvas
        let at = (compositor.width() as i32 - 50, compositor.height() as i32 - 50);
        let style = secondary(24, rgba("#FFEB3B"), Anchor::for_text("right"));
        let result = compositor.draw_text(date, at, &style);
        warnings.check(Layer::Text, result);
    }

    RenderOutcome {
        image: compositor.take_image(),
        warnings: warnings.into_vec(),
    }
}
