//! # Thumbnail Templates
//!
//! A template is a declarative layout: background color and optional
//! gradient, text slots, character slots and badge labels. Templates carry
//! no content; the text a user types and the character image they pick are
//! supplied per render in a [`RenderRequest`](crate::render::RenderRequest).
//!
//! All types derive `Serialize + Deserialize` so the same structs back the
//! built-in table and the JSON files in the templates directory. Missing
//! fields take the defaults listed on each field.
//!
//! ## File format
//!
//! ```json
//! {
//!   "id": "new_song",
//!   "name": "新曲発表",
//!   "description": "新曲リリース告知用のテンプレート",
//!   "background_color": "#1a1a2e",
//!   "background_gradient": {"direction": "bottom", "color": "#000000", "opacity": 0.6},
//!   "text_elements": [{"id": "title", "label": "曲名", "default_text": "新曲タイトル",
//!                      "position": [800, 300], "font_size": 72, "anchor": "left"}],
//!   "character_slots": [{"id": "main_character", "position": [300, 400], "size": [450, 600]}],
//!   "labels": [{"text": "NEW", "position": [50, 50], "bg_color": "#FF0000"}]
//! }
//! ```

mod builtin;
mod catalog;

pub use builtin::{BUILTIN_IDS, builtin_templates};
pub use catalog::{LoadReport, TemplateCatalog, load_template_file};

use serde::{Deserialize, Serialize};

use crate::color::{self, HexColor};
use crate::error::ThumbError;

/// Default canvas background when a template omits one.
pub const DEFAULT_BACKGROUND: &str = "#1a1a2e";

fn default_text_position() -> (i32, i32) {
    (640, 360)
}

fn default_font_size() -> u32 {
    48
}

fn default_white() -> HexColor {
    color::known(HexColor::WHITE)
}

fn default_black() -> HexColor {
    color::known(HexColor::BLACK)
}

fn default_anchor() -> String {
    "center".to_string()
}

fn default_stroke_width() -> u32 {
    2
}

fn default_true() -> bool {
    true
}

fn default_slot_position() -> (i32, i32) {
    (200, 360)
}

fn default_slot_size() -> (u32, u32) {
    (400, 600)
}

fn default_label_bg() -> HexColor {
    color::known("#FF0000")
}

fn default_label_font_size() -> u32 {
    24
}

fn default_background() -> HexColor {
    color::known(DEFAULT_BACKGROUND)
}

// ============================================================================
// TEXT ELEMENTS
// ============================================================================

/// A text slot: where and how one piece of user text is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub id: String,
    /// Label shown next to the input field. Defaults to the id.
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub default_text: String,
    /// Anchor point in canvas coordinates. Default `[640, 360]`.
    #[serde(default = "default_text_position")]
    pub position: (i32, i32),
    /// Em size in pixels. Default 48.
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_white")]
    pub font_color: HexColor,
    /// Which point of the text box sits on `position`. Default `center`.
    #[serde(default = "default_anchor")]
    pub anchor: String,
    /// Outline thickness in pixels; 0 draws fill only. Default 2.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,
    #[serde(default = "default_black")]
    pub stroke_color: HexColor,
    /// Draw a drop shadow. Default true.
    #[serde(default = "default_true")]
    pub shadow: bool,
    /// Overrides the compositor's shadow color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_color: Option<HexColor>,
    /// Overrides the compositor's shadow offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_offset: Option<(i32, i32)>,
}

impl TextElement {
    /// Text element with loader defaults.
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            default_text: String::new(),
            position: default_text_position(),
            font_size: default_font_size(),
            font_color: default_white(),
            anchor: default_anchor(),
            stroke_width: default_stroke_width(),
            stroke_color: default_black(),
            shadow: true,
            shadow_color: None,
            shadow_offset: None,
        }
    }
}

// ============================================================================
// CHARACTER SLOTS
// ============================================================================

/// Where a character cutout is fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSlot {
    pub id: String,
    /// Anchor point in canvas coordinates. Default `[200, 360]`.
    #[serde(default = "default_slot_position")]
    pub position: (i32, i32),
    /// Sprite is resized to exactly this size. Default `[400, 600]`.
    #[serde(default = "default_slot_size")]
    pub size: (u32, u32),
    #[serde(default = "default_anchor")]
    pub anchor: String,
}

// ============================================================================
// LABELS AND GRADIENT
// ============================================================================

/// A rounded-rectangle badge ("NEW", "LIVE", ...).
///
/// Unlike text elements, `position` is always the badge's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSpec {
    pub text: String,
    #[serde(default)]
    pub position: (i32, i32),
    #[serde(default = "default_label_bg")]
    pub bg_color: HexColor,
    #[serde(default = "default_white")]
    pub text_color: HexColor,
    #[serde(default = "default_label_font_size")]
    pub font_size: u32,
}

/// Edge a gradient overlay builds up toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    Top,
    Bottom,
    Left,
    Right,
}

impl std::str::FromStr for GradientDirection {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(ThumbError::Template(format!(
                "unknown gradient direction '{}' (expected top, bottom, left or right)",
                other
            ))),
        }
    }
}

/// Linear alpha ramp over the whole canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    pub direction: GradientDirection,
    #[serde(default = "default_black")]
    pub color: HexColor,
    /// Peak opacity at the named edge, 0.0 to 1.0.
    pub opacity: f32,
}

// ============================================================================
// TEMPLATE
// ============================================================================

/// A complete thumbnail layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_background")]
    pub background_color: HexColor,
    #[serde(default)]
    pub background_gradient: Option<GradientSpec>,
    #[serde(default)]
    pub text_elements: Vec<TextElement>,
    #[serde(default)]
    pub character_slots: Vec<CharacterSlot>,
    #[serde(default)]
    pub labels: Vec<LabelSpec>,
}

impl ThumbnailTemplate {
    /// Empty template with the default background.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            background_color: default_background(),
            background_gradient: None,
            text_elements: Vec::new(),
            character_slots: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Fill in derived defaults (text labels fall back to their id).
    pub fn normalize(&mut self) {
        for te in &mut self.text_elements {
            if te.label.is_empty() {
                te.label = te.id.clone();
            }
        }
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ThumbError> {
        if self.id.trim().is_empty() {
            return Err(ThumbError::Template("template id is empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(ThumbError::Template(format!(
                "template '{}' has an empty name",
                self.id
            )));
        }
        if let Some(g) = &self.background_gradient
            && !(0.0..=1.0).contains(&g.opacity)
        {
            return Err(ThumbError::Template(format!(
                "template '{}': gradient opacity {} outside 0..=1",
                self.id, g.opacity
            )));
        }
        if let Some(te) = self.text_elements.iter().find(|te| te.id.trim().is_empty()) {
            return Err(ThumbError::Template(format!(
                "template '{}': text element '{}' has an empty id",
                self.id, te.label
            )));
        }
        Ok(())
    }

    pub fn text_element(&self, id: &str) -> Option<&TextElement> {
        self.text_elements.iter().find(|te| te.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_file_gets_defaults() {
        let json = r#"{
            "id": "mini",
            "name": "Mini",
            "text_elements": [{"id": "title"}],
            "character_slots": [{"id": "main"}],
            "labels": [{"text": "NEW"}]
        }"#;
        let mut t: ThumbnailTemplate = serde_json::from_str(json).unwrap();
        t.normalize();

        assert_eq!(t.background_color.as_str(), DEFAULT_BACKGROUND);
        assert!(t.background_gradient.is_none());

        let te = &t.text_elements[0];
        assert_eq!(te.label, "title");
        assert_eq!(te.position, (640, 360));
        assert_eq!(te.font_size, 48);
        assert_eq!(te.anchor, "center");
        assert_eq!(te.stroke_width, 2);
        assert!(te.shadow);

        let slot = &t.character_slots[0];
        assert_eq!(slot.position, (200, 360));
        assert_eq!(slot.size, (400, 600));

        let label = &t.labels[0];
        assert_eq!(label.bg_color.as_str(), "#FF0000");
        assert_eq!(label.font_size, 24);
    }

    #[test]
    fn test_missing_required_fields_fail() {
        assert!(serde_json::from_str::<ThumbnailTemplate>(r#"{"name": "x"}"#).is_err());
        assert!(serde_json::from_str::<ThumbnailTemplate>(r#"{"id": "x"}"#).is_err());
    }

    #[test]
    fn test_bad_color_fails_parse() {
        let json = r##"{"id": "x", "name": "X", "background_color": "#nothex"}"##;
        assert!(serde_json::from_str::<ThumbnailTemplate>(json).is_err());
    }

    #[test]
    fn test_validate_opacity_range() {
        let mut t = ThumbnailTemplate::new("x", "X");
        t.background_gradient = Some(GradientSpec {
            direction: GradientDirection::Bottom,
            color: default_black(),
            opacity: 1.5,
        });
        assert!(t.validate().is_err());
        t.background_gradient.as_mut().unwrap().opacity = 0.4;
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_name() {
        assert!(ThumbnailTemplate::new("x", " ").validate().is_err());
        assert!(ThumbnailTemplate::new("", "X").validate().is_err());
    }

    #[test]
    fn test_gradient_direction_parse() {
        assert_eq!(
            "Bottom".parse::<GradientDirection>().unwrap(),
            GradientDirection::Bottom
        );
        assert!("diagonal".parse::<GradientDirection>().is_err());
    }

    #[test]
    fn test_optional_shadow_fields_omitted() {
        let te = TextElement::new("title", "Title");
        let json = serde_json::to_value(&te).unwrap();
        assert!(json.get("shadow_color").is_none());
        assert!(json.get("shadow_offset").is_none());
        assert_eq!(json["position"], serde_json::json!([640, 360]));
    }
}
