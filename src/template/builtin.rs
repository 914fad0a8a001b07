//! Built-in templates: new song, cover, singing cover, music video and live
//! stream announcement.
//!
//! These are always present in a catalog and act as the baseline when the
//! templates directory is empty or every custom file is broken.

use super::{CharacterSlot, GradientDirection, GradientSpec, LabelSpec, TextElement, ThumbnailTemplate};
use crate::color;

/// Ids of the built-in templates, in catalog order.
pub const BUILTIN_IDS: &[&str] = &["new_song", "cover", "utatte_mita", "mv", "live"];

struct TextDef {
    id: &'static str,
    label: &'static str,
    text: &'static str,
    position: (i32, i32),
    size: u32,
    color: &'static str,
    anchor: &'static str,
    stroke: u32,
    shadow: bool,
}

impl TextDef {
    fn build(&self) -> TextElement {
        TextElement {
            default_text: self.text.to_string(),
            position: self.position,
            font_size: self.size,
            font_color: color::known(self.color),
            anchor: self.anchor.to_string(),
            stroke_width: self.stroke,
            shadow: self.shadow,
            ..TextElement::new(self.id, self.label)
        }
    }
}

fn main_slot(position: (i32, i32), size: (u32, u32)) -> CharacterSlot {
    CharacterSlot {
        id: "main_character".to_string(),
        position,
        size,
        anchor: "center".to_string(),
    }
}

fn badge(text: &str, bg: &str, font_size: u32) -> LabelSpec {
    LabelSpec {
        text: text.to_string(),
        position: (50, 50),
        bg_color: color::known(bg),
        text_color: color::known("#FFFFFF"),
        font_size,
    }
}

fn bottom_shade(opacity: f32) -> Option<GradientSpec> {
    Some(GradientSpec {
        direction: GradientDirection::Bottom,
        color: color::known("#000000"),
        opacity,
    })
}

#[allow(clippy::too_many_arguments)]
fn template(
    id: &str,
    name: &str,
    description: &str,
    background: &str,
    gradient_opacity: f32,
    texts: &[TextDef],
    slot: CharacterSlot,
    label: LabelSpec,
) -> ThumbnailTemplate {
    ThumbnailTemplate {
        description: description.to_string(),
        background_color: color::known(background),
        background_gradient: bottom_shade(gradient_opacity),
        text_elements: texts.iter().map(TextDef::build).collect(),
        character_slots: vec![slot],
        labels: vec![label],
        ..ThumbnailTemplate::new(id, name)
    }
}

/// All built-in templates in catalog order.
pub fn builtin_templates() -> Vec<ThumbnailTemplate> {
    vec![new_song(), cover(), utatte_mita(), mv(), live()]
}

fn new_song() -> ThumbnailTemplate {
    template(
        "new_song",
        "新曲発表",
        "新曲リリース告知用のテンプレート",
        "#1a1a2e",
        0.6,
        &[
            TextDef {
                id: "title",
                label: "曲名",
                text: "新曲タイトル",
                position: (800, 300),
                size: 72,
                color: "#FFFFFF",
                anchor: "left",
                stroke: 3,
                shadow: true,
            },
            TextDef {
                id: "artist",
                label: "アーティスト名",
                text: "彩瀬こよみ",
                position: (800, 400),
                size: 36,
                color: "#FFD700",
                anchor: "left",
                stroke: 2,
                shadow: true,
            },
            TextDef {
                id: "date",
                label: "公開日",
                text: "○月○日公開",
                position: (800, 480),
                size: 28,
                color: "#FFFFFF",
                anchor: "left",
                stroke: 1,
                shadow: false,
            },
        ],
        main_slot((300, 400), (450, 600)),
        badge("NEW", "#FF0000", 32),
    )
}

fn cover() -> ThumbnailTemplate {
    template(
        "cover",
        "カバー曲",
        "カバー曲用のテンプレート",
        "#2d132c",
        0.5,
        &[
            TextDef {
                id: "title",
                label: "曲名",
                text: "カバー曲タイトル",
                position: (800, 280),
                size: 64,
                color: "#FFFFFF",
                anchor: "left",
                stroke: 3,
                shadow: true,
            },
            TextDef {
                id: "original",
                label: "原曲アーティスト",
                text: "原曲: ○○○",
                position: (800, 370),
                size: 28,
                color: "#CCCCCC",
                anchor: "left",
                stroke: 1,
                shadow: false,
            },
            TextDef {
                id: "artist",
                label: "歌唱者",
                text: "歌: 彩瀬こよみ",
                position: (800, 420),
                size: 32,
                color: "#FFD700",
                anchor: "left",
                stroke: 2,
                shadow: true,
            },
        ],
        main_slot((300, 400), (450, 600)),
        badge("COVER", "#9C27B0", 32),
    )
}

fn utatte_mita() -> ThumbnailTemplate {
    template(
        "utatte_mita",
        "歌ってみた",
        "歌ってみた動画用のテンプレート",
        "#0d47a1",
        0.5,
        &[
            TextDef {
                id: "title",
                label: "曲名",
                text: "曲名",
                position: (800, 300),
                size: 64,
                color: "#FFFFFF",
                anchor: "left",
                stroke: 3,
                shadow: true,
            },
            TextDef {
                id: "artist",
                label: "歌唱者",
                text: "彩瀬こよみ",
                position: (800, 400),
                size: 36,
                color: "#00E5FF",
                anchor: "left",
                stroke: 2,
                shadow: true,
            },
        ],
        main_slot((300, 400), (450, 600)),
        badge("歌ってみた", "#2196F3", 28),
    )
}

fn mv() -> ThumbnailTemplate {
    template(
        "mv",
        "MV公開",
        "ミュージックビデオ公開用のテンプレート",
        "#1b1b1b",
        0.7,
        &[
            TextDef {
                id: "title",
                label: "曲名",
                text: "曲名",
                position: (640, 550),
                size: 72,
                color: "#FFFFFF",
                anchor: "center",
                stroke: 3,
                shadow: true,
            },
            TextDef {
                id: "artist",
                label: "アーティスト名",
                text: "彩瀬こよみ",
                position: (640, 630),
                size: 36,
                color: "#FFD700",
                anchor: "center",
                stroke: 2,
                shadow: true,
            },
        ],
        main_slot((640, 300), (500, 500)),
        badge("MV", "#E91E63", 36),
    )
}

fn live() -> ThumbnailTemplate {
    template(
        "live",
        "LIVE告知",
        "ライブ配信告知用のテンプレート",
        "#b71c1c",
        0.6,
        &[
            TextDef {
                id: "title",
                label: "配信タイトル",
                text: "歌枠配信",
                position: (800, 280),
                size: 56,
                color: "#FFFFFF",
                anchor: "left",
                stroke: 3,
                shadow: true,
            },
            TextDef {
                id: "date",
                label: "日時",
                text: "○月○日 20:00〜",
                position: (800, 370),
                size: 36,
                color: "#FFEB3B",
                anchor: "left",
                stroke: 2,
                shadow: true,
            },
            TextDef {
                id: "description",
                label: "説明",
                text: "みんな来てね!",
                position: (800, 450),
                size: 28,
                color: "#FFFFFF",
                anchor: "left",
                stroke: 1,
                shadow: false,
            },
        ],
        main_slot((300, 400), (450, 600)),
        badge("LIVE", "#F44336", 36),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_match_table() {
        let ids: Vec<String> = builtin_templates().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, BUILTIN_IDS);
    }

    #[test]
    fn test_builtins_validate() {
        for t in builtin_templates() {
            t.validate().unwrap();
            assert_eq!(t.character_slots.len(), 1);
            assert_eq!(t.labels.len(), 1);
            assert!(!t.text_elements.is_empty());
        }
    }

    #[test]
    fn test_new_song_layout() {
        let t = new_song();
        assert_eq!(t.background_color.as_str(), "#1a1a2e");
        let title = t.text_element("title").unwrap();
        assert_eq!(title.default_text, "新曲タイトル");
        assert_eq!(title.position, (800, 300));
        assert_eq!(title.anchor, "left");
        assert_eq!(t.labels[0].text, "NEW");
        assert_eq!(t.labels[0].position, (50, 50));
        assert_eq!(t.labels[0].bg_color.as_str(), "#FF0000");
    }
}
