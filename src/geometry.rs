//! Anchor keywords and draw-origin arithmetic.
//!
//! An anchor keyword names which point of a content box lines up with a
//! reference. Keywords are matched by substring containment, so `"topleft"`,
//! `"top-left"` and `"left_top"` all mean the same thing.
//!
//! Containers (captions) use [`Anchor::parse`], where a missing token
//! centers that axis:
//!
//! | Axis       | Rule (first match wins)                  |
//! |------------|------------------------------------------|
//! | horizontal | contains `left` → Start, `right` → End   |
//! | vertical   | contains `top` → Start, `bottom` → End   |
//! | otherwise  | Center                                   |
//!
//! Points (text and sprites) default to the top-left corner instead:
//!
//! | Keyword rule                       | Text   | Sprite |
//! |------------------------------------|--------|--------|
//! | horizontal: contains `center`      | Center | Center |
//! | horizontal: contains `right`       | End    | End    |
//! | vertical: exactly `center`         | Center | Center |
//! | vertical: contains `center`        | Start  | Center |
//! | vertical: contains `bottom`        | End    | End    |
//! | anything else                      | Start  | Start  |
//!
//! So a `"left"` title hangs below its point, and `"centertop"` centers a
//! sprite on both axes but only centers text horizontally.

/// Alignment along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

/// Parsed anchor keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub horizontal: Align,
    pub vertical: Align,
}

impl Anchor {
    pub const CENTER: Anchor = Anchor {
        horizontal: Align::Center,
        vertical: Align::Center,
    };

    pub const TOP_LEFT: Anchor = Anchor {
        horizontal: Align::Start,
        vertical: Align::Start,
    };

    /// Parse an anchor keyword. Never fails; unknown words center.
    pub fn parse(keyword: &str) -> Self {
        let k = keyword.to_ascii_lowercase();

        let horizontal = if k.contains("left") {
            Align::Start
        } else if k.contains("right") {
            Align::End
        } else {
            Align::Center
        };

        let vertical = if k.contains("top") {
            Align::Start
        } else if k.contains("bottom") {
            Align::End
        } else {
            Align::Center
        };

        Self {
            horizontal,
            vertical,
        }
    }

    /// Point anchor for a text box.
    pub fn for_text(keyword: &str) -> Self {
        let k = keyword.to_ascii_lowercase();
        let vertical = if k == "center" {
            Align::Center
        } else if k.contains("bottom") {
            Align::End
        } else {
            Align::Start
        };
        Self {
            horizontal: point_horizontal(&k),
            vertical,
        }
    }

    /// Point anchor for a pasted sprite.
    pub fn for_sprite(keyword: &str) -> Self {
        let k = keyword.to_ascii_lowercase();
        let vertical = if k.contains("center") {
            Align::Center
        } else if k.contains("bottom") {
            Align::End
        } else {
            Align::Start
        };
        Self {
            horizontal: point_horizontal(&k),
            vertical,
        }
    }
}

fn point_horizontal(keyword: &str) -> Align {
    if keyword.contains("center") {
        Align::Center
    } else if keyword.contains("right") {
        Align::End
    } else {
        Align::Start
    }
}

impl From<&str> for Anchor {
    fn from(keyword: &str) -> Self {
        Anchor::parse(keyword)
    }
}

/// Offset of `content` inside `container` along one axis.
///
/// Center uses floor division so an oversized content box shifts by the
/// same amount on either side.
fn axis_origin(align: Align, container: i64, content: i64, margin: i64) -> i64 {
    match align {
        Align::Start => margin,
        Align::End => container - content - margin,
        Align::Center => (container - content).div_euclid(2),
    }
}

/// Top-left draw origin of a `content_w × content_h` box inside a
/// `container_w × container_h` box, per the anchor keyword.
///
/// `margin` applies to left/right/top/bottom placements, never to centered
/// axes.
pub fn anchor_origin(
    container_w: u32,
    container_h: u32,
    content_w: u32,
    content_h: u32,
    keyword: &str,
    margin: i32,
) -> (i32, i32) {
    let anchor = Anchor::parse(keyword);
    let x = axis_origin(
        anchor.horizontal,
        container_w as i64,
        content_w as i64,
        margin as i64,
    );
    let y = axis_origin(
        anchor.vertical,
        container_h as i64,
        content_h as i64,
        margin as i64,
    );
    (x as i32, y as i32)
}

/// Shift from an anchor point to the box's near edge along one axis.
///
/// A centered axis moves back by half the size, truncated, so odd sizes
/// put the extra pixel after the point.
fn point_offset(align: Align, size: u32) -> i64 {
    match align {
        Align::Start => 0,
        Align::Center => -((size / 2) as i64),
        Align::End => -(size as i64),
    }
}

/// Top-left draw origin of a box whose anchor point sits on `point`.
///
/// Build `anchor` with [`Anchor::for_text`] or [`Anchor::for_sprite`].
pub fn anchor_at(point: (i32, i32), size: (u32, u32), anchor: Anchor) -> (i32, i32) {
    let x = point.0 as i64 + point_offset(anchor.horizontal, size.0);
    let y = point.1 as i64 + point_offset(anchor.vertical, size.1);
    (x as i32, y as i32)
}
