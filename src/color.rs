//! Hex color parsing.
//!
//! Templates store colors as `#RRGGBB` strings. [`HexColor`] validates them on
//! load and keeps the original spelling so a template saved back to disk is
//! byte-for-byte the color the author wrote.

use image::{Rgb, Rgba};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ThumbError;

/// A validated color with its source spelling.
///
/// Accepts `#RGB`, `#RRGGBB` and `#RRGGBBAA` (case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexColor {
    raw: String,
    rgba: [u8; 4],
}

impl HexColor {
    pub const BLACK: &'static str = "#000000";
    pub const WHITE: &'static str = "#FFFFFF";

    /// Parse a hex color string.
    pub fn parse(s: &str) -> Result<Self, ThumbError> {
        let rgba = parse_hex(s).ok_or_else(|| ThumbError::Color(s.to_string()))?;
        Ok(Self {
            raw: s.to_string(),
            rgba,
        })
    }

    /// Build from channel values; spelled as uppercase `#RRGGBB`.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            raw: format!("#{:02X}{:02X}{:02X}", r, g, b),
            rgba: [r, g, b, 255],
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn rgba(&self) -> Rgba<u8> {
        Rgba(self.rgba)
    }

    pub fn rgb(&self) -> Rgb<u8> {
        Rgb([self.rgba[0], self.rgba[1], self.rgba[2]])
    }

    /// Same color with its alpha replaced.
    pub fn with_alpha(&self, alpha: u8) -> Rgba<u8> {
        Rgba([self.rgba[0], self.rgba[1], self.rgba[2], alpha])
    }
}

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` into RGBA channels.
fn parse_hex(s: &str) -> Option<[u8; 4]> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => {
            let mut out = [255u8; 4];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            Some(out)
        }
        6 => Some([channel(0)?, channel(2)?, channel(4)?, 255]),
        8 => Some([channel(0)?, channel(2)?, channel(4)?, channel(6)?]),
        _ => None,
    }
}

impl FromStr for HexColor {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        HexColor::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse a color that is known to be valid at compile time (built-in tables).
///
/// Falls back to black for a malformed literal rather than panicking.
pub(crate) fn known(s: &str) -> HexColor {
    HexColor::parse(s).unwrap_or_else(|_| HexColor::from_rgb(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit() {
        let c = HexColor::parse("#1a1a2e").unwrap();
        assert_eq!(c.rgba(), Rgba([0x1a, 0x1a, 0x2e, 255]));
        assert_eq!(c.as_str(), "#1a1a2e");
    }

    #[test]
    fn test_parse_short_and_alpha() {
        assert_eq!(HexColor::parse("#f00").unwrap().rgba(), Rgba([255, 0, 0, 255]));
        assert_eq!(
            HexColor::parse("#00000080").unwrap().rgba(),
            Rgba([0, 0, 0, 0x80])
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(HexColor::parse("red").is_err());
        assert!(HexColor::parse("#12345").is_err());
        assert!(HexColor::parse("#GGGGGG").is_err());
        assert!(HexColor::parse("").is_err());
    }

    #[test]
    fn test_serde_keeps_spelling() {
        let c: HexColor = serde_json::from_str("\"#FFd700\"").unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#FFd700\"");
        assert!(serde_json::from_str::<HexColor>("\"#XYZ\"").is_err());
    }

    #[test]
    fn test_from_rgb_spelling() {
        assert_eq!(HexColor::from_rgb(255, 0, 16).as_str(), "#FF0010");
    }
}
