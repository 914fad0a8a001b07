//! # Generated Backgrounds
//!
//! Interface to an image-generation service. The crate ships no network
//! client: a caller plugs in an [`ImageGenerator`] and the render pipeline
//! treats its output like any other background image.
//!
//! For services speaking the Gemini `generateContent` JSON format,
//! [`request_body`] builds the payload and [`classify_response`] turns the
//! reply into an image or a [`GenerationError`] that says why there is none.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{DynamicImage, ImageFormat};
use serde_json::{Value, json};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;
use thiserror::Error;

/// Characters of a text-only reply kept in [`GenerationError::NoImage`].
pub const TEXT_PREVIEW_CHARS: usize = 200;

/// Shortest string accepted as an API key.
pub const MIN_API_KEY_LEN: usize = 10;

/// Instruction used for redraw requests: upscale and clean up the single
/// reference image without changing its content.
pub const REDRAW_PROMPT: &str = "Enhance the attached image. Keep composition, framing, \
characters, poses, expressions, outfits, colors and lighting exactly as they are. \
Only improve resolution, line clarity and fine detail, and remove noise. \
Do not add, remove or restyle anything.";

/// Why a generation produced no image.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    #[error("the service returned no response")]
    EmptyResponse,

    #[error("no candidates returned; the request may have been blocked{}", block_suffix(.block_reason))]
    NoCandidates { block_reason: Option<String> },

    #[error("blocked by the safety filter; change the prompt or reference images")]
    SafetyBlocked,

    #[error("blocked for recitation of copyrighted material")]
    RecitationBlocked,

    #[error("the candidate has no content")]
    MissingContent,

    #[error("the candidate content has no parts")]
    EmptyParts,

    #[error("no image data returned{}", text_suffix(.text))]
    NoImage { text: Option<String> },

    #[error("unexpected response shape: {0}")]
    Malformed(String),

    #[error("generated image could not be decoded: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Transport(String),
}

fn block_suffix(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|r| format!(" (reason: {})", r))
        .unwrap_or_default()
}

fn text_suffix(text: &Option<String>) -> String {
    text.as_ref()
        .map(|t| format!("; service said: {}", t))
        .unwrap_or_default()
}

/// Output resolution tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    OneK,
    #[default]
    TwoK,
    FourK,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::OneK => "1K",
            Resolution::TwoK => "2K",
            Resolution::FourK => "4K",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1K" => Ok(Resolution::OneK),
            "2K" => Ok(Resolution::TwoK),
            "4K" => Ok(Resolution::FourK),
            other => Err(GenerationError::Malformed(format!(
                "unknown resolution '{}' (expected 1K, 2K or 4K)",
                other
            ))),
        }
    }
}

/// One generation call: prompt text plus reference images, in order.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub prompt: String,
    pub reference_images: Vec<DynamicImage>,
    pub resolution: Resolution,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_reference(mut self, image: DynamicImage) -> Self {
        self.reference_images.push(image);
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Clean-up pass over an existing image; character references follow it.
    pub fn redraw(source: DynamicImage) -> Self {
        Self::new(REDRAW_PROMPT).with_reference(source)
    }
}

/// Anything that can turn a [`GenerationRequest`] into an image.
pub trait ImageGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<DynamicImage, GenerationError>;
}

/// Basic shape check: non-empty and at least [`MIN_API_KEY_LEN`] characters.
pub fn validate_api_key(key: &str) -> bool {
    !key.is_empty() && key.chars().count() >= MIN_API_KEY_LEN
}

/// `generateContent` payload: the prompt followed by each reference image
/// as base64 PNG, asking for text and image output.
pub fn request_body(request: &GenerationRequest) -> Result<Value, GenerationError> {
    let mut parts = vec![json!({ "text": request.prompt })];

    for image in &request.reference_images {
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| GenerationError::Decode(e.to_string()))?;
        parts.push(json!({
            "inlineData": { "mimeType": "image/png", "data": BASE64.encode(&png) }
        }));
    }

    Ok(json!({
        "contents": [{ "parts": parts }],
        "generationConfig": {
            "responseModalities": ["TEXT", "IMAGE"],
            "imageConfig": { "imageSize": request.resolution.as_str() }
        }
    }))
}

/// Field lookup accepting both the camelCase wire name and snake_case.
fn field<'a>(value: &'a Value, camel: &str, snake: &str) -> Option<&'a Value> {
    value
        .get(camel)
        .or_else(|| value.get(snake))
        .filter(|v| !v.is_null())
}

/// Extract the first image from a `generateContent` response.
///
/// Checks run in order: empty body, candidates, finish reason (safety,
/// recitation), content, parts, then the first part with inline data. A
/// reply carrying only text reports the last text part, truncated to
/// [`TEXT_PREVIEW_CHARS`].
pub fn classify_response(response: &Value) -> Result<DynamicImage, GenerationError> {
    if response.is_null() || response.as_object().is_some_and(|o| o.is_empty()) {
        return Err(GenerationError::EmptyResponse);
    }

    let candidates = field(response, "candidates", "candidates")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let Some(candidate) = candidates.first() else {
        let block_reason = field(response, "promptFeedback", "prompt_feedback")
            .and_then(|f| field(f, "blockReason", "block_reason"))
            .and_then(Value::as_str)
            .map(str::to_string);
        return Err(GenerationError::NoCandidates { block_reason });
    };

    if let Some(reason) = field(candidate, "finishReason", "finish_reason").and_then(Value::as_str) {
        let reason = reason.to_ascii_uppercase();
        if reason.contains("SAFETY") {
            return Err(GenerationError::SafetyBlocked);
        }
        if reason.contains("RECITATION") {
            return Err(GenerationError::RecitationBlocked);
        }
    }

    let content = field(candidate, "content", "content").ok_or(GenerationError::MissingContent)?;
    let parts = field(content, "parts", "parts")
        .and_then(Value::as_array)
        .ok_or(GenerationError::EmptyParts)?;
    if parts.is_empty() {
        return Err(GenerationError::EmptyParts);
    }

    let mut text_reply = None;
    for part in parts {
        if let Some(inline) = field(part, "inlineData", "inline_data") {
            let data = field(inline, "data", "data")
                .and_then(Value::as_str)
                .ok_or_else(|| GenerationError::Malformed("inline data without payload".to_string()))?;
            return decode_inline(data);
        }
        if let Some(text) = field(part, "text", "text").and_then(Value::as_str)
            && !text.is_empty()
        {
            text_reply = Some(text);
        }
    }

    Err(GenerationError::NoImage {
        text: text_reply.map(preview),
    })
}

fn decode_inline(data: &str) -> Result<DynamicImage, GenerationError> {
    let bytes = BASE64
        .decode(data.trim())
        .map_err(|e| GenerationError::Decode(e.to_string()))?;
    image::load_from_memory(&bytes).map_err(|e| GenerationError::Decode(e.to_string()))
}

fn preview(text: &str) -> String {
    if text.chars().count() > TEXT_PREVIEW_CHARS {
        let head: String = text.chars().take(TEXT_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_base64() -> String {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255])));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png).unwrap();
        BASE64.encode(&png)
    }

    #[test]
    fn test_extracts_first_image() {
        let response = json!({
            "candidates": [{
                "finishReason": "STOP",
                "content": { "parts": [
                    { "text": "here you go" },
                    { "inlineData": { "mimeType": "image/png", "data": png_base64() } }
                ]}
            }]
        });
        let img = classify_response(&response).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
    }

    #[test]
    fn test_empty_and_missing() {
        assert_eq!(classify_response(&Value::Null).unwrap_err(), GenerationError::EmptyResponse);
        assert_eq!(classify_response(&json!({})).unwrap_err(), GenerationError::EmptyResponse);
        assert_eq!(
            classify_response(&json!({ "candidates": [{}] })).unwrap_err(),
            GenerationError::MissingContent
        );
        assert_eq!(
            classify_response(&json!({ "candidates": [{ "content": {} }] })).unwrap_err(),
            GenerationError::EmptyParts
        );
        assert_eq!(
            classify_response(&json!({ "candidates": [{ "content": { "parts": [] } }] })).unwrap_err(),
            GenerationError::EmptyParts
        );
    }

    #[test]
    fn test_no_candidates_with_block_reason() {
        let response = json!({ "candidates": [], "promptFeedback": { "blockReason": "OTHER" } });
        assert_eq!(
            classify_response(&response).unwrap_err(),
            GenerationError::NoCandidates {
                block_reason: Some("OTHER".to_string())
            }
        );
        let msg = classify_response(&response).unwrap_err().to_string();
        assert!(msg.contains("(reason: OTHER)"));
    }

    #[test]
    fn test_finish_reasons() {
        let safety = json!({ "candidates": [{ "finishReason": "IMAGE_SAFETY" }] });
        assert_eq!(classify_response(&safety).unwrap_err(), GenerationError::SafetyBlocked);
        let recitation = json!({ "candidates": [{ "finish_reason": "recitation" }] });
        assert_eq!(classify_response(&recitation).unwrap_err(), GenerationError::RecitationBlocked);
    }

    #[test]
    fn test_text_only_reply_previewed() {
        let long = "あ".repeat(250);
        let response = json!({ "candidates": [{ "content": { "parts": [{ "text": long }] } }] });
        match classify_response(&response).unwrap_err() {
            GenerationError::NoImage { text: Some(t) } => {
                assert_eq!(t.chars().count(), TEXT_PREVIEW_CHARS + 3);
                assert!(t.ends_with("..."));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bad_payload_is_decode_error() {
        let response = json!({ "candidates": [{ "content": { "parts": [
            { "inlineData": { "data": "!!!not base64" } }
        ]}}]});
        assert!(matches!(classify_response(&response), Err(GenerationError::Decode(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let req = GenerationRequest::new("a sunset")
            .with_reference(DynamicImage::new_rgba8(2, 2))
            .with_resolution(Resolution::FourK);
        let body = request_body(&req).unwrap();
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["text"], "a sunset");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(body["generationConfig"]["imageConfig"]["imageSize"], "4K");
    }

    #[test]
    fn test_redraw_uses_source_first() {
        let req = GenerationRequest::redraw(DynamicImage::new_rgba8(5, 5));
        assert_eq!(req.prompt, REDRAW_PROMPT);
        assert_eq!(req.reference_images.len(), 1);
    }

    #[test]
    fn test_api_key_shape() {
        assert!(!validate_api_key(""));
        assert!(!validate_api_key("short"));
        assert!(validate_api_key("0123456789"));
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!("4k".parse::<Resolution>().unwrap(), Resolution::FourK);
        assert!("8K".parse::<Resolution>().is_err());
        assert_eq!(Resolution::default().to_string(), "2K");
    }
}
