//! # Template Rendering
//!
//! [`Renderer::render`] turns a template plus a per-render
//! [`RenderRequest`] into a finished canvas. Layers are drawn in a fixed
//! order:
//!
//! 1. background: the template color, then an image or generated image on top
//! 2. the template's gradient overlay
//! 3. the character sprite in the first character slot
//! 4. labels, in template order
//! 5. text elements, in template order (empty text is skipped)
//!
//! A layer that fails (missing file, bad sprite size, generator error) is
//! logged, recorded as a [`RenderWarning`] and skipped; the render always
//! produces an image.

use image::{DynamicImage, RgbaImage};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::color::HexColor;
use crate::compose::{Compositor, FitMode, TextStyle, open_image};
use crate::error::{Result, ThumbError};
use crate::generate::{GenerationRequest, ImageGenerator};
use crate::template::ThumbnailTemplate;

/// An image given either as a file or already decoded.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Image(DynamicImage),
}

impl ImageSource {
    pub fn load(&self) -> Result<DynamicImage> {
        match self {
            ImageSource::Path(path) => open_image(path),
            ImageSource::Image(image) => Ok(image.clone()),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(image: DynamicImage) -> Self {
        ImageSource::Image(image)
    }
}

/// What goes under everything else.
#[derive(Debug, Clone, Default)]
pub enum BackgroundChoice {
    /// The template's background color.
    #[default]
    Template,
    /// A solid color instead of the template's.
    Color(HexColor),
    /// A picture fitted onto the template color.
    Image { source: ImageSource, fit: FitMode },
    /// A picture from the configured [`ImageGenerator`].
    Generated {
        request: GenerationRequest,
        fit: FitMode,
    },
}

/// Per-render overrides for the first character slot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CharacterLayout {
    pub position: Option<(i32, i32)>,
    pub size: Option<(u32, u32)>,
}

/// Everything user-supplied for one render. Templates stay untouched.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    /// Text per text element id; missing ids use the element's default text.
    pub texts: HashMap<String, String>,
    pub character: Option<ImageSource>,
    pub character_layout: CharacterLayout,
    pub background: BackgroundChoice,
}

impl RenderRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, id: &str, value: &str) -> Self {
        self.texts.insert(id.to_string(), value.to_string());
        self
    }

    pub fn character(mut self, source: impl Into<ImageSource>) -> Self {
        self.character = Some(source.into());
        self
    }

    pub fn background(mut self, background: BackgroundChoice) -> Self {
        self.background = background;
        self
    }
}

/// Layer a warning came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    Gradient,
    Character,
    Label,
    Text,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Background => "background",
            Layer::Gradient => "gradient",
            Layer::Character => "character",
            Layer::Label => "label",
            Layer::Text => "text",
        };
        f.write_str(name)
    }
}

/// A layer that could not be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderWarning {
    pub layer: Layer,
    pub message: String,
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.layer, self.message)
    }
}

/// Finished canvas plus every step that was skipped.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub image: RgbaImage,
    pub warnings: Vec<RenderWarning>,
}

/// Collects warnings while the pipeline keeps going.
#[derive(Debug, Default)]
pub(crate) struct Warnings(Vec<RenderWarning>);

impl Warnings {
    /// Record the error of a failed step, if any.
    pub(crate) fn check(&mut self, layer: Layer, result: Result<()>) {
        if let Err(e) = result {
            self.push(layer, e.to_string());
        }
    }

    pub(crate) fn push(&mut self, layer: Layer, message: String) {
        log::warn!("{} layer skipped: {}", layer, message);
        self.0.push(RenderWarning { layer, message });
    }

    pub(crate) fn into_vec(self) -> Vec<RenderWarning> {
        self.0
    }
}

/// Draws templates onto a [`Compositor`].
pub struct Renderer {
    compositor: Compositor,
    generator: Option<Box<dyn ImageGenerator>>,
}

impl Renderer {
    pub fn new(compositor: Compositor) -> Self {
        Self {
            compositor,
            generator: None,
        }
    }

    pub fn with_generator(mut self, generator: Box<dyn ImageGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn compositor_mut(&mut self) -> &mut Compositor {
        &mut self.compositor
    }

    /// Render `template` with the overrides in `request`.
    pub fn render(&mut self, template: &ThumbnailTemplate, request: &RenderRequest) -> RenderOutcome {
        let mut warnings = Warnings::default();
        log::debug!("rendering template '{}'", template.id);

        self.compositor.create_canvas(&template.background_color);
        self.draw_background(&request.background, &mut warnings);

        if let Some(gradient) = &template.background_gradient {
            let result =
                self.compositor
                    .add_gradient_overlay(gradient.direction, &gradient.color, gradient.opacity);
            warnings.check(Layer::Gradient, result);
        }

        if let Some(source) = &request.character {
            self.draw_character(template, source, request.character_layout, &mut warnings);
        }

        for label in &template.labels {
            let result = self.compositor.draw_label(label);
            warnings.check(Layer::Label, result);
        }

        let default_shadow = self.compositor.style().shadow;
        for element in &template.text_elements {
            let text = request
                .texts
                .get(&element.id)
                .map(String::as_str)
                .unwrap_or(&element.default_text);
            if text.is_empty() {
                continue;
            }
            let style = TextStyle::from_element(element, default_shadow);
            let result = self.compositor.draw_text(text, element.position, &style);
            warnings.check(Layer::Text, result);
        }

        RenderOutcome {
            image: self.compositor.take_image(),
            warnings: warnings.into_vec(),
        }
    }

    fn draw_background(&mut self, choice: &BackgroundChoice, warnings: &mut Warnings) {
        match choice {
            BackgroundChoice::Template => {}
            BackgroundChoice::Color(color) => self.compositor.create_canvas(color),
            BackgroundChoice::Image { source, fit } => {
                let result = source
                    .load()
                    .and_then(|image| self.compositor.set_background(&image, *fit));
                warnings.check(Layer::Background, result);
            }
            BackgroundChoice::Generated { request, fit } => {
                let Some(generator) = &self.generator else {
                    warnings.push(
                        Layer::Background,
                        "no image generator configured".to_string(),
                    );
                    return;
                };
                let result = generator
                    .generate(request)
                    .map_err(ThumbError::from)
                    .and_then(|image| self.compositor.set_background(&image, *fit));
                warnings.check(Layer::Background, result);
            }
        }
    }

    fn draw_character(
        &mut self,
        template: &ThumbnailTemplate,
        source: &ImageSource,
        layout: CharacterLayout,
        warnings: &mut Warnings,
    ) {
        let Some(slot) = template.character_slots.first() else {
            warnings.push(
                Layer::Character,
                format!("template '{}' has no character slot", template.id),
            );
            return;
        };

        let position = layout.position.unwrap_or(slot.position);
        let size = layout.size.unwrap_or(slot.size);
        let result = source.load().and_then(|image| {
            self.compositor
                .paste_sprite_image(&image, position, Some(size), &slot.anchor)
        });
        warnings.check(Layer::Character, result);
    }
}

/// One-off render without a generator; `compositor` is consumed.
pub fn render_template(
    compositor: Compositor,
    template: &ThumbnailTemplate,
    request: &RenderRequest,
) -> RenderOutcome {
    Renderer::new(compositor).render(template, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontResolver;
    use crate::generate::GenerationError;
    use crate::template::TemplateCatalog;
    use image::Rgba;

    fn renderer() -> Renderer {
        Renderer::new(Compositor::new(1280, 720).with_fonts(FontResolver::bitmap_only()))
    }

    fn template(id: &str) -> ThumbnailTemplate {
        TemplateCatalog::with_builtins("unused")
            .get_template(id)
            .cloned()
            .unwrap()
    }

    struct Solid(Rgba<u8>);

    impl ImageGenerator for Solid {
        fn generate(&self, _: &GenerationRequest) -> std::result::Result<DynamicImage, GenerationError> {
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 36, self.0)))
        }
    }

    struct Blocked;

    impl ImageGenerator for Blocked {
        fn generate(&self, _: &GenerationRequest) -> std::result::Result<DynamicImage, GenerationError> {
            Err(GenerationError::SafetyBlocked)
        }
    }

    #[test]
    fn test_default_render_has_no_warnings() {
        let outcome = renderer().render(&template("new_song"), &RenderRequest::new());
        assert_eq!(outcome.image.dimensions(), (1280, 720));
        assert!(outcome.warnings.is_empty());
        // Badge background over the gradient-free top rows
        assert_eq!(outcome.image.get_pixel(60, 55), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_missing_character_single_warning() {
        let request = RenderRequest::new().character(PathBuf::from("/nonexistent/char.png"));
        let outcome = renderer().render(&template("new_song"), &request);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].layer, Layer::Character);
    }

    #[test]
    fn test_character_without_slot_warns() {
        let mut t = template("mv");
        t.character_slots.clear();
        let request = RenderRequest::new().character(DynamicImage::new_rgba8(4, 4));
        let outcome = renderer().render(&t, &request);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].message.contains("no character slot"));
    }

    #[test]
    fn test_character_layout_override() {
        let sprite = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([0, 255, 0, 255])));
        let mut request = RenderRequest::new().character(sprite);
        request.character_layout = CharacterLayout {
            position: Some((100, 600)),
            size: Some((40, 40)),
        };
        let outcome = renderer().render(&template("new_song"), &request);
        assert!(outcome.warnings.is_empty());
        // Center-anchored 40x40 box around (100, 600), under the gradient
        let p = outcome.image.get_pixel(100, 600);
        assert_eq!((p[0], p[2]), (0, 0));
        assert!(p[1] > 0);
        assert_ne!(outcome.image.get_pixel(300, 400), p);
    }

    #[test]
    fn test_generated_background() {
        let mut r = renderer().with_generator(Box::new(Solid(Rgba([0, 0, 255, 255]))));
        let request = RenderRequest::new().background(BackgroundChoice::Generated {
            request: GenerationRequest::new("sky"),
            fit: FitMode::Cover,
        });
        let outcome = r.render(&template("cover"), &request);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.image.get_pixel(640, 0), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_generation_failure_keeps_color() {
        let mut r = renderer().with_generator(Box::new(Blocked));
        let request = RenderRequest::new().background(BackgroundChoice::Generated {
            request: GenerationRequest::new("sky"),
            fit: FitMode::Cover,
        });
        let t = template("cover");
        let outcome = r.render(&t, &request);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].layer, Layer::Background);
        assert_eq!(outcome.image.get_pixel(640, 0), &t.background_color.rgba());
    }

    #[test]
    fn test_no_generator_warns() {
        let request = RenderRequest::new().background(BackgroundChoice::Generated {
            request: GenerationRequest::new("sky"),
            fit: FitMode::Cover,
        });
        let outcome = renderer().render(&template("cover"), &request);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_color_background_override() {
        let request = RenderRequest::new().background(BackgroundChoice::Color(
            HexColor::parse("#00FF00").unwrap(),
        ));
        let outcome = renderer().render(&template("live"), &request);
        assert_eq!(outcome.image.get_pixel(640, 0), &Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_renderer_is_reusable() {
        let mut r = renderer();
        let t = template("mv");
        let first = r.render(&t, &RenderRequest::new());
        let second = r.render(&t, &RenderRequest::new());
        assert_eq!(first.image, second.image);
    }

    #[test]
    fn test_template_is_not_mutated() {
        let t = template("new_song");
        let before = t.clone();
        let request = RenderRequest::new().text("title", "Override");
        renderer().render(&t, &request);
        assert_eq!(t, before);
    }
}
