//! # Thumbsmith - Music Video Thumbnail Compositor
//!
//! Thumbsmith builds YouTube-style thumbnails for song releases, covers,
//! music videos and live streams. It provides:
//!
//! - **Templates**: declarative layouts with text slots, character slots,
//!   badges and gradients, stored as JSON
//! - **Compositing**: background fitting, sprites, outlined and shadowed
//!   text, rounded badges and gradient overlays on an RGBA canvas
//! - **Fonts**: system CJK font discovery with a built-in bitmap fallback
//! - **Output**: PNG and JPEG encoding with atomic writes
//!
//! ## Quick Start
//!
//! ```no_run
//! use thumbsmith::{
//!     compose::Compositor,
//!     output::OutputFormat,
//!     render::{RenderRequest, Renderer},
//!     template::TemplateCatalog,
//! };
//! use std::path::{Path, PathBuf};
//!
//! // Built-ins plus any custom templates in ./templates
//! let catalog = TemplateCatalog::new("templates");
//! let template = catalog.get_template("new_song").unwrap();
//!
//! let request = RenderRequest::new()
//!     .text("title", "夜明けのうた")
//!     .character(PathBuf::from("characters/koyomi.png"));
//!
//! let mut renderer = Renderer::new(Compositor::new(1280, 720));
//! let outcome = renderer.render(template, &request);
//! for warning in &outcome.warnings {
//!     eprintln!("skipped {}", warning);
//! }
//!
//! thumbsmith::output::save_image(&outcome.image, Path::new("out.png"), OutputFormat::Png, 95)?;
//! # Ok::<(), thumbsmith::ThumbError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`template`] | Template types, built-ins and the catalog |
//! | [`render`] | Template + request → image pipeline |
//! | [`compose`] | Layer compositor |
//! | [`font`] | Font discovery and glyph masks |
//! | [`geometry`] | Anchor keywords and placement math |
//! | [`presets`] | Template-free quick layouts |
//! | [`generate`] | Generated background interface |
//! | [`output`] | Encoding and file writing |
//! | [`config`] | Application configuration |
//! | [`history`] | Recent output files |
//! | [`settings`] | Settings form flow |
//! | [`error`] | Error types |

pub mod color;
pub mod compose;
pub mod config;
pub mod error;
pub mod font;
pub mod generate;
pub mod geometry;
pub mod history;
pub mod output;
pub mod presets;
pub mod render;
pub mod settings;
pub mod template;

// Re-exports for convenience
pub use color::HexColor;
pub use compose::{Compositor, FitMode};
pub use config::AppConfig;
pub use error::{Result, ThumbError};
pub use render::{RenderOutcome, RenderRequest, Renderer};
pub use template::{TemplateCatalog, ThumbnailTemplate};
