//! # Thumbsmith CLI
//!
//! Command-line interface for rendering thumbnails.
//!
//! ## Usage
//!
//! ```bash
//! # List available templates
//! thumbsmith templates
//!
//! # Render a template with overrides
//! thumbsmith render --template new_song --text title=夜明けのうた \
//!     --character koyomi.png --out out.png
//!
//! # Template-free layout from presets
//! thumbsmith quick --title "Song" --artist "Artist" --style neon --placement center
//!
//! # Stamp a title onto an existing image
//! thumbsmith caption shot.jpg --title "Episode 3" --position bottom-right
//!
//! # Save a built-in template as JSON for editing
//! thumbsmith export-template cover
//! ```

use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thumbsmith::{
    AppConfig, FitMode, HexColor, ThumbError,
    compose::{CaptionStyle, open_image, stamp_caption},
    history::RecentFiles,
    output::{OutputFormat, default_file_name, save_image},
    presets::{PLACEMENT_NAMES, Placement, QuickLayout, STYLE_NAMES, StylePreset, render_quick},
    render::{BackgroundChoice, ImageSource, RenderOutcome, RenderRequest, Renderer},
    settings::{SettingsDialog, TemplateForm},
    template::TemplateCatalog,
};

/// Thumbsmith - thumbnail compositor for music releases
#[derive(Parser, Debug)]
#[command(name = "thumbsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "thumbsmith.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List templates (built-ins and custom files)
    Templates {
        /// Templates directory (defaults to the configured one)
        #[arg(long, value_name = "DIR")]
        templates: Option<PathBuf>,
    },

    /// Render a template
    Render {
        /// Template id or display name
        #[arg(long)]
        template: String,

        /// Text override, repeatable
        #[arg(long = "text", value_name = "ID=VALUE", value_parser = parse_key_val)]
        texts: Vec<(String, String)>,

        /// Character image for the first character slot
        #[arg(long, value_name = "FILE")]
        character: Option<PathBuf>,

        /// Character anchor position override
        #[arg(long, value_name = "X,Y", value_parser = parse_pair::<i32>)]
        char_pos: Option<(i32, i32)>,

        /// Character size override
        #[arg(long, value_name = "W,H", value_parser = parse_pair::<u32>)]
        char_size: Option<(u32, u32)>,

        /// Canvas size preset: youtube-thumbnail, x-header, youtube-channel-art or niconico-header
        #[arg(long, value_name = "NAME")]
        size: Option<String>,

        /// Background image
        #[arg(long, value_name = "FILE")]
        background: Option<PathBuf>,

        /// Solid background color instead of the template's
        #[arg(long, value_name = "HEX", conflicts_with = "background")]
        background_color: Option<HexColor>,

        /// How the background image is fitted: cover, contain or stretch
        #[arg(long, default_value = "cover")]
        fit: FitMode,

        /// png or jpeg (defaults to the output extension)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Output file (defaults to <output dir>/<title>.png)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Render a template-free layout from style and placement presets
    Quick {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        artist: String,

        #[arg(long)]
        subtitle: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        date: Option<String>,

        /// impact, pop, simple, elegant or neon
        #[arg(long, default_value = "impact")]
        style: String,

        /// top-left, middle-left, bottom-left, center or right
        #[arg(long, default_value = "top-left")]
        placement: String,

        /// Canvas size preset: youtube-thumbnail, x-header, youtube-channel-art or niconico-header
        #[arg(long, value_name = "NAME")]
        size: Option<String>,

        #[arg(long, value_name = "FILE")]
        background: Option<PathBuf>,

        #[arg(long)]
        format: Option<OutputFormat>,

        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Stamp a caption onto an existing image
    Caption {
        image: PathBuf,

        #[arg(long)]
        title: String,

        /// Placement keyword, e.g. top-left, bottom-right, center
        #[arg(long, default_value = "top-left")]
        position: String,

        /// Font size (defaults to 5% of the image height, at least 20)
        #[arg(long)]
        size: Option<u32>,

        /// Output file (defaults to <image>_caption.png next to the input)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Save a catalog template into the templates directory
    ExportTemplate {
        id: String,

        /// File name inside the templates directory (defaults to <id>.json)
        #[arg(long)]
        file: Option<String>,
    },

    /// Create and save a new empty template
    NewTemplate {
        #[arg(long)]
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, value_name = "HEX")]
        background_color: Option<String>,

        /// Gradient as DIRECTION:HEX:OPACITY, e.g. bottom:#000000:0.6
        #[arg(long)]
        gradient: Option<String>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{}'", s))?;
    Ok((key.to_string(), value.to_string()))
}

fn parse_pair<T: FromStr>(s: &str) -> Result<(T, T), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected two comma-separated numbers, got '{}'", s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<T>()
            .map_err(|_| format!("'{}' is not a valid number", v))
    };
    Ok((parse(a)?, parse(b)?))
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ThumbError> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config);

    match cli.command {
        Commands::Templates { templates } => {
            let dir = templates.unwrap_or_else(|| config.paths.templates_dir.clone());
            let catalog = TemplateCatalog::new(dir);
            println!("Available templates:");
            for (id, name) in catalog.list_templates() {
                println!("  {:<14} {}", id, name);
            }
            Ok(())
        }

        Commands::Render {
            template,
            texts,
            character,
            char_pos,
            char_size,
            size,
            background,
            background_color,
            fit,
            format,
            out,
        } => {
            let config = sized(config, size.as_deref())?;
            let catalog = TemplateCatalog::new(config.paths.templates_dir.clone());
            let template = catalog
                .get_template(&template)
                .or_else(|| catalog.get_template_by_name(&template))
                .ok_or_else(|| ThumbError::Template(format!("unknown template '{}'", template)))?;

            let mut request = RenderRequest::new();
            for (id, value) in &texts {
                request = request.text(id, value);
            }
            if let Some(path) = character {
                request = request.character(path);
            }
            request.character_layout.position = char_pos;
            request.character_layout.size = char_size;
            request.background = match (background, background_color) {
                (Some(path), _) => BackgroundChoice::Image {
                    source: ImageSource::Path(path),
                    fit,
                },
                (None, Some(color)) => BackgroundChoice::Color(color),
                (None, None) => BackgroundChoice::Template,
            };

            let title = request
                .texts
                .get("title")
                .cloned()
                .or_else(|| template.text_element("title").map(|te| te.default_text.clone()))
                .unwrap_or_default();

            let outcome = Renderer::new(config.compositor()).render(template, &request);
            write_outcome(&config, outcome, &title, format, out)
        }

        Commands::Quick {
            title,
            artist,
            subtitle,
            description,
            date,
            style,
            placement,
            size,
            background,
            format,
            out,
        } => {
            let config = sized(config, size.as_deref())?;
            let style = StylePreset::by_name(&style).ok_or_else(|| {
                ThumbError::Config(format!(
                    "unknown style '{}' (expected one of: {})",
                    style,
                    STYLE_NAMES.join(", ")
                ))
            })?;
            let placement = Placement::by_name(&placement).ok_or_else(|| {
                ThumbError::Config(format!(
                    "unknown placement '{}' (expected one of: {})",
                    placement,
                    PLACEMENT_NAMES.join(", ")
                ))
            })?;

            let layout = QuickLayout {
                title: title.clone(),
                artist,
                subtitle,
                description,
                date,
                style,
                placement,
            };
            let background = background.map(ImageSource::Path);

            let mut compositor = config.compositor();
            let outcome = render_quick(&mut compositor, background.as_ref(), &layout);
            write_outcome(&config, outcome, &title, format, out)
        }

        Commands::Caption {
            image,
            title,
            position,
            size,
            out,
        } => {
            let source = open_image(&image)?.to_rgba8();
            let style = CaptionStyle {
                font_size: size,
                ..CaptionStyle::default()
            };
            let stamped = stamp_caption(&source, &title, &position, &style, config.font_resolver())?;

            let path = out.unwrap_or_else(|| caption_path(&image));
            let format = OutputFormat::from_path(&path);
            save_image(&stamped, &path, format, config.output.jpeg_quality)?;
            remember(&config, &path);
            println!("Saved {}", path.display());
            Ok(())
        }

        Commands::ExportTemplate { id, file } => {
            let catalog = TemplateCatalog::new(config.paths.templates_dir.clone());
            let template = catalog
                .get_template(&id)
                .ok_or_else(|| ThumbError::Template(format!("unknown template '{}'", id)))?;
            let path = catalog.save_template(template, file.as_deref())?;
            println!("Saved {}", path.display());
            Ok(())
        }

        Commands::NewTemplate {
            id,
            name,
            description,
            background_color,
            gradient,
        } => {
            let mut form = TemplateForm::new(&id, &name);
            form.description = description;
            form.background_color = background_color.unwrap_or_default();
            if let Some(spec) = gradient {
                form.set_gradient(&spec);
            }

            let mut dialog = SettingsDialog::open("New template", form);
            let mut created = None;
            dialog
                .apply(|template| created = Some(template))
                .map_err(ThumbError::Template)?;

            let catalog = TemplateCatalog::with_builtins(config.paths.templates_dir.clone());
            if let Some(template) = created {
                let path = catalog.save_template(&template, None)?;
                println!("Saved {}", path.display());
            }
            Ok(())
        }
    }
}

/// Save a rendered image and record it in the recent files list.
fn write_outcome(
    config: &AppConfig,
    outcome: RenderOutcome,
    title: &str,
    format: Option<OutputFormat>,
    out: Option<PathBuf>,
) -> Result<(), ThumbError> {
    let (path, format) = match (out, format) {
        (Some(path), Some(format)) => (path, format),
        (Some(path), None) => {
            let format = OutputFormat::from_path(&path);
            (path, format)
        }
        (None, format) => {
            let format = format.unwrap_or_default();
            std::fs::create_dir_all(&config.paths.output_dir)?;
            (config.paths.output_dir.join(default_file_name(title, format)), format)
        }
    };

    save_image(&outcome.image, &path, format, config.output.jpeg_quality)?;
    remember(config, &path);

    if outcome.warnings.is_empty() {
        println!("Saved {}", path.display());
    } else {
        println!(
            "Saved {} ({} layer(s) skipped)",
            path.display(),
            outcome.warnings.len()
        );
    }
    Ok(())
}

fn sized(config: AppConfig, size: Option<&str>) -> Result<AppConfig, ThumbError> {
    match size {
        Some(name) => config.with_canvas_size(name),
        None => Ok(config),
    }
}

fn caption_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    image.with_file_name(format!("{}_caption.png", stem))
}

fn remember(config: &AppConfig, path: &Path) {
    let mut recent = RecentFiles::load(&config.paths.history_file, config.paths.history_limit);
    recent.add(path);
    if let Err(e) = recent.save() {
        log::warn!("could not update recent files: {}", e);
    }
}
