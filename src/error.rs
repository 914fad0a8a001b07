//! # Error Types
//!
//! This module defines error types used throughout the thumbsmith library.

use thiserror::Error;

use crate::generate::GenerationError;

/// Main error type for thumbsmith operations
#[derive(Debug, Error)]
pub enum ThumbError {
    /// Image decoding, resizing or encoding failed
    #[error("Image error: {0}")]
    Image(String),

    /// Template could not be parsed, validated or saved
    #[error("Template error: {0}")]
    Template(String),

    /// Malformed hex color string
    #[error("Invalid color: {0}")]
    Color(String),

    /// Font file could not be read or parsed
    #[error("Font error: {0}")]
    Font(String),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// Writing a rendered image failed
    #[error("Output error: {0}")]
    Output(String),

    /// Generative background image could not be produced
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// JSON (de)serialization error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, ThumbError>;
