// ABOUTME: Error types for the markdeck compiler
// ABOUTME: Provides structured error handling for each stage of the slide pipeline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to read slide source {path:?}: {source}")]
    SourceReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed manifest {path:?}: {source}")]
    ManifestParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid section pattern: {0}")]
    SectionPatternError(String),

    #[error("Markdown conversion error: {0}")]
    RenderError(String),

    #[error("Markup tree error: {0}")]
    MarkupError(String),

    #[error("Export failed at {path:?}: {message}")]
    ExportError { path: PathBuf, message: String },

    #[error("Headless browser error: {message}")]
    BrowserError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Browser not found. Make sure Chrome/Chromium is installed.")]
    BrowserNotFound,

    #[error("PDF output is unavailable: built without the `pdf` feature")]
    PdfUnavailable,

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

// Implement conversion from anyhow::Error to our DeckError
impl From<anyhow::Error> for DeckError {
    fn from(err: anyhow::Error) -> Self {
        DeckError::UnknownError(err.to_string())
    }
}

impl From<quick_xml::Error> for DeckError {
    fn from(err: quick_xml::Error) -> Self {
        DeckError::MarkupError(err.to_string())
    }
}

impl From<glob::PatternError> for DeckError {
    fn from(err: glob::PatternError) -> Self {
        DeckError::SectionPatternError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
