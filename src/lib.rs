// ABOUTME: Library module for the markdeck slide compiler.
// ABOUTME: Compiles manifest-ordered markdown documents into an HTML slide deck.

// Reexport modules
pub mod codeblock;
pub mod compiler;
pub mod config;
pub mod dom;
pub mod errors;
pub mod html;
pub mod images;
pub mod manifest;
pub mod markdown;
pub mod pdf;
pub mod resources;
pub mod rewrite;
pub mod segment;
pub mod utils;

// Reexport common types and functions
pub use compiler::{CompileOptions, ExportSummary, Presentation};
pub use config::Config;
pub use errors::{DeckError, Result};
pub use images::{DimensionProbe, ImageSizeCache, ImageSizing};
pub use manifest::{Manifest, Section};
pub use markdown::{ComrakRenderer, MarkdownRenderer};
pub use pdf::{PdfConfig, PdfRenderer};
pub use rewrite::OutputTarget;
pub use segment::{Slide, SlideDocument};
