// ABOUTME: Markdown rendering capability for slide bodies
// ABOUTME: Defines the renderer trait and the comrak-backed default implementation

use crate::errors::Result;
use comrak::{markdown_to_html, ComrakOptions};

/// Turns one slide body into an HTML fragment.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, body: &str) -> Result<String>;
}

/// Renderer backed by comrak.
pub struct ComrakRenderer {
    options: ComrakOptions,
}

impl Default for ComrakRenderer {
    fn default() -> Self {
        let mut options = ComrakOptions::default();
        options.render.unsafe_ = true; // Allow raw HTML
        options.extension.table = true;
        options.extension.strikethrough = true;
        options.extension.autolink = true;
        Self { options }
    }
}

impl ComrakRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, body: &str) -> Result<String> {
        Ok(markdown_to_html(body, &self.options))
    }
}
