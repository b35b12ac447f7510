// ABOUTME: PDF output for markdeck presentations
// ABOUTME: Prints a one-page deck document to PDF through a headless browser

use crate::errors::Result;
use std::path::{Path, PathBuf};

/// Configuration for browser printing
#[derive(Debug, Clone)]
pub struct PdfConfig {
    pub width: u32,
    pub height: u32,
    pub timeout_ms: u64,
    pub browser_path: Option<String>,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            timeout_ms: 30000, // 30 seconds
            browser_path: None,
        }
    }
}

/// Turns a complete HTML document into a PDF file.
pub trait PdfRenderer {
    /// Render `html` into `output` and return the written path.
    fn render_pdf(&self, html: &str, output: &Path) -> Result<PathBuf>;
}

/// The built-in renderer, or [`crate::DeckError::PdfUnavailable`] when the crate
/// was built without it.
pub fn default_renderer(config: PdfConfig) -> Result<Box<dyn PdfRenderer>> {
    #[cfg(feature = "pdf")]
    {
        Ok(Box::new(chrome::ChromePdfRenderer::new(config)))
    }
    #[cfg(not(feature = "pdf"))]
    {
        let _ = config;
        Err(crate::errors::DeckError::PdfUnavailable)
    }
}

#[cfg(feature = "pdf")]
pub use chrome::ChromePdfRenderer;

#[cfg(feature = "pdf")]
mod chrome {
    use super::{PdfConfig, PdfRenderer};
    use crate::errors::{DeckError, Result};
    use headless_chrome::{Browser, LaunchOptionsBuilder};
    use log::{info, warn};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use url::Url;

    /// Prints through Chrome/Chromium in headless mode.
    pub struct ChromePdfRenderer {
        config: PdfConfig,
    }

    impl ChromePdfRenderer {
        pub fn new(config: PdfConfig) -> Self {
            Self { config }
        }

        fn launch(&self) -> Result<Browser> {
            let mut launch_options_builder = LaunchOptionsBuilder::default();
            launch_options_builder.window_size(Some((self.config.width, self.config.height)));
            launch_options_builder.headless(true);

            match &self.config.browser_path {
                Some(browser_path) => {
                    launch_options_builder.path(Some(browser_path.into()));
                }
                None => {
                    if headless_chrome::browser::default_executable().is_err() {
                        return Err(DeckError::BrowserNotFound);
                    }
                }
            }

            let launch_options =
                launch_options_builder
                    .build()
                    .map_err(|e| DeckError::BrowserError {
                        message: format!("Failed to build browser options: {:?}", e),
                        source: None,
                    })?;

            info!("Launching headless browser");
            Browser::new(launch_options).map_err(|e| {
                let message = format!("Failed to launch browser: {}", e);
                warn!("{}", message);
                DeckError::BrowserError {
                    message,
                    source: None,
                }
            })
        }
    }

    impl PdfRenderer for ChromePdfRenderer {
        fn render_pdf(&self, html: &str, output: &Path) -> Result<PathBuf> {
            let page = std::env::temp_dir().join(format!("markdeck-{}.html", uuid::Uuid::new_v4()));
            fs::write(&page, html)?;

            let result = self.print_page(&page, output);

            if let Err(e) = fs::remove_file(&page) {
                warn!("Failed to clean up {:?}: {}", page, e);
            }
            result
        }
    }

    impl ChromePdfRenderer {
        fn print_page(&self, page: &Path, output: &Path) -> Result<PathBuf> {
            let browser = self.launch()?;
            let url = Url::from_file_path(page).map_err(|_| {
                DeckError::ValidationError(format!("Not an absolute path: {:?}", page))
            })?;

            info!("Opening page at URL: {}", url);
            let tab = browser.new_tab().map_err(|e| DeckError::BrowserError {
                message: format!("Failed to create new tab: {}", e),
                source: None,
            })?;

            tab.navigate_to(url.as_str())
                .map_err(|e| DeckError::BrowserError {
                    message: format!("Failed to navigate to deck: {}", e),
                    source: None,
                })?;
            tab.wait_until_navigated()
                .map_err(|e| DeckError::BrowserError {
                    message: format!("Navigation failed: {}", e),
                    source: None,
                })?;
            tab.wait_for_element_with_custom_timeout(
                "body",
                Duration::from_millis(self.config.timeout_ms),
            )
            .map_err(|e| DeckError::BrowserError {
                message: format!("Failed to wait for body element: {}", e),
                source: None,
            })?;

            let pdf = tab.print_to_pdf(None).map_err(|e| DeckError::BrowserError {
                message: format!("Failed to print PDF: {}", e),
                source: None,
            })?;

            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(output, pdf)?;
            info!("PDF written to {:?}", output);
            Ok(output.to_path_buf())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_slide_size() {
        let config = PdfConfig::default();
        assert_eq!((config.width, config.height), (1280, 720));
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn renderer_is_unavailable_without_feature() {
        assert!(matches!(
            default_renderer(PdfConfig::default()),
            Err(crate::errors::DeckError::PdfUnavailable)
        ));
    }
}
