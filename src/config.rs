// ABOUTME: Configuration module for the markdeck compiler
// ABOUTME: Provides configuration settings and environment variable handling

use crate::compiler::CompileOptions;
use crate::pdf::PdfConfig;
use std::env;
use std::path::PathBuf;

/// Default manifest file name looked up in the presentation root
pub const DEFAULT_MANIFEST: &str = "showoff.json";

/// Default name of the static-export subdirectory
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Global configuration for the application
pub struct Config {
    pub manifest_name: String,
    pub assets_dir: Option<PathBuf>,
    pub static_dir: String,
    pub image_sizing: bool,
    pub fence_aware: bool,
    pub browser_path: Option<String>,
    pub default_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_name: DEFAULT_MANIFEST.to_string(),
            assets_dir: None,
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            image_sizing: true,
            fence_aware: false,
            browser_path: env::var("BROWSER_PATH").ok(),
            default_timeout_ms: 30000, // 30 seconds
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let manifest_name =
            env::var("DECK_MANIFEST").unwrap_or_else(|_| DEFAULT_MANIFEST.to_string());
        let assets_dir = env::var("DECK_ASSETS_DIR").ok().map(PathBuf::from);
        let static_dir =
            env::var("DECK_STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string());
        let image_sizing = env::var("DECK_IMAGE_SIZING")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(true);
        let fence_aware = env::var("DECK_FENCE_AWARE")
            .ok()
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(false);
        let browser_path = env::var("BROWSER_PATH").ok().filter(|s| !s.is_empty());
        let default_timeout_ms = env::var("DEFAULT_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30000);

        Self {
            manifest_name,
            assets_dir,
            static_dir,
            image_sizing,
            fence_aware,
            browser_path,
            default_timeout_ms,
        }
    }

    /// Get compiler options derived from this config
    pub fn compiler_options(&self) -> CompileOptions {
        CompileOptions {
            manifest_name: self.manifest_name.clone(),
            static_dir: self.static_dir.clone(),
            assets_dir: self.assets_dir.clone(),
            image_sizing: self.image_sizing,
            fence_aware: self.fence_aware,
        }
    }

    /// Get a PDF configuration with defaults from this config
    pub fn pdf_config(&self, width: Option<u32>, height: Option<u32>) -> PdfConfig {
        PdfConfig {
            width: width.unwrap_or(1280),
            height: height.unwrap_or(720),
            timeout_ms: self.default_timeout_ms,
            browser_path: self.browser_path.clone(),
        }
    }
}
