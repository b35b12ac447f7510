// ABOUTME: Presentation compiler for markdeck
// ABOUTME: Runs manifest, segmentation, rendering, image rewriting and code post-processing in order

use crate::codeblock;
use crate::config::{DEFAULT_MANIFEST, DEFAULT_STATIC_DIR};
use crate::errors::{DeckError, Result};
use crate::html;
use crate::images::{ImageSizeCache, ImageSizing};
use crate::manifest::{self, Manifest};
use crate::markdown::{ComrakRenderer, MarkdownRenderer};
use crate::pdf::PdfRenderer;
use crate::resources::{self, ResourceFile, ResourceKind};
use crate::rewrite::{ImagePathRewriter, OutputTarget};
use crate::segment::{SegmentOptions, Slide, SlideDocument};
use crate::utils;
use log::{debug, info, warn};
use quick_xml::escape::escape;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the index document written by an export
pub const INDEX_FILE: &str = "index.html";

/// Options controlling a presentation's compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub manifest_name: String,
    pub static_dir: String,
    /// Distribution directory holding the `js/` and `css/` asset directories
    pub assets_dir: Option<PathBuf>,
    pub image_sizing: bool,
    pub fence_aware: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            manifest_name: DEFAULT_MANIFEST.to_string(),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            assets_dir: None,
            image_sizing: true,
            fence_aware: false,
        }
    }
}

/// Result of a static export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub output_dir: PathBuf,
    pub index_path: PathBuf,
    pub slide_count: usize,
    /// Entries copied into the output tree, in copy order
    pub copied: Vec<PathBuf>,
}

/// A compiled deck fragment and how many slides it holds
struct CompiledDeck {
    html: String,
    slide_count: usize,
}

/// A presentation directory and the state kept across its compiles.
///
/// Every compile rebuilds the manifest and slides from disk; only the image
/// size cache survives between calls.
pub struct Presentation {
    root: PathBuf,
    name: String,
    options: CompileOptions,
    renderer: Box<dyn MarkdownRenderer>,
    images: ImageSizeCache,
}

impl Presentation {
    /// Open the presentation rooted at `root` with the comrak renderer.
    pub fn open(root: &Path, options: CompileOptions) -> Result<Self> {
        utils::validate_directory_exists(root)?;
        let root = utils::get_absolute_path(root)?;
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "presentation".to_string());
        let images = ImageSizeCache::new(ImageSizing::detect(options.image_sizing));

        info!("Opened presentation {:?} at {:?}", name, root);
        Ok(Self {
            root,
            name,
            options,
            renderer: Box::new(ComrakRenderer::new()),
            images,
        })
    }

    pub fn with_renderer(mut self, renderer: Box<dyn MarkdownRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Replace the image sizing capability; the cache starts empty.
    pub fn with_image_sizing(mut self, sizing: ImageSizing) -> Self {
        self.images = ImageSizeCache::new(sizing);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn image_cache(&self) -> &ImageSizeCache {
        &self.images
    }

    pub fn manifest(&self) -> Result<Manifest> {
        Manifest::load(&self.root, &self.options.manifest_name)
    }

    /// Markdown sources in compile order
    pub fn source_files(&self) -> Result<Vec<PathBuf>> {
        self.manifest()?.markdown_files(&self.root)
    }

    fn load_document(&self, file: &Path) -> Result<SlideDocument> {
        let text = fs::read_to_string(file).map_err(|source| DeckError::SourceReadError {
            path: file.to_path_buf(),
            source,
        })?;
        let name = manifest::logical_name(&self.root, file);
        let options = SegmentOptions {
            fence_aware: self.options.fence_aware,
        };
        Ok(SlideDocument::parse(&name, &text, options))
    }

    /// Compile every slide into one HTML fragment for `target`.
    ///
    /// Static image references point into the default static-export
    /// directory.
    pub fn compile(&self, target: OutputTarget) -> Result<String> {
        Ok(self.compile_deck(target, &self.static_dir())?.html)
    }

    /// The embedded fragment for live serving
    pub fn render(&self) -> Result<String> {
        self.compile(OutputTarget::Embedded)
    }

    fn static_dir(&self) -> PathBuf {
        self.root.join(&self.options.static_dir)
    }

    fn compile_deck(&self, target: OutputTarget, static_base: &Path) -> Result<CompiledDeck> {
        let manifest = self.manifest()?;
        if !manifest.is_configured() {
            warn!(
                "No {} in {:?}; compiling an empty deck",
                self.options.manifest_name, self.root
            );
        }

        let rewriter = ImagePathRewriter::new(&self.root, static_base, &self.images);
        let mut deck = CompiledDeck {
            html: String::new(),
            slide_count: 0,
        };

        for file in manifest.markdown_files(&self.root)? {
            let document = self.load_document(&file)?;
            debug!(
                "Compiling {} ({} slides)",
                document.name,
                document.slides.len()
            );
            for slide in &document.slides {
                let html = self.compile_slide(&document.name, slide, &rewriter, target)?;
                deck.html.push_str(&html);
                deck.html.push('\n');
                deck.slide_count += 1;
            }
        }

        info!("Compiled {} slides", deck.slide_count);
        Ok(deck)
    }

    fn compile_slide(
        &self,
        name: &str,
        slide: &Slide,
        rewriter: &ImagePathRewriter,
        target: OutputTarget,
    ) -> Result<String> {
        let body = match self.renderer.render(&slide.body) {
            Ok(body) => body,
            Err(e) => {
                warn!("Rendering {} failed, keeping its source: {}", slide.reference, e);
                format!("<pre>{}</pre>\n", escape(&slide.body))
            }
        };
        let body = rewriter.rewrite(name, &body, target)?;

        let wrapped = format!(
            "<div class=\"slide\" data-transition=\"{}\"><div class=\"{}\" ref=\"{}\">\n{}</div>\n</div>",
            escape(&slide.transition),
            escape(&slide.classes.join(" ")),
            escape(&slide.reference),
            body
        );
        Ok(codeblock::process_slide(&wrapped))
    }

    /// Write a self-contained copy of the deck to `output`, or to the
    /// static-export directory inside the presentation when `None`.
    ///
    /// The output directory is recreated from scratch, but only when it is
    /// the default static directory, empty, or a previous export (it holds
    /// an [`INDEX_FILE`]); any other existing directory is refused. Writes
    /// are not transactional: a failure part way leaves a partial tree behind.
    pub fn export(&self, output: Option<&Path>) -> Result<ExportSummary> {
        let output_dir = match output {
            Some(dir) => absolute(dir)?,
            None => self.static_dir(),
        };
        if self.root.starts_with(&output_dir) {
            return Err(DeckError::ValidationError(format!(
                "Refusing to export over the presentation itself: {:?}",
                output_dir
            )));
        }

        if output_dir.exists() && !self.is_replaceable_export(&output_dir)? {
            return Err(DeckError::ValidationError(format!(
                "Refusing to replace {:?}: not empty and not a previous export",
                output_dir
            )));
        }

        let deck = self.compile_deck(OutputTarget::Static, &output_dir)?;

        if output_dir.exists() {
            info!("Clearing previous export at {:?}", output_dir);
            fs::remove_dir_all(&output_dir).map_err(|e| utils::export_error(&output_dir, e))?;
        }
        utils::ensure_directory_exists(&output_dir)?;

        let mut linked = match &self.options.assets_dir {
            Some(assets) => resources::distribution_resources(assets)?,
            None => Vec::new(),
        };
        linked.extend(resources::presentation_resources(&self.root)?);

        let index = html::build_document(&self.name, &deck.html, &linked, false);
        let index_path = output_dir.join(INDEX_FILE);
        fs::write(&index_path, index).map_err(|e| utils::export_error(&index_path, e))?;

        let mut copied = Vec::new();
        match &self.options.assets_dir {
            Some(assets) => {
                for dir in ["js", "css"] {
                    let src = assets.join(dir);
                    if src.is_dir() {
                        utils::copy_entry(&src, &output_dir.join(dir))?;
                        copied.push(src);
                    } else {
                        warn!("Distribution has no {}/ directory at {:?}", dir, assets);
                    }
                }
            }
            None => warn!("No assets directory configured; skipping js/ and css/"),
        }

        for entry in resources::sorted_children(&self.root)? {
            if !self.is_exported_entry(&entry, &output_dir) {
                continue;
            }
            if let Some(base) = entry.file_name() {
                utils::copy_entry(&entry, &output_dir.join(base))?;
                copied.push(entry);
            }
        }

        info!(
            "Exported {} slides to {:?}",
            deck.slide_count, output_dir
        );
        Ok(ExportSummary {
            output_dir,
            index_path,
            slide_count: deck.slide_count,
            copied,
        })
    }

    fn is_replaceable_export(&self, dir: &Path) -> Result<bool> {
        if !dir.is_dir() {
            return Ok(false);
        }
        if dir == self.static_dir() || dir.join(INDEX_FILE).is_file() {
            return Ok(true);
        }
        let mut entries = fs::read_dir(dir).map_err(|e| utils::export_error(dir, e))?;
        Ok(entries.next().is_none())
    }

    /// Directories and loose scripts/styles are copied; the static-export
    /// directory and the output itself never are.
    fn is_exported_entry(&self, entry: &Path, output_dir: &Path) -> bool {
        let is_static = entry
            .file_name()
            .map(|n| n == OsStr::new(&self.options.static_dir))
            .unwrap_or(false);
        if is_static || entry == output_dir || output_dir.starts_with(entry) {
            return false;
        }
        entry.is_dir() || ResourceKind::from_path(entry).is_some()
    }

    /// Print the whole deck into one PDF at `output`.
    ///
    /// Images are referenced through file URLs so the renderer can load
    /// them from disk; presentation stylesheets are inlined and no scripts
    /// are included.
    pub fn pdf(&self, renderer: &dyn PdfRenderer, output: &Path) -> Result<PathBuf> {
        let deck = self.compile_deck(OutputTarget::Static, &self.static_dir())?;

        let mut styles: Vec<ResourceFile> = match &self.options.assets_dir {
            Some(assets) => resources::distribution_resources(assets)?,
            None => Vec::new(),
        };
        styles.extend(resources::presentation_resources(&self.root)?);
        styles.retain(|r| r.kind == ResourceKind::Css);

        let document = html::build_document(&self.name, &deck.html, &styles, true);
        info!("Printing {} slides to {:?}", deck.slide_count, output);
        renderer.render_pdf(&document, output)
    }

    /// Default PDF file name for this presentation
    pub fn pdf_file_name(&self) -> String {
        format!("{}.pdf", self.name)
    }

    /// Resolve a path relative to the presentation root for raw file
    /// serving, rejecting anything outside the root.
    pub fn resolve_asset(&self, relative: &str) -> Result<PathBuf> {
        let candidate = self.root.join(relative.trim_start_matches('/'));
        if !candidate.exists() {
            return Err(DeckError::PathNotFoundError(candidate));
        }
        let resolved = utils::get_absolute_path(&candidate)?;
        if !resolved.starts_with(&self.root) {
            return Err(DeckError::ValidationError(format!(
                "Path escapes the presentation: {}",
                relative
            )));
        }
        Ok(resolved)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
