// ABOUTME: Manifest loading for markdeck presentations
// ABOUTME: Resolves the ordered section list to an ordered list of source files

use crate::errors::{DeckError, Result};
use glob::MatchOptions;
use log::{debug, info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of documents fed to the slide pipeline
pub const MARKDOWN_EXTENSION: &str = "md";

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    section: String,
}

/// Ordered list of sections making up a presentation.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// Section names in presentation order
    pub sections: Vec<String>,
    /// Path of the manifest file, `None` when the presentation has none
    pub source: Option<PathBuf>,
}

impl Manifest {
    /// Load the manifest from `root/manifest_name`.
    ///
    /// A missing manifest is not an error: the result has no sections and
    /// [`Manifest::is_configured`] returns `false`. A manifest that is present
    /// but not a JSON array of `{"section": "..."}` objects fails with
    /// [`DeckError::ManifestParseError`].
    pub fn load(root: &Path, manifest_name: &str) -> Result<Self> {
        let path = root.join(manifest_name);
        if !path.is_file() {
            info!("No manifest at {:?}; presentation is empty", path);
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path).map_err(|source| DeckError::SourceReadError {
            path: path.clone(),
            source,
        })?;
        let sections = Self::parse(&raw).map_err(|source| DeckError::ManifestParseError {
            path: path.clone(),
            source,
        })?;

        debug!("Manifest {:?} lists sections {:?}", path, sections);
        Ok(Self {
            sections,
            source: Some(path),
        })
    }

    /// Parse manifest JSON into section names, keeping array order.
    pub fn parse(raw: &str) -> std::result::Result<Vec<String>, serde_json::Error> {
        let entries: Vec<ManifestEntry> = serde_json::from_str(raw)?;
        Ok(entries.into_iter().map(|e| e.section).collect())
    }

    /// Whether a manifest file was found at all
    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    /// Resolve every section against `root`, in manifest order.
    pub fn resolve(&self, root: &Path) -> Result<Vec<Section>> {
        self.sections
            .iter()
            .map(|name| Section::resolve(root, name))
            .collect()
    }

    /// All markdown files of the presentation in compile order.
    pub fn markdown_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .resolve(root)?
            .into_iter()
            .flat_map(|section| section.markdown_files())
            .collect())
    }
}

/// A named section resolved to its sorted filesystem entries.
#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub entries: Vec<PathBuf>,
}

impl Section {
    /// Enumerate everything under `root/name` recursively, sorted by full path.
    pub fn resolve(root: &Path, name: &str) -> Result<Self> {
        let dir = root.join(name);
        if !dir.is_dir() {
            warn!("Section {:?} has no directory at {:?}", name, dir);
            return Ok(Self {
                name: name.to_string(),
                entries: Vec::new(),
            });
        }

        let pattern = format!(
            "{}/**/*",
            glob::Pattern::escape(&dir.to_string_lossy())
        );
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: true,
        };

        let mut entries: Vec<PathBuf> = glob::glob_with(&pattern, options)?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Skipping unreadable entry in section {:?}: {}", name, e);
                    None
                }
            })
            .collect();
        // Plain string order, so `a-b.md` and `a.md` come before `a/x.md`
        entries.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

        debug!("Section {:?} resolved to {} entries", name, entries.len());
        Ok(Self {
            name: name.to_string(),
            entries,
        })
    }

    /// Entries that are markdown documents, in sorted order.
    pub fn markdown_files(self) -> impl Iterator<Item = PathBuf> {
        self.entries.into_iter().filter(|p| is_markdown(p))
    }
}

fn is_markdown(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext == MARKDOWN_EXTENSION)
            .unwrap_or(false)
}

/// Logical document name: path relative to `root`, extension stripped,
/// components joined with `/`.
pub fn logical_name(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let stem = relative.with_extension("");
    stem.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MANIFEST as DEFAULT_NAME;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn missing_manifest_is_not_configured() {
        let dir = TempDir::new().unwrap();
        let manifest = Manifest::load(dir.path(), DEFAULT_NAME).unwrap();
        assert!(!manifest.is_configured());
        assert!(manifest.sections.is_empty());
    }

    #[test]
    fn malformed_manifest_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), DEFAULT_NAME, "[{\"section\": }");
        let err = Manifest::load(dir.path(), DEFAULT_NAME).unwrap_err();
        assert!(matches!(err, DeckError::ManifestParseError { .. }));
    }

    #[test]
    fn wrong_shape_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), DEFAULT_NAME, "{\"section\": \"intro\"}");
        let err = Manifest::load(dir.path(), DEFAULT_NAME).unwrap_err();
        assert!(matches!(err, DeckError::ManifestParseError { .. }));
    }

    #[test]
    fn section_order_follows_manifest() {
        let sections =
            Manifest::parse(r#"[{"section": "zeta"}, {"section": "alpha"}]"#).unwrap();
        assert_eq!(sections, vec!["zeta", "alpha"]);
    }

    #[test]
    fn section_files_are_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "one/b.md", "b");
        write(dir.path(), "one/a.md", "a");
        write(dir.path(), "one/nested/c.md", "c");
        write(dir.path(), "one/picture.png", "");
        write(dir.path(), "one/.hidden.md", "");

        let section = Section::resolve(dir.path(), "one").unwrap();
        assert!(section.entries.iter().any(|p| p.ends_with("picture.png")));

        let names: Vec<String> = section
            .markdown_files()
            .map(|p| logical_name(dir.path(), &p))
            .collect();
        assert_eq!(names, vec!["one/a", "one/b", "one/nested/c"]);
    }

    #[test]
    fn section_files_sort_by_full_path_string() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "s/a.md", "a");
        write(dir.path(), "s/a-b.md", "ab");
        write(dir.path(), "s/a/x.md", "x");

        let names: Vec<String> = Section::resolve(dir.path(), "s")
            .unwrap()
            .markdown_files()
            .map(|p| logical_name(dir.path(), &p))
            .collect();
        assert_eq!(names, vec!["s/a-b", "s/a", "s/a/x"]);
    }

    #[test]
    fn missing_section_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let section = Section::resolve(dir.path(), "nope").unwrap();
        assert!(section.entries.is_empty());
    }
}
