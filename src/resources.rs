// ABOUTME: Script and stylesheet resources for markdeck documents
// ABOUTME: Discovers presentation and distribution CSS/JS files and renders their tags

use crate::errors::{DeckError, Result};
use log::{debug, info};
use quick_xml::escape::escape;
use std::fs;
use std::path::{Path, PathBuf};

/// Kind of resource, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Css,
    Js,
}

impl ResourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("css") => Some(ResourceKind::Css),
            Some("js") => Some(ResourceKind::Js),
            _ => None,
        }
    }
}

/// A local CSS or JS file together with the href it is linked by.
#[derive(Debug, Clone)]
pub struct ResourceFile {
    pub path: PathBuf,
    pub href: String,
    pub kind: ResourceKind,
}

impl ResourceFile {
    /// Returns `None` for files that are neither CSS nor JS.
    pub fn new(path: &Path, href: &str) -> Option<Self> {
        ResourceKind::from_path(path).map(|kind| Self {
            path: path.to_path_buf(),
            href: href.to_string(),
            kind,
        })
    }

    /// Read the file content
    pub fn content(&self) -> Result<String> {
        info!("Reading local resource: {:?}", self.path);
        if !self.path.exists() {
            return Err(DeckError::PathNotFoundError(self.path.clone()));
        }
        fs::read_to_string(&self.path).map_err(DeckError::FileReadError)
    }

    /// Generate the HTML tag for the resource, either embedding the content
    /// or linking to `href`.
    pub fn tag(&self, embed: bool) -> Result<String> {
        if embed {
            let content = self.content()?;
            Ok(match self.kind {
                ResourceKind::Css => format!(r#"<style type="text/css">{}</style>"#, content),
                ResourceKind::Js => format!(r#"<script type="text/javascript">{}</script>"#, content),
            })
        } else {
            let href = escape(&self.href);
            Ok(match self.kind {
                ResourceKind::Css => format!(r#"<link rel="stylesheet" href="{}">"#, href),
                ResourceKind::Js => format!(r#"<script src="{}"></script>"#, href),
            })
        }
    }
}

/// Loose `.css`/`.js` files directly in the presentation root, linked by
/// file name.
pub fn presentation_resources(root: &Path) -> Result<Vec<ResourceFile>> {
    let mut found = Vec::new();
    for path in sorted_children(root)? {
        if !path.is_file() {
            continue;
        }
        let name = file_name(&path);
        if let Some(resource) = ResourceFile::new(&path, &name) {
            found.push(resource);
        }
    }
    debug!("Presentation resources: {:?}", found);
    Ok(found)
}

/// Files of the distribution `css/` and `js/` directories, linked relative
/// to the output root.
pub fn distribution_resources(assets_dir: &Path) -> Result<Vec<ResourceFile>> {
    let mut found = Vec::new();
    for (subdir, kind) in [("css", ResourceKind::Css), ("js", ResourceKind::Js)] {
        let dir = assets_dir.join(subdir);
        if !dir.is_dir() {
            continue;
        }
        for path in sorted_children(&dir)? {
            if ResourceKind::from_path(&path) != Some(kind) {
                continue;
            }
            let href = format!("{}/{}", subdir, file_name(&path));
            if let Some(resource) = ResourceFile::new(&path, &href) {
                found.push(resource);
            }
        }
    }
    Ok(found)
}

/// Direct children of `dir`, hidden entries skipped, sorted by path.
pub fn sorted_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        children.push(entry.path());
    }
    children.sort();
    Ok(children)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
