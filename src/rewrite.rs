// ABOUTME: Image reference rewriting for rendered slides
// ABOUTME: Prefixes img sources with the serving or export location and adds known dimensions

use crate::errors::{DeckError, Result};
use crate::images::ImageSizeCache;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::Path;
use url::Url;

/// Route prefix under which the live service serves presentation images
pub const IMAGE_ROUTE: &str = "/image/";

/// Matches the `src` attribute of an img tag, split around the value
static IMG_SRC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(<img\b[^>]*?\ssrc=")([^"]*)(")"#).unwrap());

/// Where the compiled deck will be displayed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    /// Served by the live service, images under [`IMAGE_ROUTE`]
    Embedded,
    /// Written to disk, images under the static-export directory
    Static,
}

/// Rewrites image references of one presentation.
pub struct ImagePathRewriter<'a> {
    root: &'a Path,
    static_base: &'a Path,
    cache: &'a ImageSizeCache,
}

impl<'a> ImagePathRewriter<'a> {
    /// `static_base` is the directory a static copy of the presentation tree
    /// lives in; it must be absolute for static output.
    pub fn new(root: &'a Path, static_base: &'a Path, cache: &'a ImageSizeCache) -> Self {
        Self {
            root,
            static_base,
            cache,
        }
    }

    /// Rewrite every img src in `html`, which belongs to the document `name`.
    pub fn rewrite(&self, name: &str, html: &str, target: OutputTarget) -> Result<String> {
        let prefix = directory_prefix(name);
        let base = self.base_for(prefix, target)?;
        let image_dir = self.root.join(prefix);

        let rewritten = IMG_SRC_RE.replace_all(html, |caps: &Captures| {
            let src = &caps[2];
            let mut out = format!("{}{}{}{}", &caps[1], base, src, &caps[3]);
            if let Some((w, h)) = self.cache.get(&image_dir.join(src)) {
                out.push_str(&format!(r#" width="{}" height="{}""#, w, h));
            }
            out
        });
        Ok(rewritten.into_owned())
    }

    fn base_for(&self, prefix: &str, target: OutputTarget) -> Result<String> {
        match target {
            OutputTarget::Embedded => {
                if prefix.is_empty() {
                    Ok(IMAGE_ROUTE.to_string())
                } else {
                    Ok(format!("{}{}/", IMAGE_ROUTE, prefix))
                }
            }
            OutputTarget::Static => {
                let dir = self.static_base.join(prefix);
                Url::from_directory_path(&dir)
                    .map(String::from)
                    .map_err(|_| {
                        DeckError::ValidationError(format!(
                            "Static image directory must be absolute: {:?}",
                            dir
                        ))
                    })
            }
        }
    }
}

/// Document name without its last segment.
fn directory_prefix(name: &str) -> &str {
    match name.rfind('/') {
        Some(idx) => &name[..idx],
        None => "",
    }
}
