// ABOUTME: HTML document assembly for exported and printed decks
// ABOUTME: Wraps a compiled slide fragment with title, stylesheets and scripts

use crate::errors::{DeckError, Result};
use crate::resources::{ResourceFile, ResourceKind};
use log::{info, warn};
use quick_xml::escape::escape;
use std::fs;
use std::path::Path;

/// Build a standalone document around the compiled `slides` fragment.
///
/// CSS resources go into the head and JS resources at the end of the body,
/// either linked or embedded depending on `embed_resources`. A resource that
/// cannot be read is skipped with a warning.
pub fn build_document(
    title: &str,
    slides: &str,
    resources: &[ResourceFile],
    embed_resources: bool,
) -> String {
    let mut html_doc = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html_doc.push_str("<meta charset=\"UTF-8\">\n");
    html_doc.push_str(&format!("<title>{}</title>\n", escape(title)));

    for css in resources.iter().filter(|r| r.kind == ResourceKind::Css) {
        push_tag(&mut html_doc, css, embed_resources);
    }

    html_doc.push_str("</head>\n<body>\n<div id=\"slides\">\n");
    html_doc.push_str(slides);
    html_doc.push_str("</div>\n");

    for js in resources.iter().filter(|r| r.kind == ResourceKind::Js) {
        push_tag(&mut html_doc, js, embed_resources);
    }

    html_doc.push_str("</body>\n</html>\n");
    html_doc
}

fn push_tag(html_doc: &mut String, resource: &ResourceFile, embed: bool) {
    match resource.tag(embed) {
        Ok(tag) => {
            html_doc.push_str(&tag);
            html_doc.push('\n');
        }
        Err(e) => {
            // Continue with other resources rather than failing completely
            warn!("Failed to include resource {:?}: {}", resource.path, e);
        }
    }
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);

    if let Some(parent) = output_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(DeckError::FileReadError)?;
        }
    }

    fs::write(output_path, html_content).map_err(DeckError::FileReadError)?;

    Ok(())
}
