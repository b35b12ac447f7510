use markdeck::{CompileOptions, DeckError, Presentation};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).expect("Failed to create parent dir");
    fs::write(path, content).expect("Failed to write fixture file");
}

// Presentation with one image slide, loose assets and a stale export
fn create_presentation() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let root = dir.path();
    write_file(root, "showoff.json", r#"[{"section": "deck"}]"#);
    write_file(
        root,
        "deck/page1.md",
        "!SLIDE\n# Chart\n\n![chart](a/b.png)\n!SLIDE bullets transition=fade\n* one\n",
    );
    write_file(root, "deck/a/b.png", "not really a png");
    write_file(root, "theme.css", "h1 { color: #333; }");
    write_file(root, "app.js", "console.log('deck');");
    write_file(root, "notes.txt", "speaker notes");
    write_file(root, "static/stale.html", "old export");
    dir
}

fn create_assets() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_file(dir.path(), "js/deck.js", "// navigation");
    write_file(dir.path(), "css/deck.css", ".slide { display: none; }");
    dir
}

fn open(root: &Path, assets: Option<&Path>) -> Presentation {
    let options = CompileOptions {
        assets_dir: assets.map(Path::to_path_buf),
        image_sizing: false,
        ..CompileOptions::default()
    };
    Presentation::open(root, options).expect("Failed to open presentation")
}

#[test]
fn test_export_writes_static_tree() {
    let pres_dir = create_presentation();
    let assets = create_assets();
    let presentation = open(pres_dir.path(), Some(assets.path()));

    let summary = presentation.export(None).expect("Export failed");
    let out = presentation.root().join("static");

    assert_eq!(summary.output_dir, out);
    assert_eq!(summary.slide_count, 2);
    assert!(!out.join("stale.html").exists(), "old export should be cleared");

    // Distribution assets
    assert!(out.join("js/deck.js").is_file());
    assert!(out.join("css/deck.css").is_file());

    // Presentation-owned directories and loose scripts/styles
    assert!(out.join("deck/page1.md").is_file());
    assert!(out.join("deck/a/b.png").is_file());
    assert!(out.join("theme.css").is_file());
    assert!(out.join("app.js").is_file());
    assert!(!out.join("notes.txt").exists());
    assert!(!out.join("showoff.json").exists());
    assert!(!out.join("static").exists());

    let index = fs::read_to_string(&summary.index_path).expect("Missing index.html");
    assert!(index.starts_with("<!DOCTYPE html>"));
    assert!(index.contains(r#"<link rel="stylesheet" href="css/deck.css">"#));
    assert!(index.contains(r#"<link rel="stylesheet" href="theme.css">"#));
    assert!(index.contains(r#"<script src="js/deck.js"></script>"#));
    assert!(index.contains(r#"<script src="app.js"></script>"#));
    assert!(index.contains(r#"data-transition="fade""#));
    assert!(index.contains(r#"class="content bullets" ref="deck/page1/2""#));

    let image_url = format!("file://{}/deck/a/b.png", out.display());
    assert!(index.contains(&image_url), "image should point into the export");
}

#[test]
fn test_export_to_custom_directory() {
    let pres_dir = create_presentation();
    let out_dir = TempDir::new().unwrap();
    let out = out_dir.path().join("site");
    let presentation = open(pres_dir.path(), None);

    let summary = presentation.export(Some(&out)).expect("Export failed");

    assert_eq!(summary.index_path, out.join("index.html"));
    assert!(out.join("deck/a/b.png").is_file());
    assert!(!out.join("js").exists(), "no distribution configured");
    assert!(!out.join("static").exists());

    let index = fs::read_to_string(&summary.index_path).expect("Missing index.html");
    let image_url = format!("file://{}/deck/a/b.png", out.display());
    assert!(index.contains(&image_url), "image should point into {:?}", out);
    assert!(!index.contains("/static/deck/"));

    // A second export replaces the first
    write_file(&out, "leftover.html", "old");
    presentation.export(Some(&out)).expect("Re-export failed");
    assert!(!out.join("leftover.html").exists());
}

#[test]
fn test_export_keeps_unrelated_directory() {
    let pres_dir = create_presentation();
    let out_dir = TempDir::new().unwrap();
    let out = out_dir.path().join("precious");
    write_file(&out, "thesis.tex", "years of work");
    let presentation = open(pres_dir.path(), None);

    let err = presentation.export(Some(&out)).unwrap_err();
    assert!(matches!(err, DeckError::ValidationError(_)));
    assert_eq!(
        fs::read_to_string(out.join("thesis.tex")).unwrap(),
        "years of work"
    );
    assert!(!out.join("index.html").exists());
}

#[test]
fn test_export_into_empty_directory() {
    let pres_dir = create_presentation();
    let out_dir = TempDir::new().unwrap();
    let presentation = open(pres_dir.path(), None);

    let summary = presentation.export(Some(out_dir.path())).expect("Export failed");
    assert!(summary.index_path.is_file());
    assert!(out_dir.path().join("deck/a/b.png").is_file());
}

#[test]
fn test_export_refuses_presentation_root() {
    let pres_dir = create_presentation();
    let presentation = open(pres_dir.path(), None);
    let root = presentation.root().to_path_buf();

    let err = presentation.export(Some(&root)).unwrap_err();
    assert!(matches!(err, DeckError::ValidationError(_)));
    assert!(root.join("showoff.json").exists());
}

#[test]
fn test_export_without_manifest_writes_empty_deck() {
    let dir = TempDir::new().unwrap();
    let presentation = open(dir.path(), None);
    let summary = presentation.export(None).expect("Export failed");
    assert_eq!(summary.slide_count, 0);
    assert!(summary.index_path.is_file());
}

#[test]
fn test_resolve_asset_stays_inside_root() {
    let pres_dir = create_presentation();
    let presentation = open(pres_dir.path(), None);

    let found = presentation.resolve_asset("/deck/a/b.png").unwrap();
    assert!(found.ends_with("deck/a/b.png"));

    assert!(presentation.resolve_asset("deck/missing.png").is_err());

    let outside = TempDir::new().unwrap();
    write_file(outside.path(), "secret.txt", "x");
    let name = outside.path().file_name().unwrap().to_string_lossy();
    let escape = format!("../{}/secret.txt", name);
    if presentation.root().parent() == outside.path().parent() {
        assert!(matches!(
            presentation.resolve_asset(&escape),
            Err(DeckError::ValidationError(_))
        ));
    }
}
