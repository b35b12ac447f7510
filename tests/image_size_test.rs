#![cfg(feature = "image-size")]

use markdeck::{CompileOptions, Presentation};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_real_images_get_dimensions() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let root = dir.path();
    fs::create_dir_all(root.join("deck/a")).unwrap();
    fs::write(root.join("showoff.json"), r#"[{"section": "deck"}]"#).unwrap();
    fs::write(
        root.join("deck/page1.md"),
        "!SLIDE\n![ok](a/b.png)\n!SLIDE\n![gone](a/missing.png)\n",
    )
    .unwrap();
    image::RgbImage::new(320, 240)
        .save(root.join("deck/a/b.png"))
        .expect("Failed to write png");

    let presentation = Presentation::open(root, CompileOptions::default()).unwrap();
    let html = presentation.render().unwrap();

    assert!(html.contains(r#"<img src="/image/deck/a/b.png" width="320" height="240" alt="ok" />"#));
    assert!(html.contains(r#"<img src="/image/deck/a/missing.png" alt="gone" />"#));

    // Both lookups, including the failed one, are remembered
    assert_eq!(presentation.image_cache().len(), 2);
    presentation.render().unwrap();
    assert_eq!(presentation.image_cache().len(), 2);
}

#[test]
fn test_disabled_sizing_leaves_tags_bare() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("s")).unwrap();
    fs::write(root.join("showoff.json"), r#"[{"section": "s"}]"#).unwrap();
    fs::write(root.join("s/p.md"), "!SLIDE\n![x](x.png)\n").unwrap();
    image::RgbImage::new(10, 10).save(root.join("s/x.png")).unwrap();

    let options = CompileOptions {
        image_sizing: false,
        ..CompileOptions::default()
    };
    let presentation = Presentation::open(root, options).unwrap();
    let html = presentation.render().unwrap();
    assert!(html.contains(r#"<img src="/image/s/x.png" alt="x" />"#));
    assert!(presentation.image_cache().is_empty());
}
