// ABOUTME: Slide segmentation for markdeck documents
// ABOUTME: Splits a document at !SLIDE directives into slides with classes and transitions

/// Directive that starts a new slide when found at the start of a line
pub const SLIDE_MARKER: &str = "!SLIDE";

/// Class every slide carries first
pub const CONTENT_CLASS: &str = "content";

/// Transition used when a slide names none
pub const DEFAULT_TRANSITION: &str = "none";

const TRANSITION_PREFIX: &str = "transition=";

/// One displayable unit of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub classes: Vec<String>,
    pub transition: String,
    pub seq: Option<usize>,
    pub reference: String,
    pub body: String,
}

/// A source document split into slides.
#[derive(Debug, Clone)]
pub struct SlideDocument {
    pub name: String,
    pub slides: Vec<Slide>,
}

/// Segmentation behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentOptions {
    /// Ignore directives that appear inside ``` or ~~~ fenced blocks
    pub fence_aware: bool,
}

impl SlideDocument {
    /// Split `text` into slides for the document named `name`.
    pub fn parse(name: &str, text: &str, options: SegmentOptions) -> Self {
        let fragments: Vec<&str> = split_fragments(text, options.fence_aware)
            .into_iter()
            .filter(|f| !f.is_empty())
            .collect();
        let numbered = fragments.len() > 1;

        let slides = fragments
            .into_iter()
            .enumerate()
            .map(|(i, fragment)| {
                let seq = numbered.then_some(i + 1);
                build_slide(name, fragment, seq)
            })
            .collect();

        Self {
            name: name.to_string(),
            slides,
        }
    }
}

fn build_slide(name: &str, fragment: &str, seq: Option<usize>) -> Slide {
    let (header, body) = match fragment.split_once('\n') {
        Some((header, body)) => (header, body),
        None => (fragment, ""),
    };

    let mut transition = DEFAULT_TRANSITION.to_string();
    let mut classes = vec![CONTENT_CLASS.to_string()];
    for token in header.split_whitespace() {
        match token.strip_prefix(TRANSITION_PREFIX) {
            Some(value) if !value.is_empty() => transition = value.to_string(),
            _ => classes.push(token.to_string()),
        }
    }

    let reference = match seq {
        Some(n) => format!("{}/{}", name, n),
        None => name.to_string(),
    };

    Slide {
        classes,
        transition,
        seq,
        reference,
        body: body.to_string(),
    }
}

/// Split at line-start markers. The marker itself is consumed, the rest of
/// its line stays with the fragment as the class header.
fn split_fragments(text: &str, fence_aware: bool) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    let mut fence: Option<&str> = None;

    for line in text.split_inclusive('\n') {
        if fence_aware {
            let trimmed = line.trim_start();
            if let Some(open) = fence {
                if trimmed.starts_with(open) {
                    fence = None;
                }
            } else if trimmed.starts_with("```") {
                fence = Some("```");
            } else if trimmed.starts_with("~~~") {
                fence = Some("~~~");
            }
        }

        if fence.is_none() && line.starts_with(SLIDE_MARKER) {
            fragments.push(&text[start..offset]);
            start = offset + SLIDE_MARKER.len();
        }
        offset += line.len();
    }
    fragments.push(&text[start..]);
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(name: &str, text: &str) -> SlideDocument {
        SlideDocument::parse(name, text, SegmentOptions::default())
    }

    #[test]
    fn unmarked_document_is_one_unnumbered_slide() {
        let doc = parse("intro/welcome", "center\n# Hello\n\nWorld");
        assert_eq!(doc.slides.len(), 1);
        let slide = &doc.slides[0];
        assert_eq!(slide.seq, None);
        assert_eq!(slide.reference, "intro/welcome");
        assert_eq!(slide.classes, vec!["content", "center"]);
        assert_eq!(slide.body, "# Hello\n\nWorld");
    }

    #[test]
    fn markers_number_slides_in_order() {
        let text = "!SLIDE\n# One\n!SLIDE bullets\n# Two\n!SLIDE\n# Three\n";
        let doc = parse("deck/page", text);
        let seqs: Vec<_> = doc.slides.iter().map(|s| s.seq).collect();
        assert_eq!(seqs, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(doc.slides[1].reference, "deck/page/2");
        assert_eq!(doc.slides[1].classes, vec!["content", "bullets"]);
        assert_eq!(doc.slides[2].body, "# Three\n");
    }

    #[test]
    fn single_marker_is_unnumbered() {
        let doc = parse("a", "!SLIDE\n# Only\n");
        assert_eq!(doc.slides.len(), 1);
        assert_eq!(doc.slides[0].seq, None);
        assert_eq!(doc.slides[0].reference, "a");
    }

    #[test]
    fn transition_token_is_extracted() {
        let doc = parse("a", "!SLIDE transition=fade center\nbody");
        let slide = &doc.slides[0];
        assert_eq!(slide.transition, "fade");
        assert_eq!(slide.classes, vec!["content", "center"]);
    }

    #[test]
    fn last_transition_wins() {
        let doc = parse("a", "!SLIDE transition=fade transition=zoom\nbody");
        assert_eq!(doc.slides[0].transition, "zoom");
        assert_eq!(doc.slides[0].classes, vec!["content"]);
    }

    #[test]
    fn transition_defaults_to_none() {
        let doc = parse("a", "!SLIDE\nbody");
        assert_eq!(doc.slides[0].transition, DEFAULT_TRANSITION);
    }

    #[test]
    fn content_class_stays_first() {
        let doc = parse("a", "!SLIDE content smaller content\nbody");
        assert_eq!(
            doc.slides[0].classes,
            vec!["content", "content", "smaller", "content"]
        );
    }

    #[test]
    fn marker_must_start_the_line() {
        let doc = parse("a", "!SLIDE\nsee  !SLIDE here\n");
        assert_eq!(doc.slides.len(), 1);
        assert!(doc.slides[0].body.contains("!SLIDE here"));
    }

    #[test]
    fn empty_document_has_no_slides() {
        assert!(parse("a", "").slides.is_empty());
    }

    #[test]
    fn naive_split_breaks_fenced_code() {
        let text = "!SLIDE\n```\n!SLIDE\n```\n";
        assert_eq!(parse("a", text).slides.len(), 2);
    }

    #[test]
    fn fence_aware_split_keeps_fenced_code() {
        let text = "!SLIDE\n```\n!SLIDE\n```\n!SLIDE\nnext\n";
        let doc = SlideDocument::parse("a", text, SegmentOptions { fence_aware: true });
        assert_eq!(doc.slides.len(), 2);
        assert!(doc.slides[0].body.contains("!SLIDE"));
    }
}
