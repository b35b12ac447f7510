// ABOUTME: Post-processing of rendered slides for code and terminal transcript blocks
// ABOUTME: Applies @@@lang highlighting classes and splits commandline blocks into command/result pairs

use crate::dom::{self, Element, Node};
use log::{debug, warn};

/// Marker opening the first line of a language-tagged code block
pub const LANG_MARKER: &str = "@@@";

/// Class prefix the highlighter expects on `pre` elements
pub const LANG_CLASS_PREFIX: &str = "sh_";

/// Class flagging a container of terminal transcripts
pub const COMMANDLINE_CLASS: &str = "commandline";

const PROMPT: char = '$';

/// Restructure one wrapped slide.
///
/// Markup that cannot be parsed is returned unchanged; the failure is logged
/// and confined to this slide.
pub fn process_slide(html: &str) -> String {
    let mut root = match dom::parse(html) {
        Ok(root) => root,
        Err(e) => {
            warn!("Leaving slide markup untouched: {}", e);
            return html.to_string();
        }
    };

    tag_languages(&mut root);
    split_transcripts(&mut root, false);
    root.to_html()
}

/// Rule A: `@@@lang` first lines become a `sh_lang` class on the `pre`.
fn tag_languages(el: &mut Element) {
    if el.name == "pre" {
        let mut language = None;
        for_each_code(el, &mut |code: &mut Element| {
            let text = code.text();
            let (first, rest) = text.split_once('\n').unwrap_or((text.as_str(), ""));
            if let Some(lang) = language_of(first) {
                debug!("Tagging code block as {}", lang);
                code.set_text(rest);
                language = Some(lang.to_string());
            }
        });
        if let Some(lang) = language {
            el.set_attr("class", &format!("{}{}", LANG_CLASS_PREFIX, lang));
        }
        return;
    }
    for child in el.child_elements_mut() {
        tag_languages(child);
    }
}

fn language_of(line: &str) -> Option<&str> {
    let lang = line.strip_prefix(LANG_MARKER)?.trim_end_matches('\r');
    if lang.is_empty() || lang.contains(char::is_whitespace) {
        None
    } else {
        Some(lang)
    }
}

/// Rule B: code under a `commandline` container becomes alternating
/// `command` and `result` children.
fn split_transcripts(el: &mut Element, in_commandline: bool) {
    let in_commandline = in_commandline || el.has_class(COMMANDLINE_CLASS);
    if in_commandline && el.name == "pre" {
        for_each_code(el, &mut |code: &mut Element| {
            let parts = transcript_parts(&code.text());
            code.children = parts.into_iter().map(Node::Element).collect();
        });
        return;
    }
    for child in el.child_elements_mut() {
        split_transcripts(child, in_commandline);
    }
}

fn for_each_code(el: &mut Element, f: &mut dyn FnMut(&mut Element)) {
    for child in el.child_elements_mut() {
        if child.name == "code" {
            f(child);
        } else {
            for_each_code(child, f);
        }
    }
}

fn transcript_parts(text: &str) -> Vec<Element> {
    let mut preamble: Vec<&str> = Vec::new();
    let mut steps: Vec<(&str, Vec<&str>)> = Vec::new();

    for line in text.lines() {
        if line.starts_with(PROMPT) {
            steps.push((line, Vec::new()));
        } else if let Some((_, output)) = steps.last_mut() {
            output.push(line);
        } else {
            preamble.push(line);
        }
    }

    let mut parts = Vec::new();
    if preamble.iter().any(|l| !l.trim().is_empty()) {
        parts.push(Element::with_text("code", "result", &preamble.join("\n")));
    }

    let count = steps.len();
    for (i, (command, output)) in steps.into_iter().enumerate() {
        parts.push(Element::with_text("code", "command", command));
        let has_output = output.iter().any(|l| !l.trim().is_empty());
        if has_output || i + 1 < count {
            parts.push(Element::with_text("code", "result", &output.join("\n")));
        }
    }
    parts
}
