// ABOUTME: Small mutable markup tree for post-processing rendered slides
// ABOUTME: Parses slide markup with quick-xml, tolerating HTML void tags and entities, and serializes it back

use crate::errors::{DeckError, Result};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// HTML elements that never have content and are written self-closed
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Comments and other markup kept verbatim
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Element with a class attribute and a single text child
    pub fn with_text(name: &str, class: &str, text: &str) -> Self {
        let mut el = Self::new(name);
        el.set_attr("class", class);
        el.set_text(text);
        el
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, key: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((key.to_string(), value.to_string())),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|t| t == class))
            .unwrap_or(false)
    }

    /// Concatenated text of all descendants
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(el) => el.collect_text(out),
                Node::Raw(_) => {}
            }
        }
    }

    /// Replace all children with one text node
    pub fn set_text(&mut self, text: &str) {
        self.children = vec![Node::Text(text.to_string())];
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|c| match c {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Serialize this element and its subtree as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }

        if self.children.is_empty() && is_void(&self.name) {
            out.push_str(" />");
            return;
        }

        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(el) => el.write_html(out),
                Node::Text(t) => out.push_str(&escape(t)),
                Node::Raw(r) => out.push_str(r),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// Parse markup with exactly one root element.
///
/// Void elements need no closing tag (`<br>` is read as `<br />`) and HTML
/// named entities such as `&nbsp;` are resolved. Anything else that is not
/// well-formed (unclosed or mismatched tags, unknown entities, stray text or
/// a second element at the top level) is an error.
pub fn parse(markup: &str) -> Result<Element> {
    let mut reader = Reader::from_str(markup);
    reader.trim_text(false);
    // Void elements are never pushed, so end names are matched against our own stack
    reader.check_end_names(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let el = open_element(&start)?;
                if is_void(&el.name) {
                    attach(&mut stack, &mut root, Node::Element(el))?;
                } else {
                    stack.push(el);
                }
            }
            Event::Empty(start) => {
                let el = open_element(&start)?;
                attach(&mut stack, &mut root, Node::Element(el))?;
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                if is_void(&name) {
                    continue;
                }
                let el = stack.pop().ok_or_else(|| {
                    DeckError::MarkupError(format!("unexpected closing tag </{}>", name))
                })?;
                if el.name != name {
                    return Err(DeckError::MarkupError(format!(
                        "<{}> closed by </{}>",
                        el.name, name
                    )));
                }
                attach(&mut stack, &mut root, Node::Element(el))?;
            }
            Event::Text(text) => {
                let text = text.unescape()?.into_owned();
                attach_text(&mut stack, text)?;
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                attach_text(&mut stack, text)?;
            }
            Event::Comment(comment) => {
                if let Some(parent) = stack.last_mut() {
                    let raw = format!("<!--{}-->", String::from_utf8_lossy(&comment));
                    parent.children.push(Node::Raw(raw));
                }
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(DeckError::MarkupError(format!("unclosed <{}>", open.name)));
    }
    root.ok_or_else(|| DeckError::MarkupError("no root element".into()))
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

fn open_element(start: &BytesStart) -> Result<Element> {
    let mut el = Element::new(&String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        el.attrs.push((key, value));
    }
    Ok(el)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, node: Node) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    match (node, root.is_some()) {
        (Node::Element(el), false) => {
            *root = Some(el);
            Ok(())
        }
        _ => Err(DeckError::MarkupError("more than one root element".into())),
    }
}

fn attach_text(stack: &mut [Element], text: String) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Text(text));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(DeckError::MarkupError("text outside the root element".into())),
    }
}
