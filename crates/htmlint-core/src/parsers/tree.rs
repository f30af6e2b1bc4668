//! Tree builder
//!
//! Turns the token stream into a [`Document`] and records the order in which
//! elements become ready (closed with their subtree complete).

use crate::dom::{Attribute, Document, ElementData, Location, NodeId, NodeKind};
use crate::parsers::html::{tokenize, TokenKind};
use std::collections::HashMap;

/// Elements that never have content
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Start tags that implicitly close an open `<p>`
const CLOSES_PARAGRAPH: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "details",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "ul",
];

/// Elements a search for an open `li`, `dt` or `dd` does not cross
const LIST_SCOPE: &[&str] = &[
    "applet", "article", "aside", "blockquote", "body", "button", "caption", "details", "dl",
    "fieldset", "figure", "footer", "form", "header", "html", "main", "marquee", "menu", "nav",
    "object", "ol", "section", "table", "td", "template", "th", "ul",
];

/// Elements a search for an open `p` does not cross
const BUTTON_SCOPE: &[&str] = &[
    "applet", "button", "caption", "html", "marquee", "object", "table", "td", "template", "th",
];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Open elements an `incoming` start tag ends wherever they sit in the open
/// stack, together with the elements that bound the search
fn implicit_close_scope(incoming: &str) -> Option<(&'static [&'static str], &'static [&'static str])> {
    const LIST_ITEM: &[&str] = &["li"];
    const DEFINITION: &[&str] = &["dt", "dd"];
    const PARAGRAPH: &[&str] = &["p"];

    match incoming {
        "li" => Some((LIST_ITEM, LIST_SCOPE)),
        "dt" | "dd" => Some((DEFINITION, LIST_SCOPE)),
        _ if CLOSES_PARAGRAPH.contains(&incoming) => Some((PARAGRAPH, BUTTON_SCOPE)),
        _ => None,
    }
}

/// Whether the current `open` element ends when an `incoming` start tag appears
fn closes_implicitly(open: &str, incoming: &str) -> bool {
    match open {
        "tr" => matches!(incoming, "tr" | "thead" | "tbody" | "tfoot"),
        "td" | "th" => matches!(incoming, "td" | "th" | "tr" | "thead" | "tbody" | "tfoot"),
        "thead" | "tbody" | "tfoot" => matches!(incoming, "thead" | "tbody" | "tfoot"),
        "option" => matches!(incoming, "option" | "optgroup"),
        "optgroup" => incoming == "optgroup",
        "head" => incoming == "body",
        _ => false,
    }
}

/// Parse HTML source into a document
pub fn build_document(content: &str) -> Document {
    let mut builder = TreeBuilder::new();
    for token in tokenize(content) {
        builder.process(token.kind, token.location);
    }
    builder.finish()
}

struct TreeBuilder {
    doc: Document,
    open: Vec<NodeId>,
    /// Open elements per tag name, so lookups for tags that are not open
    /// return without scanning the stack
    open_counts: HashMap<String, usize>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            doc: Document::new(),
            open: vec![NodeId::ROOT],
            open_counts: HashMap::new(),
        }
    }

    fn is_open(&self, tag: &str) -> bool {
        self.open_counts.get(tag).is_some_and(|&n| n > 0)
    }

    /// Pop every open element above and including stack index `pos`
    fn close_to(&mut self, pos: usize) {
        while self.open.len() > pos.max(1) {
            self.pop();
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn process(&mut self, kind: TokenKind, location: Location) {
        let parent = self.current();
        match kind {
            TokenKind::Doctype(text) => {
                self.doc.append(parent, NodeKind::Doctype(text), location);
            }
            TokenKind::Comment(text) => {
                self.doc.append(parent, NodeKind::Comment(text), location);
            }
            TokenKind::Text(text) => {
                self.doc.append(parent, NodeKind::Text(text), location);
            }
            TokenKind::StartTag {
                name,
                attributes,
                self_closing,
            } => self.start_tag(name, attributes, self_closing, location),
            TokenKind::EndTag { name } => self.end_tag(&name),
        }
    }

    fn start_tag(
        &mut self,
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
        location: Location,
    ) {
        if let Some((targets, boundaries)) = implicit_close_scope(&name) {
            if targets.iter().any(|t| self.is_open(t)) {
                if let Some(pos) = self.find_in_scope(targets, boundaries) {
                    self.close_to(pos);
                }
            }
        }

        while self.open.len() > 1 {
            let top = self.current();
            let closes = self
                .doc
                .tag_name(top)
                .is_some_and(|open| closes_implicitly(open, &name));
            if !closes {
                break;
            }
            self.pop();
        }

        let void = is_void(&name);
        let parent = self.current();
        let id = self.doc.append(
            parent,
            NodeKind::Element(ElementData {
                tag_name: name,
                attributes,
                self_closing,
            }),
            location,
        );

        if void || self_closing {
            self.doc.mark_ready(id);
        } else {
            if let Some(tag) = self.doc.tag_name(id) {
                *self.open_counts.entry(tag.to_string()).or_default() += 1;
            }
            self.open.push(id);
        }
    }

    /// Stack index of the nearest open `targets` element, unless a
    /// `boundaries` element is open above it
    fn find_in_scope(&self, targets: &[&str], boundaries: &[&str]) -> Option<usize> {
        for (pos, &id) in self.open.iter().enumerate().skip(1).rev() {
            let tag = self.doc.tag_name(id)?;
            if targets.contains(&tag) {
                return Some(pos);
            }
            if boundaries.contains(&tag) {
                return None;
            }
        }
        None
    }

    fn end_tag(&mut self, name: &str) {
        // Closing the nearest match also closes everything opened after it;
        // stray end tags are dropped.
        if !self.is_open(name) {
            return;
        }
        let Some(pos) = self
            .open
            .iter()
            .rposition(|&id| self.doc.is_element_named(id, name))
        else {
            return;
        };
        self.close_to(pos);
    }

    fn pop(&mut self) {
        if self.open.len() > 1 {
            if let Some(id) = self.open.pop() {
                if let Some(count) = self
                    .doc
                    .tag_name(id)
                    .and_then(|tag| self.open_counts.get_mut(tag))
                {
                    *count = count.saturating_sub(1);
                }
                self.doc.mark_ready(id);
            }
        }
    }

    fn finish(mut self) -> Document {
        while self.open.len() > 1 {
            self.pop();
        }
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_tags(doc: &Document) -> Vec<&str> {
        doc.ready_order()
            .iter()
            .map(|&id| doc.tag_name(id).unwrap())
            .collect()
    }

    fn child_tags<'a>(doc: &'a Document, tag: &str) -> Vec<&'a str> {
        doc.find_element(tag)
            .unwrap()
            .element_children()
            .map(|e| e.tag_name())
            .collect()
    }

    #[test]
    fn test_ready_order_is_post_order() {
        let doc = build_document("<div><p><b>x</b></p><br></div>");
        assert_eq!(ready_tags(&doc), vec!["b", "p", "br", "div"]);
    }

    #[test]
    fn test_void_elements_have_no_children() {
        let doc = build_document("<p>a<br>b<img src=x>c</p>");
        assert_eq!(child_tags(&doc, "p"), vec!["br", "img"]);
        assert!(doc.find_element("br").unwrap().children().is_empty());
        assert_eq!(doc.find_element("p").unwrap().children().len(), 5);
    }

    #[test]
    fn test_end_tag_closes_intermediate_elements() {
        let doc = build_document("<div><span><em>x</div><p>after</p>");
        assert_eq!(ready_tags(&doc), vec!["em", "span", "div", "p"]);
        let p = doc.find_element("p").unwrap();
        assert!(p.parent().is_none());
    }

    #[test]
    fn test_stray_end_tag_is_ignored() {
        let doc = build_document("<div>a</span>b</div>");
        assert_eq!(ready_tags(&doc), vec!["div"]);
        assert_eq!(doc.find_element("div").unwrap().text_content(), "ab");
    }

    #[test]
    fn test_unclosed_elements_close_at_end() {
        let doc = build_document("<html><body><p>text");
        assert_eq!(ready_tags(&doc), vec!["p", "body", "html"]);
    }

    #[test]
    fn test_list_items_close_implicitly() {
        let doc = build_document("<ul><li>one<li>two<li>three</ul>");
        assert_eq!(child_tags(&doc, "ul"), vec!["li", "li", "li"]);
    }

    #[test]
    fn test_nested_list_items_stay_nested() {
        let doc = build_document("<ul><li>a<ul><li>b</ul></ul>");
        let outer = doc.find_element("ul").unwrap();
        assert_eq!(outer.element_children().count(), 1);
    }

    #[test]
    fn test_list_item_closes_through_inline_elements() {
        let doc = build_document("<ul><li><b>one<li>two</ul>");
        assert_eq!(child_tags(&doc, "ul"), vec!["li", "li"]);
        assert_eq!(ready_tags(&doc), vec!["b", "li", "li", "ul"]);
    }

    #[test]
    fn test_list_item_search_stops_at_nested_list() {
        let doc = build_document("<ul><li>a<ol><li><em>b<li>c</ol></ul>");
        assert_eq!(doc.find_element("ul").unwrap().element_children().count(), 1);
        assert_eq!(child_tags(&doc, "ol"), vec!["li", "li"]);
    }

    #[test]
    fn test_definition_terms_close_each_other() {
        let doc = build_document("<dl><dt><i>term<dd>def<dt>next</dl>");
        assert_eq!(child_tags(&doc, "dl"), vec!["dt", "dd", "dt"]);
    }

    #[test]
    fn test_paragraph_closed_by_block_through_inline_elements() {
        let doc = build_document("<body><p>text <b>bold<div>block</div></body>");
        assert_eq!(child_tags(&doc, "body"), vec!["p", "div"]);
        let div = doc.find_element("div").unwrap();
        assert_eq!(div.parent().unwrap().tag_name(), "body");
    }

    #[test]
    fn test_paragraph_inside_button_scope_stays_open() {
        let doc = build_document("<p><button>x<div>y</div></button></p>");
        assert_eq!(child_tags(&doc, "button"), vec!["div"]);
        assert_eq!(child_tags(&doc, "p"), vec!["button"]);
    }

    #[test]
    fn test_stray_end_tags_under_deep_nesting() {
        let depth = 5_000;
        let mut html = "<span>".repeat(depth);
        html.push_str(&"</div>".repeat(depth));
        html.push_str(&"</span>".repeat(depth));
        let doc = build_document(&html);
        assert_eq!(doc.ready_order().len(), depth);
        assert_eq!(doc.root_elements().count(), 1);
    }

    #[test]
    fn test_paragraph_closed_by_block() {
        let doc = build_document("<body><p>one<div>two</div></body>");
        assert_eq!(child_tags(&doc, "body"), vec!["p", "div"]);
    }

    #[test]
    fn test_table_cells_close_implicitly() {
        let doc = build_document("<table><tr><td>a<td>b<tr><td>c</table>");
        let rows: Vec<_> = doc.elements_by_tag("tr").collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].element_children().count(), 2);
        assert_eq!(rows[1].element_children().count(), 1);
    }

    #[test]
    fn test_self_closing_non_void_is_ready_immediately() {
        let doc = build_document("<div/><p>x</p>");
        assert_eq!(ready_tags(&doc), vec!["div", "p"]);
        assert!(doc.find_element("p").unwrap().parent().is_none());
    }

    #[test]
    fn test_locations_recorded() {
        let doc = build_document("<html>\n<head>\n  <meta name=description>\n</head>");
        let meta = doc.find_element("meta").unwrap();
        assert_eq!(meta.location().line, 3);
        assert_eq!(meta.location().column, 3);
    }

    #[test]
    fn test_arbitrary_input_never_panics() {
        let inputs = [
            "",
            "<",
            "</",
            "<!",
            "<!--",
            "<<<>>>",
            "</p></p></p>",
            "<p <p <p>",
            "<a href='unterminated>",
            "<script>",
            "<title>é</title",
            "\u{feff}<!DOCTYPE html>",
        ];
        for input in inputs {
            let _ = build_document(input);
        }
    }
}
