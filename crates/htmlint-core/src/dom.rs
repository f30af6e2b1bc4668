//! Document model handed to rules
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Nodes are appended in source order, so arena order is
//! document order.

use serde::{Deserialize, Serialize};

/// Index of a node inside its [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The document root; never an element
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Source position (1-based line and column, 0-based byte offset)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lower-cased attribute name
    pub name: String,
    /// Entity-decoded value; `None` for a bare attribute like `disabled`
    pub value: Option<String>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Lower-cased tag name
    pub tag_name: String,
    pub attributes: Vec<Attribute>,
    /// Written as `<tag/>`
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
    Doctype(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub location: Location,
}

impl Node {
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Elements and text that is not pure whitespace
    pub fn is_significant(&self) -> bool {
        match &self.kind {
            NodeKind::Element(_) => true,
            NodeKind::Text(text) => !is_blank(text),
            _ => false,
        }
    }
}

/// True when `text` holds nothing but ASCII whitespace
pub fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_whitespace())
}

/// A parsed HTML document
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    ready_order: Vec<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
                location: Location {
                    line: 1,
                    column: 1,
                    offset: 0,
                },
            }],
            ready_order: Vec::new(),
        }
    }

    pub(crate) fn append(&mut self, parent: NodeId, kind: NodeKind, location: Location) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            location,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub(crate) fn mark_ready(&mut self, id: NodeId) {
        self.ready_order.push(id);
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Every node id in document order, root first
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Elements in the order they were closed
    pub fn ready_order(&self) -> &[NodeId] {
        &self.ready_order
    }

    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.node(id).as_element().map(|_| ElementRef { doc: self, id })
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.node(id).as_element().map(|e| e.tag_name.as_str())
    }

    pub fn is_element_named(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id) == Some(tag)
    }

    /// Top-level elements, children of the document root
    pub fn root_elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.node(NodeId::ROOT)
            .children
            .iter()
            .filter_map(move |&c| self.element(c))
    }

    /// All elements in document order
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        (0..self.nodes.len()).filter_map(move |i| self.element(NodeId(i)))
    }

    pub fn elements_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.elements().filter(move |e| e.tag_name() == tag)
    }

    pub fn find_element(&self, tag: &str) -> Option<ElementRef<'_>> {
        self.elements().find(|e| e.tag_name() == tag)
    }

    pub fn html(&self) -> Option<ElementRef<'_>> {
        self.find_element("html")
    }

    pub fn head(&self) -> Option<ElementRef<'_>> {
        self.find_element("head")
    }

    /// Whole pages carry `<html>` or `<head>`; anything else is a fragment
    pub fn is_full_document(&self) -> bool {
        self.elements()
            .any(|e| matches!(e.tag_name(), "html" | "head"))
    }

    /// Significant children of `id`: elements and non-blank text
    pub fn significant_children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(|&c| self.node(c).is_significant())
            .collect()
    }

    /// Next significant sibling, skipping comments and whitespace
    pub fn next_significant_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id).parent?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&s| s == id)?;
        siblings[pos + 1..]
            .iter()
            .copied()
            .find(|&s| self.node(s).is_significant())
    }

    /// Previous significant sibling, skipping comments and whitespace
    pub fn previous_significant_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id).parent?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&s| s == id)?;
        siblings[..pos]
            .iter()
            .rev()
            .copied()
            .find(|&s| self.node(s).is_significant())
    }

    /// Ancestors of `id`, nearest first, excluding the document root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).parent, move |&p| self.node(p).parent)
            .filter(|&p| p != NodeId::ROOT)
    }

    /// Concatenated text of all descendants
    ///
    /// Walks with an explicit stack; nesting depth is bounded only by the
    /// input.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            let node = self.node(next);
            match &node.kind {
                NodeKind::Text(text) => out.push_str(text),
                NodeKind::Element(_) => stack.extend(node.children.iter().rev().copied()),
                _ => {}
            }
        }
        out
    }
}

/// Borrowed view of an element, as handed to rules
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    fn data(&self) -> &'a ElementData {
        match &self.doc.nodes[self.id.0].kind {
            NodeKind::Element(data) => data,
            _ => unreachable!("ElementRef always points at an element"),
        }
    }

    pub fn tag_name(&self) -> &'a str {
        &self.data().tag_name
    }

    pub fn location(&self) -> Location {
        self.doc.node(self.id).location
    }

    pub fn attributes(&self) -> &'a [Attribute] {
        &self.data().attributes
    }

    /// First attribute with the given (lower-case) name
    pub fn attribute(&self, name: &str) -> Option<&'a Attribute> {
        self.attributes().iter().find(|a| a.name == name)
    }

    /// Attribute value; bare attributes read as `""`
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attribute(name)
            .map(|a| a.value.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Parent element, `None` at top level
    pub fn parent(&self) -> Option<ElementRef<'a>> {
        self.doc
            .node(self.id)
            .parent
            .and_then(|p| self.doc.element(p))
    }

    pub fn children(&self) -> &'a [NodeId] {
        &self.doc.nodes[self.id.0].children
    }

    pub fn element_children(&self) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let doc = self.doc;
        self.children().iter().filter_map(move |&c| doc.element(c))
    }

    pub fn significant_children(&self) -> Vec<NodeId> {
        self.doc.significant_children(self.id)
    }

    /// Previous significant sibling node (element or non-blank text)
    pub fn previous_sibling(&self) -> Option<NodeId> {
        self.doc.previous_significant_sibling(self.id)
    }

    /// Next significant sibling node (element or non-blank text)
    pub fn next_sibling(&self) -> Option<NodeId> {
        self.doc.next_significant_sibling(self.id)
    }

    pub fn has_ancestor(&self, tag: &str) -> bool {
        self.doc
            .ancestors(self.id)
            .any(|a| self.doc.is_element_named(a, tag))
    }

    pub fn text_content(&self) -> String {
        self.doc.text_content(self.id)
    }
}
