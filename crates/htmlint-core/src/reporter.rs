//! Diagnostic reporting API handed to rules
//!
//! Rules never build [`Diagnostic`]s themselves: they point at a node (or an
//! attribute of one) and the reporter stamps on the file, rule id and
//! severity. Inline `<!-- [htmlint-disable-next ...] -->` directives are
//! honoured here so rules stay unaware of them.

use crate::diagnostics::{Diagnostic, DiagnosticLevel};
use crate::dom::{Attribute, Document, Location, NodeId, NodeKind};
use crate::regex_util::static_regex;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

static_regex!(
    fn disable_next_regex,
    r"^\s*\[htmlint-disable-next(?:\s+([^\]]*))?\]\s*$"
);

/// Which rules are silenced on a given element subtree
#[derive(Debug, Clone, PartialEq, Eq)]
enum Silenced {
    All,
    Rules(Vec<String>),
}

impl Silenced {
    fn covers(&self, rule: &str) -> bool {
        match self {
            Silenced::All => true,
            Silenced::Rules(rules) => rules.iter().any(|r| r == rule),
        }
    }
}

/// Inline suppression directives collected from a document's comments
#[derive(Debug, Clone, Default)]
pub struct Suppressions {
    by_element: HashMap<NodeId, Vec<Silenced>>,
}

impl Suppressions {
    pub fn from_document(doc: &Document) -> Self {
        let mut by_element: HashMap<NodeId, Vec<Silenced>> = HashMap::new();

        for id in doc.node_ids() {
            let NodeKind::Comment(text) = &doc.node(id).kind else {
                continue;
            };
            let Some(cap) = disable_next_regex().captures(text) else {
                continue;
            };
            let silenced = match cap.get(1).map(|m| m.as_str().trim()) {
                Some(list) if !list.is_empty() => Silenced::Rules(
                    list.split(|c: char| c == ',' || c.is_whitespace())
                        .filter(|r| !r.is_empty())
                        .map(str::to_string)
                        .collect(),
                ),
                _ => Silenced::All,
            };
            if let Some(target) = doc
                .next_significant_sibling(id)
                .filter(|&t| doc.element(t).is_some())
            {
                by_element.entry(target).or_default().push(silenced);
            }
        }

        Self { by_element }
    }

    pub fn is_empty(&self) -> bool {
        self.by_element.is_empty()
    }

    /// Whether `rule` is silenced on `node` or any of its ancestors
    pub fn is_suppressed(&self, doc: &Document, node: NodeId, rule: &str) -> bool {
        if self.by_element.is_empty() {
            return false;
        }
        std::iter::once(node)
            .chain(doc.ancestors(node))
            .filter_map(|n| self.by_element.get(&n))
            .flatten()
            .any(|s| s.covers(rule))
    }
}

/// Collects diagnostics for one file
pub struct Reporter<'a> {
    file: &'a Path,
    document: &'a Document,
    suppressions: &'a Suppressions,
    rule: &'static str,
    level: DiagnosticLevel,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Reporter<'a> {
    pub fn new(file: &'a Path, document: &'a Document, suppressions: &'a Suppressions) -> Self {
        Self {
            file,
            document,
            suppressions,
            rule: "",
            level: DiagnosticLevel::Warning,
            diagnostics: Vec::new(),
        }
    }

    /// Switch the rule that subsequent reports are attributed to
    pub fn set_rule(&mut self, rule: &'static str, level: DiagnosticLevel) {
        self.rule = rule;
        self.level = level;
    }

    pub fn rule(&self) -> &'static str {
        self.rule
    }

    /// Report a problem at the start of `node`
    pub fn report(&mut self, node: NodeId, message: String) {
        let location = self.document.node(node).location;
        self.push(node, location, message, None);
    }

    pub fn report_with_suggestion(&mut self, node: NodeId, message: String, suggestion: String) {
        let location = self.document.node(node).location;
        self.push(node, location, message, Some(suggestion));
    }

    /// Report a problem at an explicit location inside `node`
    pub fn report_at(&mut self, node: NodeId, location: Location, message: String) {
        self.push(node, location, message, None);
    }

    /// Report a problem located at one attribute of `node`
    pub fn report_attribute(
        &mut self,
        node: NodeId,
        attribute: &Attribute,
        message: String,
        suggestion: Option<String>,
    ) {
        self.push(node, attribute.location, message, suggestion);
    }

    fn push(&mut self, node: NodeId, location: Location, message: String, suggestion: Option<String>) {
        if self
            .suppressions
            .is_suppressed(self.document, node, self.rule)
        {
            return;
        }

        let mut diagnostic = Diagnostic::new(
            self.level,
            self.file.to_path_buf(),
            location.line,
            location.column,
            self.rule,
            message,
        );
        diagnostic.suggestion = suggestion;
        self.diagnostics.push(diagnostic);
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
