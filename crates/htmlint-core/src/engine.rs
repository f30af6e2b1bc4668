//! Lifecycle event dispatch
//!
//! The engine replays a parsed document as the two host events rules
//! subscribe to: `element:ready` once per element in the order elements were
//! closed, then `dom:ready` once for the whole tree.

use crate::{
    config::LintConfig,
    diagnostics::{Diagnostic, DiagnosticLevel},
    dom::{Document, ElementRef},
    reporter::{Reporter, Suppressions},
    rules,
};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// An element and its subtree are complete
    ElementReady,
    /// The whole document tree is built
    DomReady,
}

impl LifecycleEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleEvent::ElementReady => "element:ready",
            LifecycleEvent::DomReady => "dom:ready",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "element:ready" => Some(LifecycleEvent::ElementReady),
            "dom:ready" => Some(LifecycleEvent::DomReady),
            _ => None,
        }
    }
}

/// A lint rule registered with the engine
///
/// Rules are stateless: the same instance is shared across files and
/// threads, and every callback only sees the tree it is given.
pub trait Rule: Send + Sync {
    fn id(&self) -> &'static str;

    /// Events this rule wants to receive
    fn events(&self) -> &'static [LifecycleEvent];

    fn on_element_ready(&self, _element: ElementRef<'_>, _reporter: &mut Reporter<'_>) {}

    fn on_dom_ready(&self, _document: &Document, _reporter: &mut Reporter<'_>) {}
}

/// Default severity for a rule, from the catalogue
pub fn rule_level(rule_id: &str) -> DiagnosticLevel {
    htmlint_rules::get_rule(rule_id)
        .and_then(|meta| DiagnosticLevel::from_catalog(meta.severity))
        .unwrap_or(DiagnosticLevel::Warning)
}

struct Registered {
    rule: Box<dyn Rule>,
    level: DiagnosticLevel,
    element_ready: bool,
    dom_ready: bool,
}

/// Rule registry plus event dispatch
pub struct Engine {
    rules: Vec<Registered>,
}

impl Engine {
    /// Register every rule the config enables
    pub fn new(config: &LintConfig) -> Self {
        let enabled = rules::all_rules(config)
            .into_iter()
            .filter(|rule| config.is_rule_enabled(rule.id()))
            .collect();
        Self::with_rules(enabled)
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| {
                let events = rule.events();
                tracing::trace!(rule = rule.id(), ?events, "registering rule");
                Registered {
                    level: rule_level(rule.id()),
                    element_ready: events.contains(&LifecycleEvent::ElementReady),
                    dom_ready: events.contains(&LifecycleEvent::DomReady),
                    rule,
                }
            })
            .collect();
        Self { rules }
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.rule.id()).collect()
    }

    /// Fire all lifecycle events for `document` and collect the reports
    pub fn run(&self, path: &Path, document: &Document) -> Vec<Diagnostic> {
        let suppressions = Suppressions::from_document(document);
        let mut reporter = Reporter::new(path, document, &suppressions);

        for &id in document.ready_order() {
            let Some(element) = document.element(id) else {
                continue;
            };
            for registered in self.rules.iter().filter(|r| r.element_ready) {
                reporter.set_rule(registered.rule.id(), registered.level);
                registered.rule.on_element_ready(element, &mut reporter);
            }
        }

        for registered in self.rules.iter().filter(|r| r.dom_ready) {
            reporter.set_rule(registered.rule.id(), registered.level);
            registered.rule.on_dom_ready(document, &mut reporter);
        }

        reporter.into_diagnostics()
    }
}
