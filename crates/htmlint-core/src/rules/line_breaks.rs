//! Stacked and misplaced `<br>` elements (no-stacked-br)

use crate::{
    dom::{Document, ElementRef, NodeId},
    engine::{LifecycleEvent, Rule},
    reporter::Reporter,
};

/// Parents whose content model has no room for phrasing content
const NON_PHRASING_PARENTS: &[&str] = &[
    "html", "head", "ul", "ol", "dl", "table", "thead", "tbody", "tfoot", "tr", "select",
    "optgroup", "colgroup", "datalist", "menu",
];

pub struct StackedBrRule;

impl Rule for StackedBrRule {
    fn id(&self) -> &'static str {
        "no-stacked-br"
    }

    fn events(&self) -> &'static [LifecycleEvent] {
        &[LifecycleEvent::ElementReady, LifecycleEvent::DomReady]
    }

    fn on_element_ready(&self, element: ElementRef<'_>, reporter: &mut Reporter<'_>) {
        let parent = element.tag_name();
        check_children(
            element.document(),
            element.id(),
            Some(parent),
            parent != "body",
            reporter,
        );
    }

    /// Top-level children belong to the document root, which never becomes
    /// ready as an element
    fn on_dom_ready(&self, document: &Document, reporter: &mut Reporter<'_>) {
        check_children(document, NodeId::ROOT, None, false, reporter);
    }
}

/// Check the `<br>` children of `parent`; `tag` is `None` for the root
fn check_children(
    doc: &Document,
    parent: NodeId,
    tag: Option<&str>,
    check_edges: bool,
    reporter: &mut Reporter<'_>,
) {
    let children = doc.significant_children(parent);
    let is_br = |id: NodeId| doc.is_element_named(id, "br");

    if !children.iter().any(|&c| is_br(c)) {
        return;
    }

    let misplaced_context = tag.filter(|t| NON_PHRASING_PARENTS.contains(t));
    let last = children.len() - 1;

    for (index, &child) in children.iter().enumerate() {
        if !is_br(child) {
            continue;
        }

        if index > 0 && is_br(children[index - 1]) {
            reporter.report_with_suggestion(
                child,
                "Avoid stacking <br> elements; use CSS margins or separate blocks instead"
                    .to_string(),
                "Replace consecutive <br> elements with paragraphs or CSS spacing".to_string(),
            );
            continue;
        }

        if let Some(context) = misplaced_context {
            reporter.report(
                child,
                format!("<br> is not allowed directly inside <{}>", context),
            );
            continue;
        }

        let Some(tag) = tag.filter(|_| check_edges) else {
            continue;
        };
        let position = if index == 0 {
            "start"
        } else if index == last {
            "end"
        } else {
            continue;
        };
        reporter.report_with_suggestion(
            child,
            format!("<br> at the {} of <{}> has no effect on layout", position, tag),
            "Remove the <br> or use padding/margin on the parent".to_string(),
        );
    }
}
