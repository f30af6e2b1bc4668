//! Canonical link checks (require-canonical)

use crate::{
    dom::{is_blank, Document, ElementRef},
    engine::{LifecycleEvent, Rule},
    regex_util::static_regex,
    reporter::Reporter,
};
use regex::Regex;

static_regex!(fn absolute_url_regex, r"(?i)^https?://[^\s/$.?#][^\s]*$");

pub struct CanonicalRule;

/// `<link>` elements whose `rel` list contains `canonical`
fn is_canonical_link(element: &ElementRef<'_>) -> bool {
    element.tag_name() == "link"
        && element.attr("rel").is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("canonical"))
        })
}

impl Rule for CanonicalRule {
    fn id(&self) -> &'static str {
        "require-canonical"
    }

    fn events(&self) -> &'static [LifecycleEvent] {
        &[LifecycleEvent::DomReady]
    }

    fn on_dom_ready(&self, document: &Document, reporter: &mut Reporter<'_>) {
        if !document.is_full_document() {
            return;
        }

        let links: Vec<_> = document
            .elements()
            .filter(is_canonical_link)
            .collect();

        let Some(first) = links.first() else {
            if let Some(anchor) = document.head().or_else(|| document.html()) {
                reporter.report_with_suggestion(
                    anchor.id(),
                    "Document has no canonical link".to_string(),
                    "Add <link rel=\"canonical\" href=\"https://...\"> to <head>".to_string(),
                );
            }
            return;
        };

        for link in &links {
            if !link.has_ancestor("head") {
                reporter.report(
                    link.id(),
                    "Canonical link must be placed inside <head>".to_string(),
                );
            }
        }

        for extra in &links[1..] {
            reporter.report_with_suggestion(
                extra.id(),
                format!(
                    "Duplicate canonical link; the first one is on line {}",
                    first.location().line
                ),
                "Keep a single canonical link per document".to_string(),
            );
        }

        for link in &links {
            match link.attribute("href") {
                Some(href) => {
                    let raw = href.value.as_deref().unwrap_or("");
                    let value = raw.trim();
                    if is_blank(raw) {
                        reporter.report_attribute(
                            link.id(),
                            href,
                            "Canonical link has an empty href".to_string(),
                            None,
                        );
                    } else if !absolute_url_regex().is_match(value) {
                        reporter.report_attribute(
                            link.id(),
                            href,
                            format!("Canonical href '{}' is not an absolute http(s) URL", value),
                            Some("Use the full URL, e.g. https://example.com/page".to_string()),
                        );
                    }
                }
                None => reporter.report(link.id(), "Canonical link has no href".to_string()),
            }
        }
    }
}
