//! Meta description presence and length (meta-description)

use crate::{
    config::MetaDescriptionOptions,
    dom::{is_blank, Document, ElementRef},
    engine::{LifecycleEvent, Rule},
    reporter::Reporter,
};

pub struct MetaDescriptionRule {
    options: MetaDescriptionOptions,
}

impl MetaDescriptionRule {
    pub fn new(options: MetaDescriptionOptions) -> Self {
        Self { options }
    }

    fn check_content(&self, meta: ElementRef<'_>, reporter: &mut Reporter<'_>) {
        let Some(content) = meta.attribute("content") else {
            reporter.report(
                meta.id(),
                "Meta description has no content attribute".to_string(),
            );
            return;
        };

        let raw = content.value.as_deref().unwrap_or("");
        if is_blank(raw) {
            reporter.report_attribute(
                meta.id(),
                content,
                "Meta description is empty".to_string(),
                None,
            );
            return;
        }

        let length = raw.trim().chars().count();
        let MetaDescriptionOptions {
            min_length,
            max_length,
        } = self.options;
        if length < min_length {
            reporter.report_attribute(
                meta.id(),
                content,
                format!(
                    "Meta description is too short ({} characters, minimum {})",
                    length, min_length
                ),
                Some("Summarise the page in a full sentence or two".to_string()),
            );
        } else if length > max_length {
            reporter.report_attribute(
                meta.id(),
                content,
                format!(
                    "Meta description is too long ({} characters, maximum {})",
                    length, max_length
                ),
                Some("Search engines truncate long descriptions; shorten it".to_string()),
            );
        }
    }
}

fn is_description(meta: &ElementRef<'_>) -> bool {
    meta.attr("name")
        .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
}

impl Rule for MetaDescriptionRule {
    fn id(&self) -> &'static str {
        "meta-description"
    }

    fn events(&self) -> &'static [LifecycleEvent] {
        &[LifecycleEvent::DomReady]
    }

    fn on_dom_ready(&self, document: &Document, reporter: &mut Reporter<'_>) {
        if !document.is_full_document() {
            return;
        }

        let descriptions: Vec<_> = document
            .elements_by_tag("meta")
            .filter(is_description)
            .collect();

        let Some(&first) = descriptions.first() else {
            if let Some(anchor) = document.head().or_else(|| document.html()) {
                reporter.report_with_suggestion(
                    anchor.id(),
                    "Document has no meta description".to_string(),
                    "Add <meta name=\"description\" content=\"...\"> to <head>".to_string(),
                );
            }
            return;
        };

        for extra in &descriptions[1..] {
            reporter.report(
                extra.id(),
                format!(
                    "Duplicate meta description; the first one is on line {}",
                    first.location().line
                ),
            );
        }

        self.check_content(first, reporter);
    }
}
