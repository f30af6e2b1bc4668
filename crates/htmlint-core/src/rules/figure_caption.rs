//! Figure caption checks (figure-caption)

use crate::{
    dom::{is_blank, ElementRef},
    engine::{LifecycleEvent, Rule},
    reporter::Reporter,
};

pub struct FigureCaptionRule;

impl Rule for FigureCaptionRule {
    fn id(&self) -> &'static str {
        "figure-caption"
    }

    fn events(&self) -> &'static [LifecycleEvent] {
        &[LifecycleEvent::ElementReady]
    }

    fn on_element_ready(&self, element: ElementRef<'_>, reporter: &mut Reporter<'_>) {
        if element.tag_name() != "figure" {
            return;
        }

        let children: Vec<_> = element.element_children().collect();
        let captions: Vec<_> = children
            .iter()
            .enumerate()
            .filter(|(_, child)| child.tag_name() == "figcaption")
            .collect();

        if captions.is_empty() {
            reporter.report_with_suggestion(
                element.id(),
                "<figure> has no <figcaption>".to_string(),
                "Describe the figure with a <figcaption> as its first or last child".to_string(),
            );
            return;
        }

        let last = children.len() - 1;
        for (nth, &(index, caption)) in captions.iter().enumerate() {
            if nth > 0 {
                reporter.report(
                    caption.id(),
                    "<figure> has more than one <figcaption>".to_string(),
                );
            }
            if index != 0 && index != last {
                reporter.report(
                    caption.id(),
                    "<figcaption> must be the first or last child of <figure>".to_string(),
                );
            }
            if is_blank(&caption.text_content()) {
                reporter.report(caption.id(), "<figcaption> is empty".to_string());
            }
        }
    }
}
