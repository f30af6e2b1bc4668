//! Inline event-handler attributes (no-inline-event-handlers)

use crate::{
    config::EventHandlerOptions,
    dom::ElementRef,
    engine::{LifecycleEvent, Rule},
    reporter::Reporter,
};
use htmlint_rules::is_event_handler_attribute;

pub struct InlineEventHandlerRule {
    options: EventHandlerOptions,
}

impl InlineEventHandlerRule {
    pub fn new(options: EventHandlerOptions) -> Self {
        Self { options }
    }
}

impl Rule for InlineEventHandlerRule {
    fn id(&self) -> &'static str {
        "no-inline-event-handlers"
    }

    fn events(&self) -> &'static [LifecycleEvent] {
        &[LifecycleEvent::ElementReady]
    }

    fn on_element_ready(&self, element: ElementRef<'_>, reporter: &mut Reporter<'_>) {
        for attribute in element.attributes() {
            if !is_event_handler_attribute(&attribute.name) || self.options.is_allowed(&attribute.name)
            {
                continue;
            }
            let event = attribute.name.strip_prefix("on").unwrap_or(&attribute.name);
            reporter.report_attribute(
                element.id(),
                attribute,
                format!(
                    "Inline event handler '{}' on <{}>",
                    attribute.name,
                    element.tag_name()
                ),
                Some(format!(
                    "Attach the handler from script with addEventListener('{}', ...)",
                    event
                )),
            );
        }
    }
}
