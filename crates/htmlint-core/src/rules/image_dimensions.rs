//! Image width/height attributes (img-dimensions)

use crate::{
    dom::ElementRef,
    engine::{LifecycleEvent, Rule},
    reporter::Reporter,
};

pub struct ImageDimensionsRule;

const DIMENSIONS: [&str; 2] = ["width", "height"];

/// Non-negative integer made only of ASCII digits
fn is_valid_dimension(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

impl Rule for ImageDimensionsRule {
    fn id(&self) -> &'static str {
        "img-dimensions"
    }

    fn events(&self) -> &'static [LifecycleEvent] {
        &[LifecycleEvent::ElementReady]
    }

    fn on_element_ready(&self, element: ElementRef<'_>, reporter: &mut Reporter<'_>) {
        if element.tag_name() != "img" {
            return;
        }

        let missing: Vec<_> = DIMENSIONS
            .iter()
            .copied()
            .filter(|name| !element.has_attr(name))
            .collect();
        if !missing.is_empty() {
            reporter.report_with_suggestion(
                element.id(),
                format!("<img> is missing {}", missing.join(" and ")),
                "Set width and height so the browser can reserve space and avoid layout shift"
                    .to_string(),
            );
        }

        for name in DIMENSIONS {
            let Some(attribute) = element.attribute(name) else {
                continue;
            };
            let value = attribute.value.as_deref().unwrap_or("");
            if !is_valid_dimension(value) {
                reporter.report_attribute(
                    element.id(),
                    attribute,
                    format!("<img> {} '{}' is not a valid pixel count", name, value),
                    Some(format!("Use a plain integer such as {}=\"640\"", name)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::run_rule;

    fn messages(html: &str) -> Vec<String> {
        run_rule(ImageDimensionsRule, html)
            .into_iter()
            .map(|d| d.message)
            .collect()
    }

    #[test]
    fn test_dimensions_present() {
        assert!(messages(r#"<img src="a.png" width="640" height="480">"#).is_empty());
        assert!(messages("<img src=a.png width=0 height=' 12 '>").is_empty());
    }

    #[test]
    fn test_missing_both() {
        assert_eq!(
            messages(r#"<img src="a.png" alt="A">"#),
            vec!["<img> is missing width and height"]
        );
    }

    #[test]
    fn test_missing_one() {
        assert_eq!(
            messages(r#"<img src="a.png" width="10">"#),
            vec!["<img> is missing height"]
        );
        assert_eq!(
            messages(r#"<img src="a.png" height="10">"#),
            vec!["<img> is missing width"]
        );
    }

    #[test]
    fn test_invalid_values_reported_per_attribute() {
        let diagnostics = run_rule(
            ImageDimensionsRule,
            r#"<img src="a.png" width="100px" height="50%">"#,
        );
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].column, 18);
        assert!(diagnostics[0].message.contains("width '100px'"));
        assert!(diagnostics[1].message.contains("height '50%'"));
    }

    #[test]
    fn test_empty_and_bare_values_are_invalid() {
        assert_eq!(messages(r#"<img src=a.png width="" height>"#).len(), 2);
        assert_eq!(messages(r#"<img src=a.png width="-5" height="1.5">"#).len(), 2);
    }

    #[test]
    fn test_other_elements_ignored() {
        assert!(messages("<picture><source srcset=a.webp></picture><video src=a.mp4></video>").is_empty());
    }

    #[test]
    fn test_is_valid_dimension() {
        assert!(is_valid_dimension("42"));
        assert!(is_valid_dimension(" 7\n"));
        assert!(!is_valid_dimension(""));
        assert!(!is_valid_dimension("4 2"));
        assert!(!is_valid_dimension("٣"));
    }
}
