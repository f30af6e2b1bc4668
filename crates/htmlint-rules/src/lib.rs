//! Rule catalogue for htmlint - HTML linter.
//!
//! This crate provides the rule definitions used by htmlint together with the
//! table of recognised HTML event-handler attribute names. Both are generated
//! at build time from `rules.json`, which is the single source of truth.
//!
//! # Usage
//!
//! ```
//! use htmlint_rules::{EVENT_HANDLER_ATTRIBUTES, RULES, RULES_DATA};
//!
//! // RULES_DATA is a static array of (rule_id, rule_name) tuples
//! for (id, name) in RULES_DATA {
//!     println!("{}: {}", id, name);
//! }
//!
//! // RULES carries the full metadata
//! for rule in RULES {
//!     println!("{} fires on {}", rule.id, rule.events.join(", "));
//! }
//!
//! assert!(EVENT_HANDLER_ATTRIBUTES.contains(&"onclick"));
//! ```
//!
//! # Rule Categories
//!
//! - **line_breaks**: `no-stacked-br`
//! - **event_handlers**: `no-inline-event-handlers`
//! - **canonical**: `require-canonical`
//! - **meta_description**: `meta-description`
//! - **figure_caption**: `figure-caption`
//! - **image_dimensions**: `img-dimensions`

/// Static metadata for a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMeta {
    /// Rule identifier (e.g., `img-dimensions`).
    pub id: &'static str,
    /// Short human readable name.
    pub name: &'static str,
    /// Config category that toggles the rule.
    pub category: &'static str,
    /// Default severity: `error`, `warning` or `info`.
    pub severity: &'static str,
    /// Lifecycle events the rule subscribes to, in dispatch order.
    pub events: &'static [&'static str],
}

// Include the auto-generated rules data from build.rs
include!(concat!(env!("OUT_DIR"), "/rules_data.rs"));

/// Returns the total number of rules.
pub fn rule_count() -> usize {
    RULES.len()
}

/// Looks up a rule by ID, returning the name if found.
pub fn get_rule_name(id: &str) -> Option<&'static str> {
    RULES_DATA
        .iter()
        .find(|(rule_id, _)| *rule_id == id)
        .map(|(_, name)| *name)
}

/// Looks up the full metadata for a rule.
pub fn get_rule(id: &str) -> Option<&'static RuleMeta> {
    RULES.iter().find(|rule| rule.id == id)
}

/// Returns true if `name` is a recognised event-handler attribute.
///
/// The comparison is ASCII case-insensitive because HTML attribute names are.
pub fn is_event_handler_attribute(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    EVENT_HANDLER_ATTRIBUTES
        .binary_search(&lowered.as_str())
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_count() {
        assert_eq!(rule_count(), 6);
        assert_eq!(RULES_DATA.len(), RULES.len());
    }

    #[test]
    fn test_get_rule_name_exists() {
        assert_eq!(
            get_rule_name("img-dimensions"),
            Some("Image without width and height attributes")
        );
    }

    #[test]
    fn test_get_rule_name_not_exists() {
        assert_eq!(get_rule_name("NONEXISTENT-999"), None);
    }

    #[test]
    fn test_no_duplicate_ids() {
        let ids: HashSet<_> = RULES.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), RULES.len());
    }

    #[test]
    fn test_every_rule_has_known_event() {
        for rule in RULES {
            assert!(!rule.events.is_empty(), "{} has no events", rule.id);
            for event in rule.events {
                assert!(
                    *event == "element:ready" || *event == "dom:ready",
                    "{} has unexpected event {}",
                    rule.id,
                    event
                );
            }
        }
    }

    #[test]
    fn test_dom_ready_rules() {
        let dom_rules: Vec<_> = RULES
            .iter()
            .filter(|r| r.events.contains(&"dom:ready"))
            .map(|r| r.id)
            .collect();
        assert_eq!(
            dom_rules,
            vec!["no-stacked-br", "require-canonical", "meta-description"]
        );
    }

    #[test]
    fn test_event_handler_table_sorted() {
        let mut sorted = EVENT_HANDLER_ATTRIBUTES.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, EVENT_HANDLER_ATTRIBUTES);
    }

    #[test]
    fn test_is_event_handler_attribute() {
        assert!(is_event_handler_attribute("onclick"));
        assert!(is_event_handler_attribute("ONLOAD"));
        assert!(is_event_handler_attribute("onPointerDown"));
        assert!(!is_event_handler_attribute("on"));
        assert!(!is_event_handler_attribute("one"));
        assert!(!is_event_handler_attribute("data-onclick"));
        assert!(!is_event_handler_attribute("class"));
    }

    #[test]
    fn test_get_rule_metadata() {
        let rule = get_rule("no-inline-event-handlers").unwrap();
        assert_eq!(rule.severity, "error");
        assert_eq!(rule.category, "event_handlers");
    }
}
