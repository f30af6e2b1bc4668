//! Build script for htmlint-rules.
//!
//! Generates Rust code from rules.json at compile time.
//!
//! Generated constants:
//! - `CATALOG_VERSION`: Version string of the rule catalogue
//! - `RULES`: One `RuleMeta` per rule
//! - `RULES_DATA`: All rule (id, name) tuples
//! - `EVENT_HANDLER_ATTRIBUTES`: Sorted event-handler attribute names

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;

/// Maximum allowed file size for rules.json (1 MB)
const MAX_RULES_FILE_SIZE: u64 = 1024 * 1024;

const VALID_SEVERITIES: &[&str] = &["error", "warning", "info"];
const VALID_EVENTS: &[&str] = &["element:ready", "dom:ready"];

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let rules_path = Path::new(&manifest_dir).join("rules.json");

    println!("cargo:rerun-if-changed={}", rules_path.display());

    let file_size = fs::metadata(&rules_path)
        .unwrap_or_else(|e| panic!("Failed to get metadata for {}: {}", rules_path.display(), e))
        .len();
    if file_size > MAX_RULES_FILE_SIZE {
        panic!(
            "rules.json at {} is too large ({} bytes, max {} bytes)",
            rules_path.display(),
            file_size,
            MAX_RULES_FILE_SIZE
        );
    }

    let rules_json = fs::read_to_string(&rules_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read rules.json at {}: {}",
            rules_path.display(),
            e
        )
    });

    let catalog: serde_json::Value = serde_json::from_str(&rules_json).unwrap_or_else(|e| {
        panic!(
            "Failed to parse rules.json at {}: {}",
            rules_path.display(),
            e
        )
    });

    let escape_str = |s: &str| {
        s.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    };

    // Rule ids are kebab-case, e.g. no-stacked-br
    let is_valid_id = |id: &str| -> bool {
        !id.is_empty()
            && id.len() <= 40
            && !id.starts_with('-')
            && !id.ends_with('-')
            && id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    };

    let is_valid_name = |name: &str| -> bool {
        !name.is_empty() && name.len() <= 200 && !name.chars().any(|c| c.is_control())
    };

    let version = catalog["version"].as_str().unwrap_or("0.0.0");

    let rules_array = catalog["rules"]
        .as_array()
        .expect("rules.json must have a 'rules' array");

    let mut generated_code = String::new();
    generated_code.push_str("// Auto-generated from rules.json by build.rs\n");
    generated_code.push_str("// Do not edit manually!\n\n");

    generated_code.push_str("/// Version of the rule catalogue in rules.json.\n");
    generated_code.push_str(&format!(
        "pub const CATALOG_VERSION: &str = \"{}\";\n\n",
        escape_str(version)
    ));

    let mut seen_ids: BTreeSet<&str> = BTreeSet::new();
    let mut rules_code = String::new();
    let mut data_code = String::new();

    for (idx, rule) in rules_array.iter().enumerate() {
        let id = str_field(rule, idx, "id");
        let name = str_field(rule, idx, "name");
        let category = str_field(rule, idx, "category");
        let severity = str_field(rule, idx, "severity");
        let events = events_field(rule, idx);

        if !is_valid_id(id) {
            panic!(
                "rule[{}] has invalid id '{}': must be 1-40 lowercase kebab-case characters",
                idx, id
            );
        }
        if !seen_ids.insert(id) {
            panic!("rule[{}] duplicates id '{}'", idx, id);
        }
        if !is_valid_name(name) {
            panic!(
                "rule[{}] '{}' has invalid name: must be 1-200 chars, no control characters",
                idx, id
            );
        }
        if !VALID_SEVERITIES.contains(&severity) {
            panic!("rule[{}] '{}' has unknown severity '{}'", idx, id, severity);
        }
        if events.is_empty() {
            panic!("rule[{}] '{}' must subscribe to at least one event", idx, id);
        }
        for event in &events {
            if !VALID_EVENTS.contains(event) {
                panic!("rule[{}] '{}' has unknown event '{}'", idx, id, event);
            }
        }
        let events_code = events
            .iter()
            .map(|e| format!("\"{}\"", e))
            .collect::<Vec<_>>()
            .join(", ");

        rules_code.push_str(&format!(
            "    RuleMeta {{ id: \"{}\", name: \"{}\", category: \"{}\", severity: \"{}\", events: &[{}] }},\n",
            escape_str(id),
            escape_str(name),
            escape_str(category),
            severity,
            events_code
        ));
        data_code.push_str(&format!(
            "    (\"{}\", \"{}\"),\n",
            escape_str(id),
            escape_str(name)
        ));
    }

    generated_code.push_str("/// Full metadata for every rule in rules.json.\n");
    generated_code.push_str("pub const RULES: &[RuleMeta] = &[\n");
    generated_code.push_str(&rules_code);
    generated_code.push_str("];\n\n");

    generated_code.push_str("/// Rule data as (id, name) tuples.\n");
    generated_code.push_str("pub const RULES_DATA: &[(&str, &str)] = &[\n");
    generated_code.push_str(&data_code);
    generated_code.push_str("];\n\n");

    // =========================================================================
    // Event-handler attribute table
    // =========================================================================
    let handlers = catalog["event_handlers"]["attributes"]
        .as_array()
        .expect("rules.json must have an 'event_handlers.attributes' array");

    let mut names: BTreeSet<String> = BTreeSet::new();
    for (idx, value) in handlers.iter().enumerate() {
        let name = value
            .as_str()
            .unwrap_or_else(|| panic!("event_handlers.attributes[{}] must be a string", idx));
        let valid = name.len() > 2
            && name.starts_with("on")
            && name.chars().all(|c| c.is_ascii_lowercase());
        if !valid {
            panic!(
                "event_handlers.attributes[{}] '{}' is invalid: expected lowercase 'on*' name",
                idx, name
            );
        }
        names.insert(name.to_string());
    }

    generated_code.push_str("/// Recognised HTML event-handler attribute names, sorted.\n");
    generated_code.push_str("pub const EVENT_HANDLER_ATTRIBUTES: &[&str] = &[\n");
    for name in &names {
        generated_code.push_str(&format!("    \"{}\",\n", name));
    }
    generated_code.push_str("];\n");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("rules_data.rs");
    fs::write(&dest_path, generated_code).expect("Failed to write generated rules");
}

fn str_field<'a>(rule: &'a serde_json::Value, idx: usize, key: &str) -> &'a str {
    rule[key]
        .as_str()
        .unwrap_or_else(|| panic!("rule[{}] must have string '{}' field", idx, key))
}

fn events_field<'a>(rule: &'a serde_json::Value, idx: usize) -> Vec<&'a str> {
    rule["events"]
        .as_array()
        .unwrap_or_else(|| panic!("rule[{}] must have an 'events' array", idx))
        .iter()
        .enumerate()
        .map(|(i, e)| {
            e.as_str()
                .unwrap_or_else(|| panic!("rule[{}].events[{}] must be a string", idx, i))
        })
        .collect()
}
