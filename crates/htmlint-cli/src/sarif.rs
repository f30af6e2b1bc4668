//! SARIF (Static Analysis Results Interchange Format) output support.
//!
//! Implements SARIF 2.1.0 for CI/CD code scanning upload.
//! https://docs.oasis-open.org/sarif/sarif/v2.1.0/sarif-v2.1.0.html

use crate::json::relative_path;
use htmlint_core::diagnostics::{Diagnostic, DiagnosticLevel};
use serde::Serialize;
use std::path::Path;

const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json";
const SARIF_VERSION: &str = "2.1.0";
const TOOL_NAME: &str = "htmlint";
const TOOL_INFO_URI: &str = "https://github.com/htmlint/htmlint";
const RULES_DOC_URI: &str = "https://github.com/htmlint/htmlint/blob/main/docs/RULES.md";

#[derive(Debug, Serialize)]
pub struct SarifLog {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<Run>,
}

#[derive(Debug, Serialize)]
pub struct Run {
    pub tool: Tool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
pub struct Tool {
    pub driver: Driver,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub name: String,
    pub version: String,
    pub information_uri: String,
    pub rules: Vec<ReportingDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingDescriptor {
    pub id: String,
    pub short_description: Message,
    pub default_configuration: DefaultConfiguration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_uri: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DefaultConfiguration {
    pub level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub rule_id: String,
    pub level: String,
    pub message: Message,
    pub locations: Vec<Location>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub physical_location: PhysicalLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalLocation {
    pub artifact_location: ArtifactLocation,
    pub region: Region,
}

#[derive(Debug, Serialize)]
pub struct ArtifactLocation {
    pub uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub start_line: usize,
    pub start_column: usize,
}

fn level_to_sarif(level: DiagnosticLevel) -> &'static str {
    match level {
        DiagnosticLevel::Error => "error",
        DiagnosticLevel::Warning => "warning",
        DiagnosticLevel::Info => "note",
    }
}

/// Catalogue severity names map onto SARIF levels the same way
fn catalog_level_to_sarif(severity: &str) -> &'static str {
    DiagnosticLevel::from_catalog(severity)
        .map(level_to_sarif)
        .unwrap_or("warning")
}

fn get_all_rules() -> Vec<ReportingDescriptor> {
    htmlint_rules::RULES
        .iter()
        .map(|rule| ReportingDescriptor {
            id: rule.id.to_string(),
            short_description: Message {
                text: rule.name.to_string(),
            },
            default_configuration: DefaultConfiguration {
                level: catalog_level_to_sarif(rule.severity).to_string(),
            },
            help_uri: Some(format!("{}#{}", RULES_DOC_URI, rule.id)),
        })
        .collect()
}

pub fn diagnostics_to_sarif(diagnostics: &[Diagnostic], base_path: &Path) -> SarifLog {
    let results = diagnostics
        .iter()
        .map(|diag| SarifResult {
            rule_id: diag.rule.clone(),
            level: level_to_sarif(diag.level).to_string(),
            message: Message {
                text: diag.message.clone(),
            },
            locations: vec![Location {
                physical_location: PhysicalLocation {
                    artifact_location: ArtifactLocation {
                        uri: relative_path(&diag.file, base_path),
                    },
                    region: Region {
                        // SARIF positions are 1-based
                        start_line: diag.line.max(1),
                        start_column: diag.column.max(1),
                    },
                },
            }],
        })
        .collect();

    SarifLog {
        schema: SARIF_SCHEMA.to_string(),
        version: SARIF_VERSION.to_string(),
        runs: vec![Run {
            tool: Tool {
                driver: Driver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: TOOL_INFO_URI.to_string(),
                    rules: get_all_rules(),
                },
            },
            results,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_sarif_header() {
        let sarif = diagnostics_to_sarif(&[], Path::new("."));
        assert_eq!(sarif.version, "2.1.0");
        assert!(sarif.schema.contains("sarif-schema-2.1.0"));
        assert_eq!(sarif.runs.len(), 1);
        assert_eq!(sarif.runs[0].tool.driver.name, "htmlint");
        assert!(sarif.runs[0].results.is_empty());
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(level_to_sarif(DiagnosticLevel::Error), "error");
        assert_eq!(level_to_sarif(DiagnosticLevel::Warning), "warning");
        assert_eq!(level_to_sarif(DiagnosticLevel::Info), "note");
        assert_eq!(catalog_level_to_sarif("info"), "note");
        assert_eq!(catalog_level_to_sarif("bogus"), "warning");
    }

    #[test]
    fn test_driver_lists_every_rule() {
        let rules = get_all_rules();
        assert_eq!(rules.len(), htmlint_rules::rule_count());

        let handlers = rules
            .iter()
            .find(|r| r.id == "no-inline-event-handlers")
            .unwrap();
        assert_eq!(handlers.default_configuration.level, "error");
        assert_eq!(
            handlers.help_uri.as_deref(),
            Some("https://github.com/htmlint/htmlint/blob/main/docs/RULES.md#no-inline-event-handlers")
        );

        let mut ids: Vec<_> = rules.iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn test_diagnostic_conversion() {
        let diag = Diagnostic::warning(
            PathBuf::from("/site/docs/guide.html"),
            10,
            5,
            "figure-caption",
            "<figure> has no <figcaption>".to_string(),
        );

        let sarif = diagnostics_to_sarif(&[diag], Path::new("/site"));
        let result = &sarif.runs[0].results[0];
        assert_eq!(result.rule_id, "figure-caption");
        assert_eq!(result.level, "warning");
        assert_eq!(result.message.text, "<figure> has no <figcaption>");

        let location = &result.locations[0].physical_location;
        assert_eq!(location.artifact_location.uri, "docs/guide.html");
        assert_eq!((location.region.start_line, location.region.start_column), (10, 5));
    }

    #[test]
    fn test_serialized_field_names() {
        let diag = Diagnostic::error(PathBuf::from("a.html"), 0, 0, "file::read", "x".into());
        let json = serde_json::to_string(&diagnostics_to_sarif(&[diag], Path::new("."))).unwrap();
        assert!(json.contains("\"$schema\""));
        assert!(json.contains("\"ruleId\":\"file::read\""));
        assert!(json.contains("\"startLine\":1"));
        assert!(json.contains("\"defaultConfiguration\""));
        assert!(json.contains("\"informationUri\""));
    }
}
