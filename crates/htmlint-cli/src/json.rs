//! JSON output format.
//!
//! A flat, stable shape meant for scripts and editor integrations.

use htmlint_core::diagnostics::{Diagnostic, DiagnosticLevel};
use serde::Serialize;
use std::path::Path;

/// Root structure for JSON output.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// Version of htmlint that produced this output.
    pub version: String,
    /// Number of HTML files that were validated.
    pub files_checked: usize,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub summary: JsonSummary,
}

#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    /// error, warning or info
    pub level: String,
    /// Rule id, e.g. `img-dimensions`
    pub rule: String,
    /// Path relative to the validated root, with forward slashes
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct JsonSummary {
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

pub(crate) fn relative_path(path: &Path, base_path: &Path) -> String {
    path.strip_prefix(base_path)
        .ok()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

pub fn diagnostics_to_json(
    diagnostics: &[Diagnostic],
    base_path: &Path,
    files_checked: usize,
) -> JsonOutput {
    let mut summary = JsonSummary::default();

    let json_diagnostics = diagnostics
        .iter()
        .map(|diag| {
            match diag.level {
                DiagnosticLevel::Error => summary.errors += 1,
                DiagnosticLevel::Warning => summary.warnings += 1,
                DiagnosticLevel::Info => summary.info += 1,
            }
            JsonDiagnostic {
                level: diag.level.as_str().to_string(),
                rule: diag.rule.clone(),
                file: relative_path(&diag.file, base_path),
                // file::read errors carry no position
                line: diag.line.max(1),
                column: diag.column.max(1),
                message: diag.message.clone(),
                suggestion: diag.suggestion.clone(),
            }
        })
        .collect();

    JsonOutput {
        version: env!("CARGO_PKG_VERSION").to_string(),
        files_checked,
        diagnostics: json_diagnostics,
        summary,
    }
}
