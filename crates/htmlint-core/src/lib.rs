//! # htmlint-core
//!
//! Core validation engine for HTML pages.
//!
//! Pages are parsed into a [`dom::Document`], then replayed to the rules as
//! `element:ready` and `dom:ready` lifecycle events. Rules check:
//! - stacked or misplaced `<br>` elements
//! - inline `on*` event-handler attributes
//! - canonical links
//! - meta descriptions
//! - figure captions
//! - image `width`/`height` attributes

pub mod config;
pub mod diagnostics;
pub mod dom;
pub mod engine;
pub mod file_utils;
pub mod parsers;
mod regex_util;
pub mod reporter;
pub mod rules;

use std::path::{Path, PathBuf};

use rayon::prelude::*;

pub use config::LintConfig;
pub use diagnostics::{Diagnostic, DiagnosticLevel, LintError, LintResult};
pub use engine::{Engine, LifecycleEvent, Rule};
use rules::Validator;

/// Detected file type for validator dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// .html, .htm, .xhtml, .shtml
    Html,
    /// Skip validation
    Unknown,
}

const HTML_EXTENSIONS: &[&str] = &["html", "htm", "xhtml", "shtml"];

/// Detect file type from the extension (case-insensitive)
pub fn detect_file_type(path: &Path) -> FileType {
    let is_html = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| HTML_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)));

    if is_html {
        FileType::Html
    } else {
        FileType::Unknown
    }
}

fn get_validators_for_type(file_type: FileType) -> Vec<Box<dyn Validator>> {
    match file_type {
        FileType::Html => vec![Box::new(rules::HtmlValidator)],
        FileType::Unknown => vec![],
    }
}

/// Validate in-memory HTML as if it were read from `path`
pub fn validate_content(path: &Path, content: &str, config: &LintConfig) -> Vec<Diagnostic> {
    rules::HtmlValidator.validate(path, content, config)
}

/// Validate a single file
pub fn validate_file(path: &Path, config: &LintConfig) -> LintResult<Vec<Diagnostic>> {
    let file_type = detect_file_type(path);

    if file_type == FileType::Unknown {
        return Ok(vec![]);
    }

    let content = file_utils::safe_read_file(path)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "validating file");

    let diagnostics = get_validators_for_type(file_type)
        .iter()
        .flat_map(|validator| validator.validate(path, &content, config))
        .collect();

    Ok(diagnostics)
}

/// Outcome of a project run
#[derive(Debug, Clone, Default)]
pub struct ProjectReport {
    pub diagnostics: Vec<Diagnostic>,
    /// HTML files that were validated
    pub files_checked: usize,
}

/// Main entry point for validating a project
pub fn validate_project(path: &Path, config: &LintConfig) -> LintResult<Vec<Diagnostic>> {
    check_project(path, config).map(|report| report.diagnostics)
}

/// Validate every HTML file under `path` (or `path` itself if it is a file)
pub fn check_project(path: &Path, config: &LintConfig) -> LintResult<ProjectReport> {
    use ignore::WalkBuilder;

    config
        .validate()
        .map_err(|e| LintError::Config(e.to_string()))?;

    let exclude_patterns = compile_excludes(&config.exclude)?;

    let paths: Vec<PathBuf> = WalkBuilder::new(path)
        .standard_filters(true)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter(|entry| detect_file_type(entry.path()) == FileType::Html)
        .filter(|entry| !is_excluded(entry.path(), path, &exclude_patterns))
        .map(|entry| entry.path().to_path_buf())
        .collect();

    tracing::info!(root = %path.display(), files = paths.len(), "discovered HTML files");

    let mut diagnostics: Vec<Diagnostic> = paths
        .par_iter()
        .flat_map(|file_path| match validate_file(file_path, config) {
            Ok(file_diagnostics) => file_diagnostics,
            Err(e) => {
                tracing::warn!(path = %file_path.display(), error = %e, "skipping file");
                vec![Diagnostic::error(
                    file_path.clone(),
                    0,
                    0,
                    "file::read",
                    format!("Failed to validate file: {}", e),
                )]
            }
        })
        .filter(|diag| config.severity.admits(diag.level))
        .collect();

    sort_diagnostics(&mut diagnostics);

    Ok(ProjectReport {
        diagnostics,
        files_checked: paths.len(),
    })
}

fn compile_excludes(patterns: &[String]) -> LintResult<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p).map_err(|source| LintError::InvalidExcludePattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

/// Match excludes against the path relative to the walk root, with `/`
/// separators on every platform
fn is_excluded(file: &Path, root: &Path, patterns: &[glob::Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let relative = file
        .strip_prefix(root)
        .ok()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(file);
    let normalized = relative.to_string_lossy().replace('\\', "/");
    patterns.iter().any(|p| p.matches(&normalized))
}

/// Errors first, then file, position and rule for stable output
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.level
            .cmp(&b.level)
            .then_with(|| a.file.cmp(&b.file))
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| a.column.cmp(&b.column))
            .then_with(|| a.rule.cmp(&b.rule))
    });
}
