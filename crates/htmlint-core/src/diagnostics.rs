//! Diagnostic types and error reporting

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub type LintResult<T> = Result<T, LintError>;

/// A diagnostic message from the linter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub rule: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

impl DiagnosticLevel {
    /// Parse the lowercase severity names used in the rule catalogue.
    pub fn from_catalog(severity: &str) -> Option<Self> {
        match severity {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl Diagnostic {
    pub fn new(
        level: DiagnosticLevel,
        file: PathBuf,
        line: usize,
        column: usize,
        rule: &str,
        message: String,
    ) -> Self {
        Self {
            level,
            message,
            file,
            line,
            column,
            rule: rule.to_string(),
            suggestion: None,
        }
    }

    pub fn error(file: PathBuf, line: usize, column: usize, rule: &str, message: String) -> Self {
        Self::new(DiagnosticLevel::Error, file, line, column, rule, message)
    }

    pub fn warning(file: PathBuf, line: usize, column: usize, rule: &str, message: String) -> Self {
        Self::new(DiagnosticLevel::Warning, file, line, column, rule, message)
    }

    pub fn info(file: PathBuf, line: usize, column: usize, rule: &str, message: String) -> Self {
        Self::new(DiagnosticLevel::Info, file, line, column, rule, message)
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestion = Some(suggestion);
        self
    }
}

/// Linter errors
#[derive(Error, Debug)]
pub enum LintError {
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to follow symlink: {path}")]
    FileSymlink { path: PathBuf },

    #[error("Not a regular file: {path}")]
    FileNotRegular { path: PathBuf },

    #[error("File too large: {path} ({size} bytes, limit {limit} bytes)")]
    FileTooBig { path: PathBuf, size: u64, limit: u64 },

    #[error("Invalid exclude pattern in config: {pattern}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
