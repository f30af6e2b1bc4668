//! Linter configuration

use crate::diagnostics::DiagnosticLevel;
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default lower bound for the meta description length, in characters
pub const DEFAULT_META_DESCRIPTION_MIN: usize = 50;

/// Default upper bound for the meta description length, in characters
pub const DEFAULT_META_DESCRIPTION_MAX: usize = 160;

/// Configuration for the linter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Lowest severity that is reported
    pub severity: SeverityLevel,

    /// Glob patterns, relative to the validated root, to skip
    pub exclude: Vec<String>,

    /// Rules to enable/disable
    pub rules: RuleConfig,

    /// Options for `meta-description`
    pub meta_description: MetaDescriptionOptions,

    /// Options for `no-inline-event-handlers`
    pub event_handlers: EventHandlerOptions,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            severity: SeverityLevel::Info,
            exclude: vec![
                "node_modules/**".to_string(),
                ".git/**".to_string(),
                "target/**".to_string(),
            ],
            rules: RuleConfig::default(),
            meta_description: MetaDescriptionOptions::default(),
            event_handlers: EventHandlerOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeverityLevel {
    Error,
    Warning,
    Info,
}

impl SeverityLevel {
    /// Check whether a diagnostic at `level` passes this threshold
    pub fn admits(self, level: DiagnosticLevel) -> bool {
        let threshold = match self {
            SeverityLevel::Error => DiagnosticLevel::Error,
            SeverityLevel::Warning => DiagnosticLevel::Warning,
            SeverityLevel::Info => DiagnosticLevel::Info,
        };
        level <= threshold
    }
}

/// Helper function for serde default
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Stacked and misplaced `<br>` (no-stacked-br)
    #[serde(default = "default_true")]
    pub line_breaks: bool,

    /// Inline `on*` attributes (no-inline-event-handlers)
    #[serde(default = "default_true")]
    pub event_handlers: bool,

    /// Canonical link checks (require-canonical)
    #[serde(default = "default_true")]
    pub canonical: bool,

    /// Meta description checks (meta-description)
    #[serde(default = "default_true")]
    pub meta_description: bool,

    /// Figure caption checks (figure-caption)
    #[serde(default = "default_true")]
    pub figure_caption: bool,

    /// Image width/height checks (img-dimensions)
    #[serde(default = "default_true")]
    pub image_dimensions: bool,

    /// Explicitly disabled rules by ID (e.g., ["img-dimensions"])
    #[serde(default)]
    pub disabled_rules: Vec<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            line_breaks: true,
            event_handlers: true,
            canonical: true,
            meta_description: true,
            figure_caption: true,
            image_dimensions: true,
            disabled_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaDescriptionOptions {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for MetaDescriptionOptions {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_META_DESCRIPTION_MIN,
            max_length: DEFAULT_META_DESCRIPTION_MAX,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventHandlerOptions {
    /// Handler attributes that are tolerated (e.g., ["onload"])
    pub allow: Vec<String>,
}

impl EventHandlerOptions {
    pub fn is_allowed(&self, attribute: &str) -> bool {
        self.allow
            .iter()
            .any(|a| a.eq_ignore_ascii_case(attribute))
    }
}

impl LintConfig {
    /// Load config from file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config or use default
    pub fn load_or_default(path: Option<&Path>) -> Self {
        path.and_then(|p| Self::load(p).ok()).unwrap_or_default()
    }

    /// Reject option combinations no document could satisfy
    pub fn validate(&self) -> anyhow::Result<()> {
        let meta = &self.meta_description;
        if meta.min_length > meta.max_length {
            bail!(
                "meta_description.min_length ({}) is greater than max_length ({})",
                meta.min_length,
                meta.max_length
            );
        }
        Ok(())
    }

    /// Check if a specific rule is enabled based on config
    ///
    /// A rule is enabled if:
    /// 1. It's not in the disabled_rules list
    /// 2. Its category is enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        if self.rules.disabled_rules.iter().any(|r| r == rule_id) {
            return false;
        }

        self.is_category_enabled(rule_id)
    }

    /// Check if a rule's category is enabled
    fn is_category_enabled(&self, rule_id: &str) -> bool {
        match rule_id {
            "no-stacked-br" => self.rules.line_breaks,
            "no-inline-event-handlers" => self.rules.event_handlers,
            "require-canonical" => self.rules.canonical,
            "meta-description" => self.rules.meta_description,
            "figure-caption" => self.rules.figure_caption,
            "img-dimensions" => self.rules.image_dimensions,
            // Unknown rules are enabled by default
            _ => true,
        }
    }
}
