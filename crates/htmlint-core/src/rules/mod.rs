//! Validation rules

pub mod canonical;
pub mod event_handlers;
pub mod figure_caption;
pub mod image_dimensions;
pub mod line_breaks;
pub mod meta_description;

use crate::{
    config::LintConfig,
    diagnostics::Diagnostic,
    engine::{Engine, Rule},
    parsers::build_document,
};
use std::path::Path;

/// Trait for file validators
pub trait Validator {
    fn validate(&self, path: &Path, content: &str, config: &LintConfig) -> Vec<Diagnostic>;
}

/// Every rule, constructed with its options from `config`
pub fn all_rules(config: &LintConfig) -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(line_breaks::StackedBrRule),
        Box::new(event_handlers::InlineEventHandlerRule::new(
            config.event_handlers.clone(),
        )),
        Box::new(canonical::CanonicalRule),
        Box::new(meta_description::MetaDescriptionRule::new(
            config.meta_description.clone(),
        )),
        Box::new(figure_caption::FigureCaptionRule),
        Box::new(image_dimensions::ImageDimensionsRule),
    ]
}

/// Parses HTML and runs every enabled rule over it
pub struct HtmlValidator;

impl Validator for HtmlValidator {
    fn validate(&self, path: &Path, content: &str, config: &LintConfig) -> Vec<Diagnostic> {
        let document = build_document(content);
        Engine::new(config).run(path, &document)
    }
}

#[cfg(test)]
pub(crate) fn run_rule<R: Rule + 'static>(rule: R, html: &str) -> Vec<Diagnostic> {
    let document = build_document(html);
    Engine::with_rules(vec![Box::new(rule)]).run(Path::new("test.html"), &document)
}
