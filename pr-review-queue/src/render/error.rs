//! Report rendering error types.

use crate::classify::Category;

/// Report rendering error.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The queue lacks a section every queue must have.
    #[error("Queue is missing the '{0}' section")]
    MissingSection(Category),

    /// Handlebars rendering error.
    #[error("Template rendering error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Template registration error.
    #[error("Template registration error: {0}")]
    Registration(#[from] handlebars::TemplateError),
}
