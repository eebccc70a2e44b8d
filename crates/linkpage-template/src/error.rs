//! Template errors.

use std::io;

use thiserror::Error;

/// Errors raised while compiling a template or preparing its data.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Unclosed tag")]
    UnclosedTag,

    #[error("Section '{0}' is closed by a different tag")]
    UnclosedSection(String),

    #[error("Closing tag '{0}' has no open section")]
    UnopenedSection(String),

    #[error("Template ends inside an open section")]
    UnterminatedSection,

    #[error("Sections nested too deeply")]
    TooDeep,

    #[error("Delimiter changes are not supported (line {line})")]
    UnsupportedDelimiter { line: usize },

    #[error("Partials are not available to standalone templates")]
    PartialsDisabled,

    #[error("Partial '{0}' is outside the templates directory")]
    IllegalPartial(String),

    #[error("Partial '{0}' not found")]
    PartialNotFound(String),

    #[error("Failed to load partial: {0}")]
    Io(#[source] io::Error),

    #[error("Invalid template data: {0}")]
    Data(String),

    #[error("{0}")]
    Other(String),
}

impl From<ramhorns::Error> for TemplateError {
    fn from(err: ramhorns::Error) -> Self {
        #[allow(unreachable_patterns)]
        match err {
            ramhorns::Error::Io(e) => Self::Io(e),
            ramhorns::Error::StackOverflow => Self::TooDeep,
            ramhorns::Error::UnclosedSection(name) => Self::UnclosedSection(name.into()),
            ramhorns::Error::UnopenedSection(name) => Self::UnopenedSection(name.into()),
            ramhorns::Error::UnclosedTag => Self::UnclosedTag,
            ramhorns::Error::PartialsDisabled => Self::PartialsDisabled,
            ramhorns::Error::IllegalPartial(name) => Self::IllegalPartial(name.into()),
            ramhorns::Error::NotFound(name) => Self::PartialNotFound(name.into()),
            // ramhorns' `indexes` feature adds a variant
            other => Self::Other(other.to_string()),
        }
    }
}
