//! Build errors.

use std::io;
use std::path::PathBuf;

use linkpage_template::TemplateError;

use crate::links::LinksError;

/// Errors that can occur during a build.
///
/// Every variant is fatal to [`StaticBuilder::build`](crate::StaticBuilder::build)
/// except [`BuildError::Bundle`], which the builder downgrades to a warning.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Refusing to use {} as output directory: {reason}", .path.display())]
    UnsafeOutput { path: PathBuf, reason: String },

    #[error("Failed to clean output directory {}: {source}", .path.display())]
    Clean { path: PathBuf, source: io::Error },

    #[error("Failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Invalid links document {}: {source}", .path.display())]
    Links {
        path: PathBuf,
        #[source]
        source: LinksError,
    },

    #[error("Invalid template {}: {source}", .path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },

    #[error("Expected a directory at {}", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("Failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to bundle {}: {message}", .path.display())]
    Bundle { path: PathBuf, message: String },
}
