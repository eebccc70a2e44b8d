//! Static site builder for link pages.
//!
//! Reads a YAML links document, renders an index plus one page (and an
//! optional QR page) per link entry, mirrors static assets, and minifies an
//! optional client-side script.

pub mod assets;
pub mod builder;
pub mod error;
pub mod links;
pub mod mirror;
mod output;
pub mod templates;

pub use assets::{BundleConfig, BundleOutcome, ScriptBundler};
pub use builder::{BuildConfig, BuildResult, CheckReport, StaticBuilder};
pub use error::BuildError;
pub use links::{LinksDocument, LinksError, Page};
pub use mirror::{mirror_dir, MirrorStats};
pub use templates::TemplateSet;
