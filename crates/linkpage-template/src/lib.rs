//! Logic-less mustache templates over YAML data.
//!
//! Parsing and rendering are done by [`ramhorns`]. This crate supplies the
//! data side: [`YamlContent`] exposes a `serde_yaml::Value` with mustache.js
//! lookup, truthiness and stringification rules, and escapes output with
//! [`escape_html`]. Rendering never fails; missing fields render as empty
//! text.

mod content;
mod error;
mod template;

pub use content::{escape_html, YamlContent};
pub use error::TemplateError;
pub use template::{Template, Templates};
