//! Compiled templates.

use std::collections::HashMap;
use std::path::Path;

use ramhorns::Ramhorns;
use serde::Serialize;
use serde_yaml::Value;

use crate::content::YamlContent;
use crate::error::TemplateError;

/// A standalone template. `{{>partial}}` tags are rejected.
#[derive(Debug)]
pub struct Template {
    inner: ramhorns::Template<'static>,
    trailing: String,
}

impl Template {
    /// Compile a template from source text.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        check_source(source)?;
        Ok(Self {
            inner: ramhorns::Template::new(source.to_string())?,
            trailing: trailing_whitespace(source).to_string(),
        })
    }

    /// Render against `data`. Missing fields render as empty text.
    pub fn render(&self, data: &Value) -> String {
        let mut html = self.inner.render(&YamlContent::new(data));
        html.push_str(&self.trailing);
        html
    }

    /// Render against any serializable value.
    pub fn render_serialize<T: Serialize>(&self, data: &T) -> Result<String, TemplateError> {
        let value = serde_yaml::to_value(data).map_err(|e| TemplateError::Data(e.to_string()))?;
        Ok(self.render(&value))
    }
}

/// Named templates compiled against a templates directory.
///
/// `{{>path}}` includes the file at `path` relative to that directory, so
/// `templates/partials/footer.html` is included with
/// `{{>partials/footer.html}}`. Partials are read once, when the template
/// using them is inserted.
#[derive(Debug)]
pub struct Templates {
    registry: Ramhorns,
    trailing: HashMap<String, String>,
}

impl Templates {
    /// Start an empty set rooted at `dir`, which must exist.
    pub fn new(dir: &Path) -> Result<Self, TemplateError> {
        Ok(Self {
            registry: Ramhorns::lazy(dir)?,
            trailing: HashMap::new(),
        })
    }

    /// Compile `source` as `name`, loading the partials it includes.
    pub fn insert(&mut self, name: &str, source: String) -> Result<(), TemplateError> {
        check_source(&source)?;
        let trailing = trailing_whitespace(&source).to_string();
        self.registry.insert(source, name.to_string())?;
        self.trailing.insert(name.to_string(), trailing);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.get(name).is_some()
    }

    /// Render `name` against `data`, or `None` if no such template was inserted.
    pub fn render(&self, name: &str, data: &Value) -> Option<String> {
        let template = self.registry.get(name)?;
        let mut html = template.render(&YamlContent::new(data));
        if let Some(trailing) = self.trailing.get(name) {
            html.push_str(trailing);
        }
        Some(html)
    }
}

/// Rejects what ramhorns would otherwise render silently: delimiter changes
/// and sections still open at the end of the source.
fn check_source(source: &str) -> Result<(), TemplateError> {
    if let Some(offset) = source.find("{{=") {
        let line = source[..offset].matches('\n').count() + 1;
        return Err(TemplateError::UnsupportedDelimiter { line });
    }

    let opened = source.matches("{{#").count() + source.matches("{{^").count();
    if opened > source.matches("{{/").count() {
        return Err(TemplateError::UnterminatedSection);
    }

    Ok(())
}

// ramhorns trims the end of every template
fn trailing_whitespace(source: &str) -> &str {
    &source[source.trim_end().len()..]
}
