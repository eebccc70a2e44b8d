//! YAML values as template data.

use ramhorns::encoding::Encoder;
use ramhorns::traits::ContentSequence;
use ramhorns::{Content, Section};
use serde_yaml::{Number, Value};

/// A YAML value exposed to ramhorns.
///
/// Names are resolved in full against each context, innermost first:
/// `{{site.name}}` inside `{{#page}}` reads `page.site.name` and falls back
/// to the outer `site.name` when that path does not exist. Numeric segments
/// index into sequences (`{{tags.0}}`).
#[derive(Debug, Clone, Copy)]
pub struct YamlContent<'a>(&'a Value);

impl<'a> YamlContent<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(untag(value))
    }

    fn lookup(&self, name: &str) -> Option<YamlContent<'a>> {
        if name == "." {
            return Some(*self);
        }

        let mut value = self.0;
        for part in name.split('.') {
            value = match value {
                Value::Mapping(map) => map.get(part)?,
                Value::Sequence(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
            value = untag(value);
        }

        Some(YamlContent(value))
    }
}

impl Content for YamlContent<'_> {
    fn is_truthy(&self) -> bool {
        is_truthy(self.0)
    }

    fn render_escaped<E: Encoder>(&self, encoder: &mut E) -> Result<(), E::Error> {
        encoder.write_unescaped(&escape_html(&stringify(self.0)))
    }

    fn render_unescaped<E: Encoder>(&self, encoder: &mut E) -> Result<(), E::Error> {
        encoder.write_unescaped(&stringify(self.0))
    }

    fn render_section<C, E>(&self, section: Section<C>, encoder: &mut E) -> Result<(), E::Error>
    where
        C: ContentSequence,
        E: Encoder,
    {
        match self.0 {
            Value::Sequence(items) => {
                for item in items {
                    section.with(&YamlContent::new(item)).render(encoder)?;
                }
                Ok(())
            }
            // `true` keeps the current context
            Value::Bool(true) => section.render(encoder),
            _ if self.is_truthy() => section.with(self).render(encoder),
            _ => Ok(()),
        }
    }

    fn render_field_escaped<E: Encoder>(
        &self,
        _hash: u64,
        name: &str,
        encoder: &mut E,
    ) -> Result<bool, E::Error> {
        match self.lookup(name) {
            Some(value) => value.render_escaped(encoder).map(|_| true),
            None => Ok(false),
        }
    }

    fn render_field_unescaped<E: Encoder>(
        &self,
        _hash: u64,
        name: &str,
        encoder: &mut E,
    ) -> Result<bool, E::Error> {
        match self.lookup(name) {
            Some(value) => value.render_unescaped(encoder).map(|_| true),
            None => Ok(false),
        }
    }

    fn render_field_section<C, E>(
        &self,
        _hash: u64,
        name: &str,
        section: Section<C>,
        encoder: &mut E,
    ) -> Result<bool, E::Error>
    where
        C: ContentSequence,
        E: Encoder,
    {
        match self.lookup(name) {
            Some(value) => value.render_section(section, encoder).map(|_| true),
            None => Ok(false),
        }
    }

    fn render_field_inverse<C, E>(
        &self,
        _hash: u64,
        name: &str,
        section: Section<C>,
        encoder: &mut E,
    ) -> Result<bool, E::Error>
    where
        C: ContentSequence,
        E: Encoder,
    {
        match self.lookup(name) {
            Some(value) => value.render_inverse(section, encoder).map(|_| true),
            None => Ok(false),
        }
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(items) => !items.is_empty(),
        Value::Mapping(_) => true,
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

/// Text for a value, following JavaScript's `String(value)`.
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number(n),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items
            .iter()
            .map(|item| stringify(untag(item)))
            .collect::<Vec<_>>()
            .join(","),
        Value::Mapping(_) => "[object Object]".to_string(),
        Value::Tagged(tagged) => stringify(&tagged.value),
    }
}

fn number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_infinite() => {
            let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
            text.to_string()
        }
        // 1.0 prints as "1", like a JavaScript number
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

/// Escape text for safe inclusion in HTML.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '/' => out.push_str("&#x2F;"),
            '`' => out.push_str("&#x60;"),
            '=' => out.push_str("&#x3D;"),
            _ => out.push(c),
        }
    }
    out
}
