//! Links document loading.
//!
//! The document is a YAML mapping with a `pages` sequence. Each page needs a
//! `slug`; every other field is passed to the templates untouched.

use std::collections::HashMap;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::BuildError;

/// Errors in the shape of a links document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinksError {
    #[error("Invalid YAML: {0}")]
    Yaml(String),

    #[error("Top level must be a mapping")]
    NotAMapping,

    #[error("Missing `pages` sequence")]
    MissingPages,

    #[error("`pages` must be a sequence")]
    PagesNotASequence,

    #[error("Page #{index} must be a mapping")]
    PageNotAMapping { index: usize },

    #[error("Page #{index} has no `slug`")]
    MissingSlug { index: usize },

    #[error("Page #{index} has slug {slug:?}, which is not a single path segment")]
    InvalidSlug { index: usize, slug: String },
}

/// One entry of the `pages` sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    slug: String,
    fields: Value,
}

impl Page {
    fn from_value(index: usize, value: &Value) -> Result<Self, LinksError> {
        let Value::Mapping(fields) = value else {
            return Err(LinksError::PageNotAMapping { index });
        };

        let slug = match fields.get("slug") {
            Some(Value::String(slug)) => slug.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(LinksError::MissingSlug { index }),
        };

        if !is_path_segment(&slug) {
            return Err(LinksError::InvalidSlug { index, slug });
        }

        Ok(Self {
            slug,
            fields: value.clone(),
        })
    }

    /// Output subdirectory name.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// The page mapping as written in the document, slug included.
    pub fn fields(&self) -> &Value {
        &self.fields
    }

    /// A copy of the page fields with one extra key set.
    pub fn with_field(&self, key: &str, value: impl Into<Value>) -> Value {
        let mut fields = match &self.fields {
            Value::Mapping(map) => map.clone(),
            _ => Mapping::new(),
        };
        fields.insert(Value::String(key.to_string()), value.into());
        Value::Mapping(fields)
    }
}

/// A parsed links document.
#[derive(Debug, Clone, PartialEq)]
pub struct LinksDocument {
    root: Value,
    pages: Vec<Page>,
}

impl LinksDocument {
    /// Parse a links document from YAML source.
    pub fn parse(source: &str) -> Result<Self, LinksError> {
        let root: Value =
            serde_yaml::from_str(source).map_err(|e| LinksError::Yaml(e.to_string()))?;

        let Value::Mapping(map) = &root else {
            return Err(LinksError::NotAMapping);
        };

        let pages = match map.get("pages") {
            Some(Value::Sequence(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| Page::from_value(index, item))
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(LinksError::PagesNotASequence),
            None => return Err(LinksError::MissingPages),
        };

        Ok(Self { root, pages })
    }

    /// Read and parse the links document at `path`.
    pub async fn load(path: &Path) -> Result<Self, BuildError> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BuildError::Read {
                path: path.to_path_buf(),
                source: e,
            })?;

        Self::parse(&source).map_err(|e| BuildError::Links {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// The whole document, used as the index template context.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Pages in document order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Slugs used by more than one page, in order of first appearance.
    pub fn duplicate_slugs(&self) -> Vec<&str> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for page in &self.pages {
            *seen.entry(page.slug()).or_default() += 1;
        }

        let mut duplicates = Vec::new();
        for page in &self.pages {
            let slug = page.slug();
            if seen.get(slug).is_some_and(|&n| n > 1) && !duplicates.contains(&slug) {
                duplicates.push(slug);
            }
        }
        duplicates
    }
}

/// Whether `slug` names exactly one directory below the output root.
fn is_path_segment(slug: &str) -> bool {
    !slug.is_empty() && slug != "." && slug != ".." && !slug.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LINKS: &str = r#"
title: My Links
owner: Ada
pages:
  - slug: github
    title: GitHub
    url: https://github.com/ada
  - slug: blog
    title: Blog
    description: Notes and essays
"#;

    #[test]
    fn parses_pages_in_order() {
        let doc = LinksDocument::parse(LINKS).unwrap();

        let slugs: Vec<_> = doc.pages().iter().map(Page::slug).collect();
        assert_eq!(slugs, vec!["github", "blog"]);
        assert_eq!(
            doc.pages()[0].fields().get("url"),
            Some(&Value::String("https://github.com/ada".to_string()))
        );
        assert_eq!(
            doc.root().get("owner"),
            Some(&Value::String("Ada".to_string()))
        );
    }

    #[test]
    fn accepts_numeric_slugs() {
        let doc = LinksDocument::parse("pages:\n  - slug: 2024\n").unwrap();

        assert_eq!(doc.pages()[0].slug(), "2024");
    }

    #[test]
    fn accepts_empty_page_list() {
        let doc = LinksDocument::parse("pages: []").unwrap();

        assert!(doc.pages().is_empty());
    }

    #[test]
    fn rejects_invalid_yaml() {
        let result = LinksDocument::parse("pages: [unclosed");

        assert!(matches!(result, Err(LinksError::Yaml(_))));
    }

    #[test]
    fn rejects_wrong_shapes() {
        assert_eq!(
            LinksDocument::parse("- a\n- b"),
            Err(LinksError::NotAMapping)
        );
        assert_eq!(
            LinksDocument::parse("title: x"),
            Err(LinksError::MissingPages)
        );
        assert_eq!(
            LinksDocument::parse("pages: nope"),
            Err(LinksError::PagesNotASequence)
        );
        assert_eq!(
            LinksDocument::parse("pages:\n  - just a string"),
            Err(LinksError::PageNotAMapping { index: 0 })
        );
        assert_eq!(
            LinksDocument::parse("pages:\n  - slug: a\n  - title: B"),
            Err(LinksError::MissingSlug { index: 1 })
        );
    }

    #[test]
    fn rejects_slugs_that_escape_the_output() {
        for slug in ["''", "'.'", "'..'", "a/b", "'..\\x'"] {
            let source = format!("pages:\n  - slug: {slug}\n");
            let result = LinksDocument::parse(&source);
            assert!(
                matches!(result, Err(LinksError::InvalidSlug { index: 0, .. })),
                "slug {slug} was accepted"
            );
        }
    }

    #[test]
    fn reports_duplicate_slugs() {
        let doc = LinksDocument::parse(
            "pages:\n  - slug: a\n  - slug: b\n  - slug: a\n  - slug: a\n",
        )
        .unwrap();

        assert_eq!(doc.duplicate_slugs(), vec!["a"]);
    }

    #[test]
    fn with_field_leaves_page_untouched() {
        let doc = LinksDocument::parse(LINKS).unwrap();
        let page = &doc.pages()[1];

        let extended = page.with_field("base_url", "https://links.example");

        assert_eq!(
            extended.get("base_url"),
            Some(&Value::String("https://links.example".to_string()))
        );
        assert_eq!(extended.get("title"), page.fields().get("title"));
        assert!(page.fields().get("base_url").is_none());
    }

    #[tokio::test]
    async fn load_reports_missing_file() {
        let temp = tempfile::tempdir().unwrap();

        let result = LinksDocument::load(&temp.path().join("links.yaml")).await;

        assert!(matches!(result, Err(BuildError::Read { .. })));
    }
}
