//! Template set loaded from the templates directory.

use std::io::ErrorKind;
use std::path::Path;

use linkpage_template::{TemplateError, Templates};

use crate::error::BuildError;
use crate::links::{LinksDocument, Page};

/// Index template file name.
pub const INDEX_TEMPLATE: &str = "index.html";
/// Per-page template file name.
pub const PAGE_TEMPLATE: &str = "page.html";
/// Optional QR page template file name.
pub const QR_TEMPLATE: &str = "qr.html";

/// Field injected into the QR page context.
pub const BASE_URL_FIELD: &str = "base_url";

/// The compiled templates for one build.
#[derive(Debug)]
pub struct TemplateSet {
    templates: Templates,
    has_qr: bool,
}

impl TemplateSet {
    /// Load templates from `dir`.
    ///
    /// `index.html` and `page.html` are required; `qr.html` is optional.
    /// Partials are included by path relative to `dir`, for example
    /// `{{>partials/footer.html}}`.
    pub async fn load(dir: &Path) -> Result<Self, BuildError> {
        let index = read_template(&dir.join(INDEX_TEMPLATE)).await?;
        let page = read_template(&dir.join(PAGE_TEMPLATE)).await?;
        let qr = read_optional(&dir.join(QR_TEMPLATE)).await?;

        let mut templates = Templates::new(dir).map_err(template_error(dir))?;
        insert(&mut templates, dir, INDEX_TEMPLATE, index)?;
        insert(&mut templates, dir, PAGE_TEMPLATE, page)?;

        let has_qr = match qr {
            Some(source) => {
                insert(&mut templates, dir, QR_TEMPLATE, source)?;
                true
            }
            None => false,
        };

        Ok(Self { templates, has_qr })
    }

    /// Whether QR pages will be generated.
    pub fn has_qr(&self) -> bool {
        self.has_qr
    }

    /// Render the index against the whole document.
    pub fn render_index(&self, links: &LinksDocument) -> String {
        // registered by `load`
        self.templates
            .render(INDEX_TEMPLATE, links.root())
            .unwrap_or_default()
    }

    /// Render one page against its own fields.
    pub fn render_page(&self, page: &Page) -> String {
        self.templates
            .render(PAGE_TEMPLATE, page.fields())
            .unwrap_or_default()
    }

    /// Render the QR page for `page`, if a QR template exists.
    pub fn render_qr(&self, page: &Page, base_url: &str) -> Option<String> {
        if !self.has_qr {
            return None;
        }
        let context = page.with_field(BASE_URL_FIELD, base_url);
        self.templates.render(QR_TEMPLATE, &context)
    }
}

async fn read_template(path: &Path) -> Result<String, BuildError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| BuildError::Read {
            path: path.to_path_buf(),
            source: e,
        })
}

async fn read_optional(path: &Path) -> Result<Option<String>, BuildError> {
    match tokio::fs::read_to_string(path).await {
        Ok(source) => Ok(Some(source)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(BuildError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn insert(
    templates: &mut Templates,
    dir: &Path,
    name: &str,
    source: String,
) -> Result<(), BuildError> {
    templates
        .insert(name, source)
        .map_err(template_error(&dir.join(name)))?;
    tracing::debug!("Compiled template {}", name);
    Ok(())
}

fn template_error(path: &Path) -> impl FnOnce(TemplateError) -> BuildError + '_ {
    move |source| BuildError::Template {
        path: path.to_path_buf(),
        source,
    }
}
