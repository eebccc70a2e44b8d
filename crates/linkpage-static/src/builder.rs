//! Static site builder.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use crate::assets::{BundleConfig, BundleOutcome, ScriptBundler};
use crate::error::BuildError;
use crate::links::LinksDocument;
use crate::mirror::{mirror_dir, MirrorStats};
use crate::output::{copy_file, reset_dir, write_file};
use crate::templates::TemplateSet;

/// Output subdirectory the assets are mirrored into.
pub const ASSETS_DIR: &str = "assets";

/// Output subdirectory holding a page's QR page.
pub const QR_DIR: &str = "qr";

/// Configuration for building a link site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// YAML links document
    pub links_file: PathBuf,

    /// Directory holding index.html, page.html and the optional qr.html
    pub templates_dir: PathBuf,

    /// Static assets mirrored into `<output>/assets`
    pub assets_dir: PathBuf,

    /// Output directory, deleted and regenerated on every build
    pub output_dir: PathBuf,

    /// Custom-domain file copied to the output root when present
    pub domain_file: PathBuf,

    /// Base URL injected into QR page templates as `base_url`
    pub base_url: String,

    /// Script bundling, `None` to skip the step
    pub bundle: Option<BundleConfig>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            links_file: PathBuf::from("links.yaml"),
            templates_dir: PathBuf::from("templates"),
            assets_dir: PathBuf::from("assets"),
            output_dir: PathBuf::from("dist"),
            domain_file: PathBuf::from("CNAME"),
            base_url: String::new(),
            bundle: Some(BundleConfig::default()),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Number of QR pages generated
    pub qr_pages: usize,

    /// Mirrored assets
    pub assets: MirrorStats,

    /// Script bundling outcome
    pub bundle: BundleOutcome,

    /// Whether the domain file was copied
    pub domain_file: bool,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Result of checking a site without writing it.
#[derive(Debug)]
pub struct CheckReport {
    /// Number of pages that would be generated
    pub pages: usize,

    /// Number of QR pages that would be generated
    pub qr_pages: usize,

    /// Slugs shared by more than one page
    pub duplicate_slugs: Vec<String>,
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the site.
    ///
    /// Steps run strictly in order: clean, load, index, pages, assets,
    /// script bundle, domain file. Every failure is fatal except the script
    /// bundle, which is reported in [`BuildResult::bundle`].
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let output_dir = &self.config.output_dir;

        tracing::info!("Building site...");

        self.ensure_safe_output()?;
        reset_dir(output_dir).await?;

        let (links, templates) = self.load().await?;

        write_file(&output_dir.join("index.html"), templates.render_index(&links)).await?;
        tracing::debug!("Wrote index with {} pages", links.pages().len());

        let mut qr_pages = 0;
        for page in links.pages() {
            let page_dir = output_dir.join(page.slug());
            write_file(&page_dir.join("index.html"), templates.render_page(page)).await?;

            if let Some(html) = templates.render_qr(page, &self.config.base_url) {
                write_file(&page_dir.join(QR_DIR).join("index.html"), html).await?;
                qr_pages += 1;
            }

            tracing::debug!("Wrote page {}", page.slug());
        }

        let assets_out = output_dir.join(ASSETS_DIR);
        let assets = mirror_dir(&self.config.assets_dir, &assets_out).await?;
        if assets.files > 0 {
            tracing::info!(
                "Copied {} assets from {}",
                assets.files,
                self.config.assets_dir.display()
            );
        }

        let bundle = match &self.config.bundle {
            Some(bundle) => ScriptBundler::bundle_or_warn(bundle, &assets_out).await,
            None => BundleOutcome::Disabled,
        };

        let domain_file = self.copy_domain_file().await?;

        let duration = start.elapsed();
        tracing::info!("Build complete! Output in {}", output_dir.display());

        Ok(BuildResult {
            pages: links.pages().len(),
            qr_pages,
            assets,
            bundle,
            domain_file,
            duration_ms: duration.as_millis() as u64,
            output_dir: output_dir.clone(),
        })
    }

    /// Parse the links document and compile the templates without touching
    /// the output. Rendering cannot fail, so this catches every error a build
    /// would hit before writing.
    pub async fn check(&self) -> Result<CheckReport, BuildError> {
        let (links, templates) = self.load().await?;
        let pages = links.pages().len();

        Ok(CheckReport {
            pages,
            qr_pages: if templates.has_qr() { pages } else { 0 },
            duplicate_slugs: links
                .duplicate_slugs()
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
    }

    /// Read the links document and the templates.
    async fn load(&self) -> Result<(LinksDocument, TemplateSet), BuildError> {
        let links = LinksDocument::load(&self.config.links_file).await?;
        tracing::debug!(
            "Loaded {} pages from {}",
            links.pages().len(),
            self.config.links_file.display()
        );

        for slug in links.duplicate_slugs() {
            tracing::warn!("Slug '{}' is used by more than one page, the last one wins", slug);
        }

        let templates = TemplateSet::load(&self.config.templates_dir).await?;
        if !templates.has_qr() {
            tracing::debug!("No QR template, skipping QR pages");
        }

        Ok((links, templates))
    }

    /// Copy the domain file to the output root. Returns whether it existed.
    async fn copy_domain_file(&self) -> Result<bool, BuildError> {
        let source = &self.config.domain_file;

        match tokio::fs::metadata(source).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(false),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => {
                return Err(BuildError::Read {
                    path: source.clone(),
                    source: e,
                })
            }
        }

        let name = source.file_name().unwrap_or("CNAME".as_ref());
        copy_file(source, &self.config.output_dir.join(name)).await?;
        tracing::info!("Copied {}", source.display());

        Ok(true)
    }

    /// Refuse output directories whose deletion would take inputs with them.
    fn ensure_safe_output(&self) -> Result<(), BuildError> {
        let output = &self.config.output_dir;
        let unsafe_output = |reason: &str| BuildError::UnsafeOutput {
            path: output.clone(),
            reason: reason.to_string(),
        };

        let has_normal_component = output
            .components()
            .any(|c| matches!(c, Component::Normal(_)));
        if !has_normal_component || output.components().any(|c| c == Component::ParentDir) {
            return Err(unsafe_output("it is not a subdirectory of the project"));
        }

        // Compare resolved paths so `-o "$PWD"` or a symlinked alias cannot
        // slip past relative inputs.
        let resolved = resolve_path(output);

        let mut inputs: Vec<&Path> = vec![
            &self.config.links_file,
            &self.config.templates_dir,
            &self.config.assets_dir,
            &self.config.domain_file,
        ];
        if let Some(bundle) = &self.config.bundle {
            inputs.push(&bundle.entry);
        }
        if inputs
            .iter()
            .any(|input| resolve_path(input).starts_with(&resolved))
        {
            return Err(unsafe_output("it contains build inputs"));
        }

        if let Ok(cwd) = std::env::current_dir() {
            if resolve_path(&cwd).starts_with(&resolved) {
                return Err(unsafe_output("it contains the working directory"));
            }
        }

        Ok(())
    }
}

/// Absolute form of `path`, with symlinks resolved for the part that exists.
fn resolve_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return missing
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return absolute,
        }
    }
}
