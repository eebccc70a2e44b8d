//! Validate links and templates without building.

use std::path::Path;

use anyhow::{Context, Result};
use linkpage_static::StaticBuilder;

use crate::config::{self, BuildOverrides};

/// Run the check command.
pub async fn run(config_path: &Path) -> Result<()> {
    let config = config::resolve(config_path, BuildOverrides::default())?;
    let links_file = config.links_file.clone();

    let report = StaticBuilder::new(config)
        .check()
        .await
        .context("Check failed")?;

    for slug in &report.duplicate_slugs {
        tracing::warn!("Duplicate slug: {}", slug);
    }

    tracing::info!(
        "{} is valid: {} pages, {} QR pages",
        links_file.display(),
        report.pages,
        report.qr_pages
    );

    Ok(())
}
