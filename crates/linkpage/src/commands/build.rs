//! Static site build command.

use std::path::Path;

use anyhow::{Context, Result};
use linkpage_static::{BundleOutcome, StaticBuilder};

use crate::config::{self, BuildOverrides};

/// Run the build command.
pub async fn run(config_path: &Path, overrides: BuildOverrides) -> Result<()> {
    let config = config::resolve(config_path, overrides)?;

    let result = StaticBuilder::new(config)
        .build()
        .await
        .context("Build failed")?;

    tracing::info!(
        "Built {} pages and {} QR pages in {}ms",
        result.pages,
        result.qr_pages,
        result.duration_ms
    );

    if let BundleOutcome::Failed { message } = &result.bundle {
        tracing::warn!("Site built without the QR script: {}", message);
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
