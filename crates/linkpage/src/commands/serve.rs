//! Preview server for the built output.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::{self, BuildOverrides};

/// Options for the serve command.
pub struct ServeOptions {
    pub port: u16,

    /// Directory to serve, defaults to the configured output
    pub dir: Option<PathBuf>,

    /// Open the site in a browser once listening
    pub open: bool,
}

/// Run the serve command.
pub async fn run(config_path: &Path, options: ServeOptions) -> Result<()> {
    let dir = site_dir(config_path, options.dir)?;

    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, options.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let url = format!("http://{}", addr);
    tracing::info!("Serving {} at {}", dir.display(), url);

    if options.open {
        if let Err(e) = open::that(&url) {
            tracing::debug!("Could not open browser: {}", e);
        }
    }

    axum::serve(listener, router(&dir))
        .await
        .context("Preview server stopped")?;

    Ok(())
}

/// `--dir` if given, otherwise `[site] output` from the config file.
fn site_dir(config_path: &Path, dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match dir {
        Some(dir) => dir,
        None => config::resolve(config_path, BuildOverrides::default())?.output_dir,
    };

    if !dir.is_dir() {
        anyhow::bail!(
            "Directory not found: {}. Run 'linkpage build' first.",
            dir.display()
        );
    }

    Ok(dir)
}

fn router(dir: &Path) -> Router {
    Router::new().fallback_service(ServeDir::new(dir).append_index_html_on_directories(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults_to_configured_output() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("linkpage.toml");
        fs::write(&config, "[site]\noutput = \"public\"\n").unwrap();
        fs::create_dir(temp.path().join("public")).unwrap();

        let dir = site_dir(&config, None).unwrap();

        assert_eq!(dir, temp.path().join("public"));
    }

    #[test]
    fn explicit_dir_wins() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("linkpage.toml");
        fs::write(&config, "[site]\noutput = \"public\"\n").unwrap();
        fs::create_dir(temp.path().join("preview")).unwrap();

        let dir = site_dir(&config, Some(temp.path().join("preview"))).unwrap();

        assert_eq!(dir, temp.path().join("preview"));
    }

    #[test]
    fn missing_output_is_an_error() {
        let temp = tempdir().unwrap();

        let err = site_dir(&temp.path().join("linkpage.toml"), None).unwrap_err();

        assert!(err.to_string().contains("linkpage build"), "{err}");
    }
}
