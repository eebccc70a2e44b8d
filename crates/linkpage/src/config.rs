//! Project configuration file (linkpage.toml).
//!
//! Every setting is optional. Relative paths are resolved against the
//! directory holding the config file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use linkpage_static::{BuildConfig, BundleConfig};
use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub bundle: BundleSettings,
}

#[derive(Debug, Deserialize)]
pub struct SiteSettings {
    #[serde(default = "default_links")]
    pub links: PathBuf,
    #[serde(default = "default_templates")]
    pub templates: PathBuf,
    #[serde(default = "default_assets")]
    pub assets: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_domain_file")]
    pub domain_file: PathBuf,
    /// Absolute site URL, injected into QR pages as `base_url`
    #[serde(default)]
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct BundleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// QR-code library source
    pub entry: Option<PathBuf>,
    /// File name under the output assets directory
    pub output: Option<String>,
    #[serde(default = "default_true")]
    pub minify: bool,
}

fn default_links() -> PathBuf {
    PathBuf::from("links.yaml")
}
fn default_templates() -> PathBuf {
    PathBuf::from("templates")
}
fn default_assets() -> PathBuf {
    PathBuf::from("assets")
}
fn default_output() -> PathBuf {
    PathBuf::from("dist")
}
fn default_domain_file() -> PathBuf {
    PathBuf::from("CNAME")
}
fn default_true() -> bool {
    true
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            links: default_links(),
            templates: default_templates(),
            assets: default_assets(),
            output: default_output(),
            domain_file: default_domain_file(),
            base_url: String::new(),
        }
    }
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            entry: None,
            output: None,
            minify: true,
        }
    }
}

/// Command-line settings that take precedence over the config file.
#[derive(Debug, Default)]
pub struct BuildOverrides {
    pub output: Option<PathBuf>,
    pub no_bundle: bool,
    pub no_minify: bool,
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

impl ConfigFile {
    /// Merge with command-line overrides into a builder configuration.
    ///
    /// `root` is the directory the config file lives in.
    pub fn into_build_config(self, root: &Path, overrides: BuildOverrides) -> BuildConfig {
        let site = self.site;

        let bundle = (self.bundle.enabled && !overrides.no_bundle).then(|| {
            let defaults = BundleConfig::default();
            BundleConfig {
                entry: root.join(self.bundle.entry.unwrap_or(defaults.entry)),
                output_name: self.bundle.output.unwrap_or(defaults.output_name),
                minify: self.bundle.minify && !overrides.no_minify,
            }
        });

        BuildConfig {
            links_file: root.join(site.links),
            templates_dir: root.join(site.templates),
            assets_dir: root.join(site.assets),
            output_dir: overrides.output.unwrap_or_else(|| root.join(site.output)),
            domain_file: root.join(site.domain_file),
            base_url: site.base_url,
            bundle,
        }
    }
}

/// Resolve the build configuration for the config file at `path`.
pub fn resolve(path: &Path, overrides: BuildOverrides) -> Result<BuildConfig> {
    let root = path.parent().unwrap_or(Path::new(""));
    Ok(load_config(path)?.into_build_config(root, overrides))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_without_config_file() {
        let temp = tempdir().unwrap();

        let config = load_config(&temp.path().join("linkpage.toml"))
            .unwrap()
            .into_build_config(Path::new(""), BuildOverrides::default());

        assert_eq!(config.links_file, PathBuf::from("links.yaml"));
        assert_eq!(config.templates_dir, PathBuf::from("templates"));
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
        assert_eq!(config.output_dir, PathBuf::from("dist"));
        assert_eq!(config.domain_file, PathBuf::from("CNAME"));
        assert_eq!(config.bundle, Some(BundleConfig::default()));
    }

    #[test]
    fn resolves_paths_against_config_dir() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("linkpage.toml");
        fs::write(
            &path,
            r#"
[site]
links = "data/links.yaml"
output = "public"
base_url = "https://links.example"

[bundle]
entry = "vendor/qr.js"
output = "qr.js"
"#,
        )
        .unwrap();

        let config = resolve(&path, BuildOverrides::default()).unwrap();

        assert_eq!(config.links_file, temp.path().join("data/links.yaml"));
        assert_eq!(config.output_dir, temp.path().join("public"));
        assert_eq!(config.templates_dir, temp.path().join("templates"));
        assert_eq!(config.base_url, "https://links.example");

        let bundle = config.bundle.unwrap();
        assert_eq!(bundle.entry, temp.path().join("vendor/qr.js"));
        assert_eq!(bundle.output_name, "qr.js");
        assert!(bundle.minify);
    }

    #[test]
    fn cli_overrides_win() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("linkpage.toml");
        fs::write(&path, "[bundle]\nminify = true\n").unwrap();

        let config = resolve(
            &path,
            BuildOverrides {
                output: Some(PathBuf::from("elsewhere")),
                no_bundle: false,
                no_minify: true,
            },
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("elsewhere"));
        assert!(!config.bundle.unwrap().minify);

        let config = resolve(
            &path,
            BuildOverrides {
                no_bundle: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(config.bundle, None);
    }

    #[test]
    fn disabled_bundle_in_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("linkpage.toml");
        fs::write(&path, "[bundle]\nenabled = false\n").unwrap();

        let config = resolve(&path, BuildOverrides::default()).unwrap();

        assert_eq!(config.bundle, None);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("linkpage.toml");
        fs::write(&path, "[site\nlinks = ").unwrap();

        let err = load_config(&path).unwrap_err();

        assert!(err.to_string().starts_with("Failed to parse"));
    }
}
