//! Client-side script bundling.
//!
//! The QR page loads a third-party QR-code library from `assets/`. The
//! library source is read from `node_modules` and minified with oxc.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::BuildError;
use crate::output::write_file;

/// Where the script comes from and where it lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    /// Library source file
    pub entry: PathBuf,

    /// File name written under the output `assets/` directory
    pub output_name: String,

    /// Minify the script (otherwise it is copied verbatim)
    pub minify: bool,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            entry: PathBuf::from("node_modules/qrcode-generator/qrcode.js"),
            output_name: "qrcode.min.js".to_string(),
            minify: true,
        }
    }
}

/// What happened to the bundle step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleOutcome {
    /// Bundling turned off in the configuration
    Disabled,

    /// Script written to `path`
    Written { path: PathBuf, bytes: usize },

    /// Library source not found; nothing written
    Skipped { entry: PathBuf },

    /// Bundling failed; the build carried on without the script
    Failed { message: String },
}

/// Script bundling utilities.
pub struct ScriptBundler;

impl ScriptBundler {
    /// Minify JavaScript using oxc.
    ///
    /// The source is parsed as a classic script, so top-level names that the
    /// page relies on (such as a `qrcode` global) keep their names.
    pub fn minify_js(source: &str) -> Result<String, String> {
        use oxc_allocator::Allocator;
        use oxc_codegen::{Codegen, CodegenOptions};
        use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
        use oxc_parser::Parser;
        use oxc_span::SourceType;

        let allocator = Allocator::default();
        let parsed = Parser::new(&allocator, source, SourceType::cjs()).parse();

        if parsed.panicked || !parsed.errors.is_empty() {
            let message = parsed
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(format!("JS parse error: {}", message));
        }

        let mut program = parsed.program;
        let options = MinifierOptions {
            mangle: Some(MangleOptions::default()),
            compress: Some(CompressOptions::default()),
        };
        let minified = Minifier::new(options).build(&allocator, &mut program);

        let code = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                ..CodegenOptions::default()
            })
            .with_scoping(minified.scoping)
            .build(&program)
            .code;

        Ok(code)
    }

    /// Read the library, minify it if configured, and write it into
    /// `assets_dir`. Returns the path written.
    pub async fn bundle(config: &BundleConfig, assets_dir: &Path) -> Result<PathBuf, BuildError> {
        let source = tokio::fs::read_to_string(&config.entry)
            .await
            .map_err(|e| BuildError::Read {
                path: config.entry.clone(),
                source: e,
            })?;

        let script = if config.minify {
            Self::minify_js(&source).map_err(|message| BuildError::Bundle {
                path: config.entry.clone(),
                message,
            })?
        } else {
            source
        };

        let target = assets_dir.join(&config.output_name);
        write_file(&target, &script).await?;

        Ok(target)
    }

    /// Run [`ScriptBundler::bundle`], turning every failure into an outcome
    /// instead of an error.
    pub async fn bundle_or_warn(config: &BundleConfig, assets_dir: &Path) -> BundleOutcome {
        match Self::bundle(config, assets_dir).await {
            Ok(path) => {
                let bytes = tokio::fs::metadata(&path)
                    .await
                    .map(|m| m.len() as usize)
                    .unwrap_or_default();
                tracing::info!("Bundled {} ({} bytes)", path.display(), bytes);
                BundleOutcome::Written { path, bytes }
            }
            Err(BuildError::Read { path, source }) if source.kind() == ErrorKind::NotFound => {
                tracing::warn!("Script source {} not found, skipping bundle", path.display());
                BundleOutcome::Skipped { entry: path }
            }
            Err(e) => {
                tracing::warn!("Script bundling failed: {}", e);
                BundleOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}
