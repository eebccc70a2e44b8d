//! linkpage CLI - static link-page site generator.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "linkpage")]
#[command(about = "Static site generator for link pages")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to linkpage.toml config file
    #[arg(short, long, default_value = "linkpage.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter links.yaml, templates and config
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the static site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip bundling the QR-code script
        #[arg(long)]
        no_bundle: bool,

        /// Copy the QR-code script without minifying it
        #[arg(long)]
        no_minify: bool,
    },

    /// Validate links and templates without writing anything
    Check,

    /// Preview a built site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to the configured output)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Don't open a browser
        #[arg(long)]
        no_open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(Path::new("."), yes).await?;
        }
        Commands::Build {
            output,
            no_bundle,
            no_minify,
        } => {
            let overrides = config::BuildOverrides {
                output,
                no_bundle,
                no_minify,
            };
            commands::build::run(&cli.config, overrides).await?;
        }
        Commands::Check => {
            commands::check::run(&cli.config).await?;
        }
        Commands::Serve { port, dir, no_open } => {
            let options = commands::serve::ServeOptions {
                port,
                dir,
                open: !no_open,
            };
            commands::serve::run(&cli.config, options).await?;
        }
    }

    Ok(())
}
