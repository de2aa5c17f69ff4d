//! sceneview-export - sceneview resource export tool
//!
//! Converts an OBJ scene (plus MTL materials and PNG/JPG textures) into the
//! flat resource file (resource.bin) loaded by the viewer.

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use std::path::PathBuf;

use sceneview_export::{ExportConfig, ExportError};

#[derive(Parser)]
#[command(name = "sceneview-export")]
#[command(about = "Convert an OBJ scene into a sceneview resource file")]
#[command(version)]
struct Cli {
    /// Input scene (.obj)
    input: PathBuf,

    /// Output resource file (overrides config; default: resource.bin)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export config (.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            // Usage errors exit with 1, not clap's default 2
            let _ = err.print();
            std::process::exit(1);
        }
    };

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };
    if let Some(output) = cli.output {
        config.output = output;
    }

    tracing::info!("Converting {:?} -> {:?}", cli.input, config.output);

    if let Err(err) = sceneview_export::convert_obj(&cli.input, &config.output, &config) {
        // A partially written file must not be picked up by the viewer
        if let ExportError::Io { path, .. } = &err
            && path == &config.output
            && config.output.exists()
        {
            let _ = std::fs::remove_file(&config.output);
        }
        return Err(err).with_context(|| format!("Failed to convert {:?}", cli.input));
    }

    tracing::info!("Done!");
    Ok(())
}
