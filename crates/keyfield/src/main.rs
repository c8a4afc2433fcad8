//! keyfield CLI — extract keypoints and render the response field of an image.

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use keyfield::app::{load_config, run_detection, DetectionConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "keyfield")]
#[command(about = "Extract normalized keypoints and a response visualization from an image")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect keypoints in an image.
    Detect(DetectArgs),
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// Path to the input image.
    #[arg(long)]
    image: Option<PathBuf>,

    /// JSON run configuration; explicit flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write keypoints (JSON). Defaults to `<stem>.keypoints.json`.
    #[arg(long)]
    out_json: Option<PathBuf>,

    /// Path to write the response visualization. Defaults to `<stem>_filtered.<ext>`.
    #[arg(long)]
    out_image: Option<PathBuf>,

    /// Log filter (e.g. `debug`, `keyfield=trace`). Falls back to RUST_LOG, then `info`.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Detect(args) => {
            let cfg = resolve_config(args)?;
            init_tracing(cfg.log_level.as_deref());
            let summary = run_detection(&cfg)?;
            println!(
                "{}x{}: {} keypoints -> {}, visualization -> {}",
                summary.width,
                summary.height,
                summary.keypoints,
                summary.output_json.display(),
                summary.output_image.display()
            );
            Ok(())
        }
    }
}

fn resolve_config(args: DetectArgs) -> Result<DetectionConfig> {
    let mut cfg = match (&args.config, &args.image) {
        (Some(path), _) => load_config(path)?,
        (None, Some(image)) => DetectionConfig::new(image),
        (None, None) => bail!("either --image or --config is required"),
    };
    if let Some(image) = args.image {
        cfg.image = image;
    }
    if let Some(p) = args.out_json {
        cfg.output_json = Some(p);
    }
    if let Some(p) = args.out_image {
        cfg.output_image = Some(p);
    }
    if let Some(level) = args.log_level {
        cfg.log_level = Some(level);
    }
    if cfg.image.as_os_str().is_empty() {
        bail!("no input image given");
    }
    Ok(cfg)
}

fn init_tracing(level: Option<&str>) {
    let filter = level
        .and_then(|l| EnvFilter::try_new(l).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
