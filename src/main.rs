use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jpegfit::models::{
    BatchMode, BatchOptions, BatchSummary, CompressConfig, FileConfig, FileReport, OverlayConfig,
};
use jpegfit::services::{resolve_output_dir, BatchDriver, CancelToken};

#[derive(Parser)]
#[command(name = "jpegfit")]
#[command(version, about = "Fit JPEG batches under a byte budget, or darken them with a black overlay")]
struct Cli {
    /// YAML defaults file (falls back to $JPEGFIT_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Stop starting new work after this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log every encode attempt
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Directory with source JPEGs
    #[arg(short, long, default_value = ".")]
    input: PathBuf,

    /// Destination directory (default: ./output_YYMMDDhhmm)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Overwrite files in the output directory
    #[arg(long)]
    overwrite: bool,

    /// Preview work without touching files
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Recompress JPEGs to hit a target size
    Compress {
        #[command(flatten)]
        common: CommonArgs,

        /// Maximum file size in kilobytes [default: 300]
        #[arg(long)]
        target_kb: Option<u64>,

        /// Alias for --target-kb; wins when positive
        #[arg(long)]
        max_kb: Option<u64>,

        /// Starting encoder quality [default: 85]
        #[arg(long)]
        initial_quality: Option<u32>,

        /// Lowest encoder quality to try [default: 55]
        #[arg(long)]
        min_quality: Option<u32>,

        /// Quality decrement between attempts [default: 5]
        #[arg(long)]
        quality_step: Option<u32>,

        /// Minimum width in pixels, 0 for none [default: 1290]
        #[arg(long)]
        min_width: Option<u32>,

        /// Minimum height in pixels, 0 for none [default: 800]
        #[arg(long)]
        min_height: Option<u32>,

        /// Maximum width in pixels, 0 for none [default: 2380]
        #[arg(long)]
        max_width: Option<u32>,

        /// Maximum height in pixels, 0 for none [default: 1600]
        #[arg(long)]
        max_height: Option<u32>,
    },
    /// Apply a semi-transparent black overlay to every JPEG
    Overlay {
        #[command(flatten)]
        common: CommonArgs,

        /// Encoder quality for the re-encoded image [default: 95]
        #[arg(long)]
        quality: Option<u32>,

        /// Overlay opacity (0..1) [default: 0.2]
        #[arg(long)]
        alpha: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "jpegfit=debug"
    } else {
        "jpegfit=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let file_config = FileConfig::resolve(cli.config.as_deref())?;

    let (common, mode) = match cli.command {
        Commands::Compress {
            common,
            target_kb,
            max_kb,
            initial_quality,
            min_quality,
            quality_step,
            min_width,
            min_height,
            max_width,
            max_height,
        } => {
            let flags = CompressConfig {
                target_kb: max_kb.filter(|&kb| kb > 0).or(target_kb),
                initial_quality,
                min_quality,
                quality_step,
                min_width,
                min_height,
                max_width,
                max_height,
            };
            let settings = flags.or(&file_config.compress).to_settings()?;
            (common, BatchMode::Compress(settings))
        }
        Commands::Overlay {
            common,
            quality,
            alpha,
        } => {
            let flags = OverlayConfig { quality, alpha };
            let settings = flags.or(&file_config.overlay).to_settings()?;
            (common, BatchMode::Overlay(settings))
        }
    };

    let options = BatchOptions {
        output: resolve_output_dir(common.output.as_deref())?,
        input: common.input,
        recursive: common.recursive,
        overwrite: common.overwrite,
        dry_run: common.dry_run,
        mode,
    };

    let cancel = match cli.timeout {
        Some(secs) => CancelToken::with_deadline(Duration::from_secs(secs)),
        None => CancelToken::new(),
    };
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            interrupt.cancel();
        }
    });

    run_batch(options, cancel).await
}

async fn run_batch(options: BatchOptions, cancel: CancelToken) -> anyhow::Result<()> {
    if options.dry_run {
        println!("Running in dry-run mode. No files will be written.");
    }
    let input = options.input.clone();
    let driver = BatchDriver::new(options, cancel);

    let summary: BatchSummary = tokio::task::spawn_blocking(move || driver.run(print_report))
        .await
        .context("batch worker panicked")??;

    if summary.discovered() == 0 {
        println!("No JPEG files found in {}.", input.display());
        return Ok(());
    }

    println!("{}", summary);
    if summary.not_started() > 0 {
        anyhow::bail!("cancelled with {} files not processed", summary.not_started());
    }
    Ok(())
}

fn print_report(report: &FileReport) {
    if report.needs_attention() {
        eprintln!("{}", report);
    } else {
        println!("{}", report);
    }
}
