// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// printprep: pre-press image utilities.
//
// Entry point. Initialises logging, resolves configuration, runs one batch
// processor, and prints its output table as JSON on stdout.

mod rows;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use printprep_core::config::QrErrorCorrection;
use printprep_core::types::{ImageEnhancementInput, ImageFileInput, OutputTable, UrlInput};
use printprep_host::ManifestHost;
use printprep_imaging::{
    convert_to_cmyk, enhance_images, extract_white_underbases, generate_qr_codes,
};

#[derive(Parser)]
#[command(name = "printprep")]
#[command(author, version, about = "Pre-press image utilities")]
#[command(long_about = "
Prepares artwork for print: QR codes, contrast/saturation enhancement,
CMYK separation, and white underbase extraction for dark garments.

Rows can come from a JSON file (--rows) using the column names
url / fileName / contrast / saturation, or from positional values.

Typical use:
  printprep qr https://example.com
  printprep enhance logo.png --contrast 1.5 --saturation 1.2
  printprep cmyk --rows batch.json -o out/
  printprep underbase art.png --threshold 180
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory generated files are written to
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Base directory for relative input file names
    #[arg(short, long, global = true)]
    input_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render URLs as QR code PNGs
    Qr(QrArgs),

    /// Enhance contrast and saturation, writing RGBA TIFFs
    Enhance(EnhanceArgs),

    /// Convert images to CMYK TIFFs, keeping transparency
    Cmyk(FileArgs),

    /// Extract white underbase layers for dark garments
    Underbase(UnderbaseArgs),
}

#[derive(Args)]
struct QrArgs {
    /// JSON array of {"url": ...} rows
    #[arg(long)]
    rows: Option<PathBuf>,

    /// Error-correction level (low, medium, quartile, high)
    #[arg(long)]
    ec_level: Option<QrErrorCorrection>,

    /// Pixels per module
    #[arg(long)]
    module_size: Option<u32>,

    /// Quiet zone width in modules
    #[arg(long)]
    border: Option<u32>,

    /// URLs to encode
    urls: Vec<String>,
}

#[derive(Args)]
struct EnhanceArgs {
    /// JSON array of {"fileName", "contrast", "saturation"} rows
    #[arg(long)]
    rows: Option<PathBuf>,

    /// Contrast multiplier for positional files (1.0 = unchanged)
    #[arg(long, default_value_t = 1.0)]
    contrast: f32,

    /// Saturation multiplier for positional files (1.0 = unchanged)
    #[arg(long, default_value_t = 1.0)]
    saturation: f32,

    /// Image files to enhance
    files: Vec<String>,
}

#[derive(Args)]
struct FileArgs {
    /// JSON array of {"fileName": ...} rows
    #[arg(long)]
    rows: Option<PathBuf>,

    /// Image files to process
    files: Vec<String>,
}

#[derive(Args)]
struct UnderbaseArgs {
    #[command(flatten)]
    input: FileArgs,

    /// Luma below which pixels receive white ink (0-255)
    #[arg(long)]
    threshold: Option<u8>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = settings::resolve(&cli)?;
    let host = ManifestHost::new(&config.output_dir);
    tracing::debug!(output_dir = %config.output_dir.display(), "configuration resolved");

    let table: OutputTable = match &cli.command {
        Commands::Qr(args) => {
            let mut batch: Vec<UrlInput> = rows::load(args.rows.as_deref())?;
            batch.extend(args.urls.iter().map(UrlInput::new));
            rows::ensure_not_empty(&batch)?;
            generate_qr_codes(&batch, &config, &host)?
        }
        Commands::Enhance(args) => {
            let mut batch: Vec<ImageEnhancementInput> = rows::load(args.rows.as_deref())?;
            batch.extend(
                args.files
                    .iter()
                    .map(|f| ImageEnhancementInput::new(f, args.contrast, args.saturation)),
            );
            rows::ensure_not_empty(&batch)?;
            enhance_images(&batch, &config, &host)?
        }
        Commands::Cmyk(args) => {
            let batch = rows::file_rows(args.rows.as_deref(), &args.files)?;
            convert_to_cmyk(&batch, &config, &host)?
        }
        Commands::Underbase(args) => {
            let batch = rows::file_rows(args.input.rows.as_deref(), &args.input.files)?;
            extract_white_underbases(&batch, &config, &host)?
        }
    };

    let json = serde_json::to_string_pretty(&table).context("serializing output table")?;
    println!("{json}");
    tracing::info!(
        files = table.len(),
        manifest = %host.manifest_path().display(),
        "printprep finished"
    );
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

