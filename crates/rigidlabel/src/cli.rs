#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use rigidlabel_client::{HttpTransformService, TransformService};
use rigidlabel_core::io::{CsvDocument, csv};
use rigidlabel_core::{
    CoordinateConverter, ImageSize, OriginMode, Side, TiePointModel, TransformMode,
};
use rigidlabel_runtime::{ImageInfo, Labeler, ServiceJob, ServiceReply, ServiceWorker};

use crate::config::AppConfig;
use crate::error::{CliError, Result};

#[derive(Debug, Parser)]
#[command(
    name = "rigidlabel",
    about = "Tie-point tools for rigid image registration",
    version
)]
pub struct Cli {
    /// Configuration file (TOML or JSON). Defaults to ./rigidlabel.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that the transform service is reachable.
    Health,

    /// Fit a transform to the tie points of a CSV file.
    Compute(ComputeArgs),

    /// Rewrite a tie-point CSV in another origin mode.
    Convert(ConvertArgs),

    /// Print the effective configuration as TOML.
    #[command(name = "show-config")]
    ShowConfig,
}

#[derive(Debug, Clone, Args)]
pub struct ComputeArgs {
    /// Tie-point CSV to fit.
    #[arg(long)]
    pub csv: PathBuf,

    /// Transform model (rigid, similarity, affine). Defaults to the configured mode.
    #[arg(long)]
    pub mode: Option<TransformMode>,

    /// Origin the request is expressed in. Defaults to the configured origin.
    #[arg(long)]
    pub origin: Option<OriginMode>,

    /// Fixed image size as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_size)]
    pub fixed_size: Option<ImageSize>,

    /// Moving image size as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_size)]
    pub moving_size: Option<ImageSize>,

    /// Fixed image path recorded in the request log.
    #[arg(long, default_value = "fixed")]
    pub fixed_image: String,

    /// Moving image path recorded in the request log.
    #[arg(long, default_value = "moving")]
    pub moving_image: String,

    /// Write the 3x3 matrix here.
    #[arg(long)]
    pub matrix_out: Option<PathBuf>,

    /// Also write the matrix to the next free <ROOT>/GT/NNNN.txt.
    #[arg(long)]
    pub gt_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: PathBuf,

    /// Target origin mode (top-left or center).
    #[arg(long)]
    pub to: OriginMode,

    /// Origin of an input file without an origin header.
    #[arg(long, default_value = "top-left")]
    pub from: OriginMode,

    #[arg(long, value_parser = parse_size)]
    pub fixed_size: Option<ImageSize>,

    #[arg(long, value_parser = parse_size)]
    pub moving_size: Option<ImageSize>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    match cli.command {
        Commands::Health => run_health(&config),
        Commands::Compute(args) => run_compute(&config, args),
        Commands::Convert(args) => run_convert(args),
        Commands::ShowConfig => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

fn run_health(config: &AppConfig) -> Result<()> {
    let service = HttpTransformService::new(&config.http_config())?;
    let info = service.health()?;
    println!(
        "{}: ok (version {}, backend {})",
        service.base_url(),
        info.version,
        info.backend
    );
    Ok(())
}

fn run_compute(config: &AppConfig, args: ComputeArgs) -> Result<()> {
    let document = csv::read(&args.csv)?;
    let origin = args.origin.unwrap_or(config.ui.origin_mode);
    let needs_sizes =
        origin.is_center() || document.header.origin_mode == Some(OriginMode::Center);
    let fixed_size = resolve_size(Side::Fixed, args.fixed_size, &document, needs_sizes)?;
    let moving_size = resolve_size(Side::Moving, args.moving_size, &document, needs_sizes)?;

    let mut settings = config.labeler_settings();
    settings.origin_mode = origin;
    if let Some(mode) = args.mode {
        settings.transform_mode = mode;
    }
    let mut labeler = Labeler::new(settings);
    labeler.load_pair(
        ImageInfo::new(args.fixed_image, fixed_size),
        ImageInfo::new(args.moving_image, moving_size),
    );
    let summary = labeler.import_document(&document)?;
    if summary.skipped > 0 {
        eprintln!("skipped {} malformed row(s)", summary.skipped);
    }

    let service: Arc<dyn TransformService> =
        Arc::new(HttpTransformService::new(&config.http_config())?);
    let mut worker = ServiceWorker::new(service);
    let (ticket, request) = labeler.begin_compute()?;
    worker.submit(ticket, ServiceJob::Compute(request));
    let completion = worker
        .wait()
        .ok_or_else(|| CliError::Worker("compute request never completed".into()))?;
    let ServiceReply::Computed(result) = completion.reply else {
        return Err(CliError::Worker("unexpected reply to compute".into()));
    };
    labeler.finish_compute(completion.ticket, result)?;
    let transform = labeler.require_transform()?;
    println!(
        "{} transform from {} pair(s), origin {}",
        labeler.transform_mode(),
        transform.num_points,
        origin
    );
    print!("{}", transform.summary());

    if let Some(path) = &args.matrix_out {
        labeler.export_matrix(path)?;
        println!("matrix written to {}", path.display());
    }
    if let Some(root) = &args.gt_root {
        let path = labeler.export_gt(root)?;
        println!("GT written to {}", path.display());
    }
    Ok(())
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let document = csv::read(&args.input)?;
    let source = document.effective_mode(args.from);
    let needs_sizes = args.to.is_center() || source.is_center();
    let fixed_size = resolve_size(Side::Fixed, args.fixed_size, &document, needs_sizes)?;
    let moving_size = resolve_size(Side::Moving, args.moving_size, &document, needs_sizes)?;

    let reader =
        CoordinateConverter::new(args.from).with_sizes(Some(fixed_size), Some(moving_size));
    let writer = CoordinateConverter::new(args.to).with_sizes(Some(fixed_size), Some(moving_size));

    let mut model = TiePointModel::new();
    for (fixed, moving) in document.canonical_pairs(&reader) {
        model.add_complete_pair(fixed, moving);
    }
    let written = csv::export(&args.output, &model, &writer)?;
    println!(
        "converted {written} pair(s) from {source} to {} into {}",
        args.to,
        args.output.display()
    );
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Parse `WIDTHxHEIGHT`.
pub fn parse_size(raw: &str) -> std::result::Result<ImageSize, String> {
    let (w, h) = raw
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {raw:?}"))?;
    let width: u32 = w
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in {raw:?}"))?;
    let height: u32 = h
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in {raw:?}"))?;
    if width == 0 || height == 0 {
        return Err(format!("image size must be non-zero, got {raw:?}"));
    }
    Ok(ImageSize::new(width, height))
}

/// Size from the command line, else from the center recorded in the file.
///
/// Without either, a zero size is used when no center offsets are involved.
fn resolve_size(
    side: Side,
    arg: Option<ImageSize>,
    document: &CsvDocument,
    required: bool,
) -> Result<ImageSize> {
    if let Some(size) = arg {
        return Ok(size);
    }
    let recorded = match side {
        Side::Fixed => document.header.fixed_center,
        Side::Moving => document.header.moving_center,
    };
    if let Some(center) = recorded {
        let width = (center.x * 2.0).round().max(0.0) as u32;
        let height = (center.y * 2.0).round().max(0.0) as u32;
        return Ok(ImageSize::new(width, height));
    }
    if required {
        return Err(CliError::invalid(format!(
            "--{side}-size is required when center coordinates are involved"
        )));
    }
    Ok(ImageSize::new(0, 0))
}
