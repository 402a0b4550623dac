use anyhow::{Context, Result};
use clap::Parser;
use dominant_colors::{
    ColorTable, DEFAULT_MAX_DIMENSION, DEFAULT_NUM_COLORS, DEFAULT_SEED, ErrorResponse,
    KmeansConfig, PaletteOptions, PaletteResponse, entropy_seed, extract_palette_with,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Extract the dominant colors of images and name them.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of dominant colors to extract (1-10)
    #[arg(short = 'k', long, default_value_t = DEFAULT_NUM_COLORS)]
    num_colors: usize,

    /// Longest side images are reduced to before clustering
    #[arg(long, default_value_t = DEFAULT_MAX_DIMENSION)]
    max_dimension: u32,

    /// Sample every pixel instead of downscaling first
    #[arg(long)]
    no_resize: bool,

    /// Clustering seed; identical seeds give identical output
    #[arg(short, long, default_value_t = DEFAULT_SEED, conflicts_with = "random_seed")]
    seed: u64,

    /// Draw the clustering seed from the operating system
    #[arg(long)]
    random_seed: bool,

    /// Number of k-means restarts; the tightest clustering wins
    #[arg(long)]
    runs: Option<usize>,

    /// JSON file of {"name", "hex"} entries to name colors against (default: CSS3)
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

fn run(args: Args) -> Result<bool> {
    let table = match &args.table {
        Some(path) => ColorTable::from_path(path)
            .with_context(|| format!("loading color table {}", path.display()))?,
        None => ColorTable::css3().clone(),
    };

    let seed = if args.random_seed {
        entropy_seed().map_err(|e| anyhow::anyhow!("drawing random seed: {e}"))?
    } else {
        args.seed
    };

    let mut kmeans = KmeansConfig::default();
    if let Some(runs) = args.runs {
        kmeans.runs = runs.max(1);
    }

    let options = PaletteOptions {
        max_dimension: (!args.no_resize).then_some(args.max_dimension),
        seed,
        kmeans,
    };
    tracing::debug!(?options, table_len = table.len(), "starting");

    let mut all_ok = true;
    for input in &args.inputs {
        match process(input, args.num_colors, &options, &table) {
            Ok(response) => print_json(&response, args.pretty)?,
            Err(response) => {
                print_json(&response, args.pretty)?;
                all_ok = false;
            }
        }
    }

    Ok(all_ok)
}

/// Read and analyze one input; failures become error envelopes so the
/// remaining inputs still run.
fn process(
    input: &Path,
    num_colors: usize,
    options: &PaletteOptions,
    table: &ColorTable,
) -> Result<PaletteResponse, ErrorResponse> {
    let filename = input.file_name().map(|s| s.to_string_lossy().into_owned());

    let bytes = fs::read(input).map_err(|e| {
        tracing::warn!(file = %input.display(), error = %e, "failed to read input");
        ErrorResponse::read_failure(filename.clone(), &e)
    })?;

    match extract_palette_with(&bytes, num_colors, options, table) {
        Ok(colors) => {
            tracing::info!(file = %input.display(), colors = colors.len(), "extracted palette");
            Ok(PaletteResponse::new(filename, colors))
        }
        Err(e) => {
            tracing::warn!(file = %input.display(), error = %e, "failed to extract palette");
            Err(ErrorResponse::new(filename, &e))
        }
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dominant_colors=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    if run(args)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
