//! rheed-denoise CLI: smooth and despike intensity traces.
//!
//! Commands:
//! - `denoise` — clean one or more tab-separated trace files and write
//!   `<stem>_denoised.csv` next to them (or into `--output-dir`)
//! - `sample` — write a synthetic trace in the same input format

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use rheed_denoise::csv_utils::{read_intensity_trace, write_denoised_csv, write_intensity_trace};
use rheed_denoise::synthetic::SyntheticTrace;
use rheed_denoise::{time_axis, BoundaryMode, Denoiser, EdgeRepair, FilterConfig};

#[derive(Parser)]
#[command(
    name = "rheed-denoise",
    about = "Savitzky-Golay smoothing and MAD spike repair for intensity traces"
)]
struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Denoise trace files (tab-separated `index<TAB>intensity`, no header).
    Denoise {
        /// Trace files to process.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// TOML file with filter parameters; flags below override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Smoothing window length (odd).
        #[arg(long)]
        window: Option<usize>,

        /// Polynomial order of the smoothing fit.
        #[arg(long)]
        order: Option<usize>,

        /// Spike threshold in multiples of the MAD.
        #[arg(long)]
        threshold: Option<f64>,

        /// Boundary strategy of the smoothing stage.
        #[arg(long, value_enum)]
        boundary: Option<BoundaryArg>,

        /// Also repair flagged samples near the edges.
        #[arg(long, default_value_t = false)]
        repair_edges: bool,

        /// Total measurement time in seconds, used for the time column.
        #[arg(long, default_value_t = 200.0)]
        total_time: f64,

        /// Directory for result files. Defaults to each input's directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Write a synthetic RHEED-like trace.
    Sample {
        /// Output path.
        #[arg(long, default_value = "sample.txt")]
        output: PathBuf,

        /// Number of samples.
        #[arg(long, default_value_t = 1000)]
        points: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BoundaryArg {
    Shifted,
    Truncated,
}

impl From<BoundaryArg> for BoundaryMode {
    fn from(arg: BoundaryArg) -> Self {
        match arg {
            BoundaryArg::Shifted => BoundaryMode::Shifted,
            BoundaryArg::Truncated => BoundaryMode::Truncated,
        }
    }
}

/// Command-line values that take precedence over the base configuration.
#[derive(Debug, Default, Clone, Copy)]
struct Overrides {
    window: Option<usize>,
    order: Option<usize>,
    threshold: Option<f64>,
    boundary: Option<BoundaryMode>,
    repair_edges: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Denoise {
            files,
            config,
            window,
            order,
            threshold,
            boundary,
            repair_edges,
            total_time,
            output_dir,
        } => {
            let base = load_base_config(config.as_deref())?;
            let overrides = Overrides {
                window,
                order,
                threshold,
                boundary: boundary.map(Into::into),
                repair_edges,
            };
            let config = resolve_config(base, overrides)?;

            run_denoise(&files, config, total_time, output_dir.as_deref())
        }
        Commands::Sample { output, points, seed } => {
            let params = SyntheticTrace {
                points,
                seed,
                ..Default::default()
            };
            let trace = params.generate()?;
            write_intensity_trace(&output, &trace.noisy)
                .map_err(|e| anyhow!("writing {}: {}", output.display(), e))?;
            println!("Wrote {} samples to {}", points, output.display());
            Ok(())
        }
    }
}

fn load_base_config(path: Option<&Path>) -> Result<FilterConfig> {
    match path {
        Some(path) => {
            let document =
                std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            FilterConfig::from_toml_str(&document).with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(FilterConfig::default()),
    }
}

/// Applies the command-line overrides to `base` and revalidates the result.
fn resolve_config(base: FilterConfig, overrides: Overrides) -> Result<FilterConfig> {
    let edge_repair = if overrides.repair_edges {
        EdgeRepair::AvailableNeighbors
    } else {
        base.edge_repair()
    };

    let config = FilterConfig::new(
        overrides.window.unwrap_or(base.window_length()),
        overrides.order.unwrap_or(base.poly_order()),
        overrides.threshold.unwrap_or(base.mad_threshold()),
    )?
    .with_boundary_mode(overrides.boundary.unwrap_or(base.boundary_mode()))
    .with_edge_repair(edge_repair);

    Ok(config)
}

fn run_denoise(files: &[PathBuf], config: FilterConfig, total_time: f64, output_dir: Option<&Path>) -> Result<()> {
    let denoiser = Denoiser::new(config)?;
    let mut failures = 0;

    // Unreadable files are reported and skipped; the rest are still processed
    let mut loaded = Vec::with_capacity(files.len());
    let mut signals = Vec::with_capacity(files.len());
    for path in files {
        match read_intensity_trace(path) {
            Ok(signal) => {
                loaded.push(path);
                signals.push(signal);
            }
            Err(e) => {
                eprintln!("{}: reading failed: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    let results = denoiser.denoise_batch(&signals);

    for (path, result) in loaded.into_iter().zip(results) {
        let denoised = match result {
            Ok(denoised) => denoised,
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                failures += 1;
                continue;
            }
        };

        let out_path = output_path(path, output_dir);
        let time = time_axis(total_time, denoised.denoised().len());
        if let Err(e) = write_denoised_csv(&out_path, &time, denoised.denoised()) {
            eprintln!("{}: writing {} failed: {}", path.display(), out_path.display(), e);
            failures += 1;
            continue;
        }

        println!(
            "{}: {} samples, {} flagged, {} repaired -> {}",
            path.display(),
            denoised.denoised().len(),
            denoised.repair.outlier_count(),
            denoised.repair.repaired.len(),
            out_path.display()
        );
    }

    if failures > 0 {
        bail!("{} of {} files failed", failures, files.len());
    }
    Ok(())
}

fn output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("trace");
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{}_denoised.csv", stem))
}

fn init_logging(level: &str) {
    // RUST_LOG wins over the command-line level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
