//! GeoStrain CLI - strain rate from GNSS velocities

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use geostrain_algorithms::strain::MethodRegistry;
use geostrain_core::io::{
    read_blacklist, read_velocities, write_geojson, write_strain_outputs, VelocityFormat,
};
use geostrain_core::vector::FeatureCollection;
use geostrain_core::{RunConfig, SingularPolicy, StrainField, VelocityField};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "geostrain")]
#[command(author, version, about = "Strain rate from GNSS station velocities", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline described by a JSON configuration file
    Run {
        /// Configuration file
        config: PathBuf,
    },
    /// Delaunay flat-earth strain for a velocity file with default settings
    Delaunay {
        /// Input velocity file
        vel_file: PathBuf,
        /// Parent output directory (results go to <out_dir>/delaunay_flat)
        out_dir: PathBuf,
        /// Velocity file format: stationvel, gmt
        #[arg(short, long, default_value = "stationvel")]
        format: String,
        /// Drop singular triangles instead of aborting
        #[arg(long)]
        skip_singular: bool,
        /// Also write strain.geojson
        #[arg(long)]
        geojson: bool,
    },
    /// Show information about a velocity file
    Info {
        /// Input velocity file
        vel_file: PathBuf,
        /// Velocity file format: stationvel, gmt
        #[arg(short, long, default_value = "stationvel")]
        format: String,
    },
    /// List available strain methods
    Methods,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set default subscriber")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn parse_format(s: &str) -> Result<VelocityFormat> {
    s.parse()
        .with_context(|| format!("Unknown velocity format: {}", s))
}

fn read_field(path: &Path, format: VelocityFormat) -> Result<VelocityField> {
    let pb = spinner("Reading velocities...");
    let field = read_velocities(path, format)
        .with_context(|| format!("Failed to read velocities from {}", path.display()))?;
    pb.finish_and_clear();
    info!("Input: {} stations from {}", field.len(), path.display());
    Ok(field)
}

fn log_removed(filter: &str, before: usize, after: usize) {
    info!(
        "{}: removed {} stations, {} remain",
        filter,
        before - after,
        after
    );
}

/// Region, sigma and blacklist filters from the run configuration
fn filter_stations(field: VelocityField, config: &RunConfig) -> Result<VelocityField> {
    let mut field = field;

    if let Some(region) = config.strain.data_region() {
        let before = field.len();
        field = field.within(&region);
        log_removed(&format!("Region {}", region), before, field.len());
    }

    let before = field.len();
    field = field.with_max_sigma(config.inputs.max_sigma);
    log_removed(
        &format!("Sigma above {}", config.inputs.max_sigma),
        before,
        field.len(),
    );

    if let Some(path) = &config.inputs.blacklist {
        let names = read_blacklist(path)
            .with_context(|| format!("Failed to read blacklist {}", path.display()))?;
        debug!("Blacklist has {} names", names.len());
        let before = field.len();
        field = field.without_names(&names);
        log_removed("Blacklist", before, field.len());
    }

    Ok(field)
}

fn log_summary(strain: &StrainField) {
    match strain.summary() {
        Some(s) => {
            info!("Triangles: {} ({} skipped)", s.triangles, s.skipped);
            info!("Max I2: {}", s.max_second_invariant);
            info!("Max rot: {}", s.max_rotation);
            info!("Min rot: {}", s.min_rotation);
        }
        None => info!("No triangles produced ({} skipped)", strain.skipped()),
    }
}

fn write_results(
    dir: &Path,
    strain: &StrainField,
    field: &VelocityField,
    geojson: bool,
) -> Result<usize> {
    let pb = spinner("Writing results...");
    let mut written = write_strain_outputs(dir, strain, field)
        .with_context(|| format!("Failed to write results to {}", dir.display()))?
        .len();
    if geojson {
        let path = dir.join("strain.geojson");
        write_geojson(&FeatureCollection::from(strain), &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written += 1;
    }
    pb.finish_and_clear();
    Ok(written)
}

/// Full pipeline for one validated configuration; returns the output directory
fn run_pipeline(config: &RunConfig, registry: &MethodRegistry) -> Result<PathBuf> {
    let method = registry
        .get(&config.method)
        .context("Failed to select strain method")?;
    info!("Method: {} ({})", method.name(), method.description());

    let field = read_field(&config.inputs.vel_file, config.inputs.format)?;
    let field = filter_stations(field, config)?;

    let start = Instant::now();
    let strain = method
        .compute(&field, &config.strain)
        .context("Strain computation failed")?;
    info!("Strain computed in {:.2?}", start.elapsed());
    log_summary(&strain);

    let out_dir = config.method_output_dir();
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let written = write_results(&out_dir, &strain, &field, config.strain.write_geojson)?;

    config
        .save_to_file(out_dir.join("config.json"))
        .context("Failed to save run configuration")?;
    debug!("Wrote {} result files", written + 1);

    Ok(out_dir)
}

fn done(out_dir: &Path, elapsed: std::time::Duration) {
    println!("Results saved to: {}", out_dir.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let registry = MethodRegistry::with_defaults();

    match cli.command {
        Commands::Run { config } => {
            let start = Instant::now();
            let run = RunConfig::from_file(&config)
                .with_context(|| format!("Failed to load configuration {}", config.display()))?;
            let out_dir = run_pipeline(&run, &registry)?;
            done(&out_dir, start.elapsed());
        }

        Commands::Delaunay {
            vel_file,
            out_dir,
            format,
            skip_singular,
            geojson,
        } => {
            let start = Instant::now();
            let mut run = RunConfig::for_file(vel_file);
            run.output_dir = out_dir;
            run.inputs.format = parse_format(&format)?;
            run.strain.write_geojson = geojson;
            if skip_singular {
                run.strain.singular_policy = SingularPolicy::Skip;
            }
            run.validate().context("Invalid arguments")?;
            let out_dir = run_pipeline(&run, &registry)?;
            done(&out_dir, start.elapsed());
        }

        Commands::Info { vel_file, format } => {
            let field = read_field(&vel_file, parse_format(&format)?)?;
            let named = field.iter().filter(|s| !s.name.is_empty()).count();

            println!("File: {}", vel_file.display());
            println!("Stations: {} ({} named)", field.len(), named);
            if let Some((lon_min, lon_max, lat_min, lat_max)) = field.bounds() {
                println!(
                    "Extent: [{:.6}/{:.6}/{:.6}/{:.6}]",
                    lon_min, lon_max, lat_min, lat_max
                );
            }
        }

        Commands::Methods => {
            for (key, method) in registry.iter() {
                if key == method.name() {
                    println!("{:<16} {}", key, method.description());
                } else {
                    println!("{:<16} alias of {}", key, method.name());
                }
            }
        }
    }

    Ok(())
}
