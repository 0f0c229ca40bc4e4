//! Peerscope CLI
//!
//! Command-line interface for:
//! - Mirroring a collected peering dataset so every relationship is visible
//!   from both ends (`mirror`)
//! - Rendering a mirrored dataset as a per-network relationship matrix (`table`)
//! - Both in one go, the default (`run`)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, FromArgMatches, Parser, Subcommand};
use colored::Colorize;
use peerscope_matrix::{symmetrize_with_stats, MatrixConfig, MatrixProjector};
use peerscope_model::{PeeringDataset, DEFAULT_WRAPPER_KEY};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod render;

const PEERING_DATA: &str = "./results/peering_data.json";
const MIRRORED_DATA: &str = "./results/peering_data_mirrored.json";
const PEERING_OUTPUT: &str = "./results/peerings.html";

#[derive(Parser)]
#[command(name = "peerscope")]
#[command(
    author,
    version,
    about = "Mirror peering relationships inferred from communities and plot them per network"
)]
struct Cli {
    /// Run with debug level logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Top-level key wrapping the dataset in collected peering documents
    #[arg(long, global = true, default_value = DEFAULT_WRAPPER_KEY)]
    wrapper_key: String,

    /// Defaults to `run` with default paths
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Mirror the collected data, write it, then render the peering table.
    Run(RunArgs),

    /// Only add mirrored entries and write the symmetric dataset.
    Mirror(MirrorArgs),

    /// Render the peering table from an already mirrored dataset.
    Table(TableArgs),
}

#[derive(Args, Debug, Clone)]
struct MirrorArgs {
    /// Peering data extracted from MRT files
    #[arg(long, default_value = PEERING_DATA)]
    peering_data: PathBuf,

    /// Peering data with mirror values added in
    #[arg(long, default_value = MIRRORED_DATA)]
    mirrored_output: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Generated table of discovered peerings
    #[arg(long, default_value = PEERING_OUTPUT)]
    peering_output: PathBuf,

    /// JSON file overriding focus entities, regions and colours
    #[arg(long)]
    config: Option<PathBuf>,

    /// Table output format: html|json
    #[arg(long, default_value = "html")]
    format: String,
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    #[command(flatten)]
    mirror: MirrorArgs,

    #[command(flatten)]
    output: OutputArgs,
}

impl RunArgs {
    /// `run` as if invoked with no flags, so the clap defaults are the only source.
    fn from_defaults() -> Result<Self> {
        let matches = Self::augment_args(clap::Command::new("run")).try_get_matches_from(["run"])?;
        Ok(Self::from_arg_matches(&matches)?)
    }
}

#[derive(Args, Debug, Clone)]
struct TableArgs {
    /// Mirrored peering data (wrapped or unwrapped)
    #[arg(long, default_value = MIRRORED_DATA)]
    input: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let command = match cli.command {
        Some(command) => command,
        None => Commands::Run(RunArgs::from_defaults()?),
    };
    match command {
        Commands::Run(args) => cmd_run(&args, &cli.wrapper_key),
        Commands::Mirror(args) => cmd_mirror(&args, &cli.wrapper_key).map(|_| ()),
        Commands::Table(args) => cmd_table(&args, &cli.wrapper_key),
    }
}

fn cmd_run(args: &RunArgs, wrapper_key: &str) -> Result<()> {
    // Fail on a bad config before writing anything.
    let projector = load_projector(args.output.config.as_deref())?;
    let mirrored = cmd_mirror(&args.mirror, wrapper_key)?;
    write_table(&projector, &mirrored, &args.output)
}

fn cmd_mirror(args: &MirrorArgs, wrapper_key: &str) -> Result<PeeringDataset> {
    println!(
        "{} {}",
        "Mirroring".green().bold(),
        args.peering_data.display()
    );
    let text = fs::read_to_string(&args.peering_data)
        .with_context(|| format!("failed to read {}", args.peering_data.display()))?;
    let dataset = PeeringDataset::from_json_str(&text, wrapper_key)
        .with_context(|| format!("failed to load {}", args.peering_data.display()))?;
    info!(
        entities = dataset.entities.len(),
        edges = dataset.edge_count(),
        "loaded peering data"
    );

    let (mirrored, stats) = symmetrize_with_stats(&dataset);
    println!(
        "  {} +{} entities, +{} edges, +{} peerings",
        "→".yellow(),
        stats.entities_added,
        stats.edges_added,
        stats.leaves_added
    );

    write_json(&mirrored, &args.mirrored_output)?;
    Ok(mirrored)
}

fn cmd_table(args: &TableArgs, wrapper_key: &str) -> Result<()> {
    let projector = load_projector(args.output.config.as_deref())?;
    println!("{} {}", "Plotting".green().bold(), args.input.display());
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let dataset = load_any_dataset(&text, wrapper_key)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    write_table(&projector, &dataset, &args.output)
}

fn load_projector(config: Option<&Path>) -> Result<MatrixProjector> {
    let config = match config {
        Some(path) => MatrixConfig::load(path)?,
        None => MatrixConfig::default(),
    };
    debug!(
        focus = config.focus.len(),
        regions = config.regions.len(),
        "matrix config"
    );
    Ok(MatrixProjector::new(config)?)
}

/// Mirrored output is written unwrapped; accept either shape.
fn load_any_dataset(text: &str, wrapper_key: &str) -> Result<PeeringDataset> {
    let document: serde_json::Value = serde_json::from_str(text)?;
    let wrapped = document
        .as_object()
        .map_or(false, |obj| obj.contains_key(wrapper_key));
    let dataset = if wrapped {
        PeeringDataset::from_document(&document, wrapper_key)?
    } else {
        PeeringDataset::from_value(&document)?
    };
    Ok(dataset)
}

fn write_table(
    projector: &MatrixProjector,
    dataset: &PeeringDataset,
    output: &OutputArgs,
) -> Result<()> {
    let format = render::TableFormat::parse(&output.format)?;
    let view = projector.project(dataset);
    let rendered = render::render(&view, format)?;
    write_text(&output.peering_output, &rendered)?;
    println!(
        "  {} {} tables, {} regions",
        "→".yellow(),
        view.tables.len(),
        view.header.len() - 1
    );
    Ok(())
}

fn write_json<T: Serialize>(value: &T, out: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_text(out, &json)
}

fn write_text(out: &Path, text: &str) -> Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            debug!(dir = %parent.display(), "creating output directory");
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))?;
    info!(path = %out.display(), "wrote output");
    println!("  {} {}", "→".cyan(), out.display());
    Ok(())
}
