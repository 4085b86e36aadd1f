//! # Roomweave Entry Point
//!
//! Generates one map and writes its layers as JSON for a downstream
//! serializer to encode.

use clap::Parser;
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use roomweave::{generate_map, CatalogData, MapConfig, MazeResult};
use std::path::PathBuf;

/// Command line arguments for roomweave.
#[derive(Parser, Debug)]
#[command(name = "roomweave")]
#[command(about = "Generates grid-of-rooms maps as background, wall and prop tile layers")]
#[command(version)]
struct Args {
    /// JSON map configuration (defaults to the built-in 5x5 layout)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON piece catalog (defaults to procedurally drawn rooms)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Random seed for generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output file for the layer export (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Disable loop injection, producing a perfect maze
    #[arg(long)]
    no_loops: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    if let Err(e) = run(&args) {
        error!("Generation failed: {}", e);
        std::process::exit(1);
    }
}

/// Initializes `env_logger`, letting `RUST_LOG` override the command line level.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_target(false)
        .init();
}

fn run(args: &Args) -> MazeResult<()> {
    info!("Starting roomweave v{}", roomweave::VERSION);

    let mut config = match &args.config {
        Some(path) => MapConfig::from_path(path)?,
        None => MapConfig::new(),
    };
    if args.no_loops {
        config.loops_enabled = false;
    }

    let catalog = match &args.catalog {
        Some(path) => CatalogData::from_path(path)?,
        None => CatalogData::procedural(config.room_width, config.room_height, config.wall_tiles)?,
    };

    let mut rng = match args.seed {
        Some(seed) => {
            info!("Generating with seed: {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let map = generate_map(&config, &catalog, &mut rng)?;
    let export = map.export();
    let json = if args.pretty {
        export.to_json_string_pretty()?
    } else {
        export.to_json_string()?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("Wrote {}x{} map to {}", export.width, export.height, path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
