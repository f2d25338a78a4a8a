//! Synthetic dataset writer
//!
//! Writes a reproducible `wells.csv` and `earthquakes.csv` pair in the same
//! shape as the published tables, for running the dashboard offline.
//!
//! # Usage
//! ```bash
//! ./synthetic-data --out data --seed 7
//! QUAKEFRAC_CONFIG=data/quakefrac.toml ./quakefrac
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use quakefrac::config::{defaults, DashboardConfig};
use quakefrac::synthetic::{generate, rows_to_csv, sites_to_csv, SyntheticOptions};

#[derive(Parser, Debug)]
#[command(name = "synthetic-data")]
#[command(about = "Generate synthetic well-site and earthquake tables for quakefrac")]
#[command(version)]
struct Args {
    /// Output directory
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = defaults::SYNTHETIC_SEED)]
    seed: u64,

    /// Well sites per shale play
    #[arg(long, default_value_t = defaults::SYNTHETIC_SITES_PER_STATE)]
    sites: usize,

    /// Earthquakes per shale play
    #[arg(long, default_value_t = defaults::SYNTHETIC_EVENTS_PER_STATE)]
    events: usize,

    /// Blank the state of every n-th earthquake (0 disables)
    #[arg(long, default_value_t = 50)]
    drop_state_every: usize,

    /// Also write a quakefrac.toml pointing at the generated files
    #[arg(long)]
    write_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let options = SyntheticOptions {
        seed: args.seed,
        sites_per_play: args.sites,
        events_per_play: args.events,
        drop_state_every: (args.drop_state_every > 0).then_some(args.drop_state_every),
    };
    let tables = generate(&options);

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create {}", args.out.display()))?;

    let wells = args.out.join("wells.csv");
    std::fs::write(&wells, sites_to_csv(&tables.sites))
        .with_context(|| format!("Failed to write {}", wells.display()))?;
    info!(path = %wells.display(), sites = tables.sites.len(), "Wrote well sites");

    let quakes = args.out.join("earthquakes.csv");
    std::fs::write(&quakes, rows_to_csv(&tables.rows))
        .with_context(|| format!("Failed to write {}", quakes.display()))?;
    info!(path = %quakes.display(), rows = tables.rows.len(), "Wrote earthquakes");

    if args.write_config {
        let mut config = DashboardConfig::default();
        config.data.well_sites = vec![wells.display().to_string()];
        config.data.earthquakes = quakes.display().to_string();
        let path = args.out.join(defaults::CONFIG_FILE_NAME);
        config
            .save_to_file(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}
