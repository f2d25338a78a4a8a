//! quakefrac - Earthquakes & Fracking dashboard server
//!
//! Loads the well-site and earthquake tables once, joins every earthquake to
//! its nearest well site, and serves the dashboard.
//!
//! # Usage
//!
//! ```bash
//! # Published tables (fetched over HTTP)
//! cargo run --release
//!
//! # Offline, with a generated dataset
//! cargo run --release -- --synthetic --seed 7
//!
//! # Load and join only, print a summary
//! cargo run --release -- check
//! ```
//!
//! # Environment Variables
//!
//! - `QUAKEFRAC_CONFIG`: Path to the TOML config file
//! - `QUAKEFRAC_SERVER_ADDR`: Override the bind address
//! - `QUAKEFRAC_CORS_ORIGINS`: Comma-separated extra CORS origins
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use quakefrac::api::{create_app, DashboardState};
use quakefrac::config::{self, DashboardConfig};
use quakefrac::dataset::Dataset;
use quakefrac::ingest::SourceFetcher;
use quakefrac::synthetic::SyntheticOptions;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "quakefrac")]
#[command(about = "Earthquakes & Fracking in the US dashboard")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8050")
    #[arg(short, long)]
    addr: Option<String>,

    /// Path to a TOML config file (skips the default search)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Use a generated dataset instead of the configured tables
    #[arg(long)]
    synthetic: bool,

    /// Seed for --synthetic
    #[arg(long, requires = "synthetic")]
    seed: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Load and join the dataset, print a summary, and exit
    Check,
}

// ============================================================================
// Task Names
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum TaskName {
    HttpServer,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskName::HttpServer => write!(f, "HttpServer"),
        }
    }
}

// ============================================================================
// Startup
// ============================================================================

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<DashboardConfig> {
    let mut config = match path {
        Some(path) => DashboardConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DashboardConfig::load(),
    };
    config.apply_env_overrides();
    Ok(config)
}

async fn load_dataset(args: &CliArgs, config: &DashboardConfig) -> Result<Dataset> {
    if args.synthetic {
        let options = SyntheticOptions {
            seed: args.seed.unwrap_or(config::defaults::SYNTHETIC_SEED),
            ..SyntheticOptions::default()
        };
        info!("📥 Input: synthetic dataset (seed {})", options.seed);
        return Dataset::synthetic(&options, &config.join)
            .context("Failed to build synthetic dataset");
    }

    info!(
        "📥 Input: {} well-site table(s) + {}",
        config.data.well_sites.len(),
        config.data.earthquakes
    );
    let fetcher = SourceFetcher::new(Duration::from_secs(config.data.http_timeout_secs))
        .context("Failed to create table fetcher")?;
    Dataset::load(config, &fetcher)
        .await
        .context("Failed to load dataset")
}

fn print_summary(dataset: &Dataset) -> Result<()> {
    let summary = serde_json::to_string_pretty(&dataset.summary())
        .context("Failed to serialize dataset summary")?;
    println!("{summary}");
    Ok(())
}

// ============================================================================
// Tasks
// ============================================================================

/// Spawn the HTTP server task into the JoinSet.
fn spawn_http_server(
    task_set: &mut JoinSet<Result<TaskName>>,
    listener: tokio::net::TcpListener,
    app: Router,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[HttpServer] Task starting");

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                info!("[HttpServer] Received shutdown signal");
            })
            .await;

        match result {
            Ok(()) => {
                info!("[HttpServer] Graceful shutdown complete");
                Ok(TaskName::HttpServer)
            }
            Err(e) => {
                error!("[HttpServer] Server error: {}", e);
                Err(anyhow::anyhow!("HTTP server error: {}", e))
            }
        }
    });
}

/// Run the supervisor loop: monitor tasks, cancel on failure.
async fn run_supervisor(
    task_set: &mut JoinSet<Result<TaskName>>,
    cancel_token: CancellationToken,
) -> Result<()> {
    info!("🔒 Supervisor: monitoring tasks");

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                info!("🛑 Supervisor: Shutdown signal received");
                break;
            }
            result = task_set.join_next() => {
                match result {
                    Some(Ok(Ok(task_name))) => {
                        info!("🔒 Supervisor: Task {} completed normally", task_name);
                    }
                    Some(Ok(Err(e))) => {
                        error!("🔒 Supervisor: Task failed with error: {}", e);
                        cancel_token.cancel();
                        return Err(e);
                    }
                    Some(Err(e)) => {
                        error!("🔒 Supervisor: Task panicked: {}", e);
                        cancel_token.cancel();
                        return Err(anyhow::anyhow!("Task panicked: {}", e));
                    }
                    None => {
                        info!("🔒 Supervisor: All tasks completed");
                        break;
                    }
                }
            }
        }
    }

    // Let the server drain in-flight requests.
    while let Some(result) = task_set.join_next().await {
        if let Ok(Err(e)) = result {
            error!("Task failed during shutdown: {}", e);
        }
    }

    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let dashboard_config = load_config(args.config.as_ref())?;
    config::init(dashboard_config);
    let config = config::get();

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  quakefrac - Earthquakes & Fracking in the US");
    info!("  Nearest well-site distance dashboard");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("");

    let dataset = load_dataset(&args, config).await?;
    info!(
        "📊 {} earthquakes joined against {} well sites ({} dropped, {} states)",
        dataset.events.len(),
        dataset.sites.len(),
        dataset.summary.dropped,
        dataset.states.len()
    );

    if matches!(args.command, Some(SubCommand::Check)) {
        return print_summary(&dataset);
    }

    let server_addr = args.addr.clone().unwrap_or_else(|| config.server.addr.clone());
    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind {server_addr}"))?;
    info!("🌐 Dashboard: http://{}", server_addr);

    let app = create_app(DashboardState::new(dataset, config.clone()));

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let mut task_set: JoinSet<Result<TaskName>> = JoinSet::new();
    spawn_http_server(&mut task_set, listener, app, cancel_token.clone());
    run_supervisor(&mut task_set, cancel_token).await?;

    info!("");
    info!("✓ quakefrac shutdown complete");
    Ok(())
}
