//! Engine binary for the AlgoViz step engine.
//!
//! This is the main entry point that wires together configuration, the
//! three visualizer controllers, result reporting, and the observer
//! server.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `algoviz-config.yaml` (or `ALGOVIZ_CONFIG`)
//! 3. Build the result reporter and stats client
//! 4. Build the sorting, searching and pathfinding controllers
//! 5. Serve the observer API until `Ctrl-C`

mod error;
mod reporting;

use std::path::PathBuf;
use std::sync::Arc;

use algoviz_core::{AlgoVizConfig, Visualizers};
use algoviz_observer::{AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "algoviz-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the server fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    init_tracing();
    info!("algoviz-engine starting");

    run().await?;

    info!("algoviz-engine stopped");
    Ok(())
}

async fn run() -> Result<(), EngineError> {
    // 2. Load configuration.
    let config = load_config()?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        stats_enabled = config.stats.enabled,
        stats_url = %config.stats.base_url,
        "Configuration loaded"
    );

    // 3. Result reporting.
    let reporting = reporting::build(&config.stats)?;

    // 4. Visualizer controllers.
    let visualizers = Visualizers::from_config(&config, reporting.reporter)?;
    info!(
        sorting_size = config.sorting.array_size,
        searching_size = config.searching.array_size,
        grid_rows = config.pathfinding.rows,
        grid_cols = config.pathfinding.cols,
        "Visualizers ready"
    );

    // 5. Observer server.
    let state = Arc::new(AppState::new(visualizers, reporting.client));
    let server = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    algoviz_observer::start_server(&server, state).await?;
    Ok(())
}

/// Console logging filtered by `RUST_LOG` (default `info`).
///
/// `ALGOVIZ_LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("ALGOVIZ_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load configuration from `ALGOVIZ_CONFIG` or `algoviz-config.yaml`.
///
/// A missing file means defaults; environment overrides apply either way.
fn load_config() -> Result<AlgoVizConfig, EngineError> {
    let path = std::env::var("ALGOVIZ_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        let config = AlgoVizConfig::from_file(&path)?;
        info!(path = %path.display(), "Config file loaded");
        Ok(config)
    } else {
        info!(path = %path.display(), "Config file not found, using defaults");
        let mut config = AlgoVizConfig::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }
}
