//! SciBowl Arena server entry point.
//!
//! Reads `scibowl-config.yaml` (or the file named by `SCIBOWL_CONFIG`),
//! initializes logging, loads seed data, and serves HTTP until `Ctrl-C`.

use std::path::PathBuf;

use scibowl_core::config::{ArenaConfig, LogFormat, LoggingConfig};
use scibowl_server::StartupError;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Default config file, relative to the working directory.
const DEFAULT_CONFIG: &str = "scibowl-config.yaml";

/// Initialize the global subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, seeding, or the server fails.
#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let path = std::env::var("SCIBOWL_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    let config = ArenaConfig::load(&path)?;
    init_tracing(&config.logging);

    info!(
        config = %path.display(),
        host = %config.server.host,
        port = config.server.port,
        seed_file = ?config.data.seed_file,
        "scibowl-server starting"
    );

    scibowl_server::run(config).await
}
