//! Startup: seed data, state, and the server run loop.
//!
//! The binary loads [`ArenaConfig`], initializes logging, and hands the
//! config to [`run`].

use std::sync::Arc;

use scibowl_core::config::{ArenaConfig, ConfigError, DataConfig};
use scibowl_core::seed::{SeedData, SeedError};
use scibowl_core::store::Catalog;

use crate::server::{ServerError, start_server};
use crate::state::AppState;

/// Top-level error for the server binary.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// Seed data could not be loaded.
    #[error("seed error: {source}")]
    Seed {
        /// The underlying seed error.
        #[from]
        source: SeedError,
    },

    /// The HTTP server failed.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: ServerError,
    },
}

/// Build the startup catalog: the seed file when configured, else empty.
///
/// # Errors
///
/// Returns [`SeedError`] if the seed file cannot be read or is invalid.
pub fn load_catalog(data: &DataConfig) -> Result<Catalog, SeedError> {
    match &data.seed_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading seed data");
            SeedData::from_file(path)?.into_catalog()
        }
        None => {
            tracing::info!("no seed file configured, starting with an empty catalog");
            Ok(Catalog::new())
        }
    }
}

/// Load the catalog, build the shared state, and serve until shutdown.
///
/// # Errors
///
/// Returns a [`StartupError`] if seeding, binding, or serving fails.
pub async fn run(config: ArenaConfig) -> Result<(), StartupError> {
    if config.auth.uses_default_secret() {
        tracing::warn!("auth.jwt_secret is the development default; set SCIBOWL_JWT_SECRET");
    }
    let catalog = load_catalog(&config.data)?;
    let state: Arc<AppState> = AppState::new(catalog, &config).shared();
    start_server(&config.server, state).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn no_seed_file_is_an_empty_catalog() {
        let catalog = load_catalog(&DataConfig::default());
        assert!(matches!(catalog, Ok(c) if c.counts().tournaments == 0));
    }

    #[test]
    fn missing_seed_file_is_an_error() {
        let data = DataConfig {
            seed_file: Some(PathBuf::from("/nonexistent/seed.json")),
        };
        assert!(matches!(load_catalog(&data), Err(SeedError::Io { .. })));
    }
}
