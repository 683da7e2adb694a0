//! Configuration loading and typed config structures for SciBowl Arena.
//!
//! The canonical configuration lives in `scibowl-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure and a loader that reads the file. Every field has a
//! default, so a missing file or a partial file is valid.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {key}: {value}")]
    InvalidOverride {
        /// The environment variable name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level application configuration.
///
/// Mirrors the structure of `scibowl-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArenaConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Token signing and lifetimes.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Startup data.
    #[serde(default)]
    pub data: DataConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Avatar rendering.
    #[serde(default)]
    pub avatar: AvatarConfig,
}

impl ArenaConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `SCIBOWL_HOST` overrides `server.host`
    /// - `SCIBOWL_PORT` overrides `server.port`
    /// - `SCIBOWL_JWT_SECRET` overrides `auth.jwt_secret`
    /// - `SCIBOWL_SEED_FILE` overrides `data.seed_file`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidOverride`] if an override is malformed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Like [`Self::from_file`], but a missing file yields the defaults
    /// (still subject to environment overrides).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        tracing::info!(path = %path.display(), "config file not found, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override values with environment variables when set.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Override values from an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("SCIBOWL_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("SCIBOWL_PORT") {
            self.server.port = val.trim().parse().map_err(|_parse_err| {
                ConfigError::InvalidOverride {
                    key: "SCIBOWL_PORT",
                    value: val.clone(),
                }
            })?;
        }
        if let Some(val) = lookup("SCIBOWL_JWT_SECRET") {
            self.auth.jwt_secret = val;
        }
        if let Some(val) = lookup("SCIBOWL_SEED_FILE") {
            self.data.seed_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Token signing and lifetimes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for bearer tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Access token lifetime in minutes.
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: i64,

    /// Refresh token lifetime in days.
    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: i64,
}

impl AuthConfig {
    /// Whether the secret is still the built-in development value.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == default_jwt_secret()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            access_token_minutes: default_access_token_minutes(),
            refresh_token_days: default_refresh_token_days(),
        }
    }
}

/// Startup data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DataConfig {
    /// JSON seed file loaded into the catalog at startup.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG`
    /// is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

/// Avatar rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AvatarConfig {
    /// Edge length when a request does not specify one.
    #[serde(default = "default_avatar_size")]
    pub default_size: u32,

    /// Rendered avatars kept in memory.
    #[serde(default = "default_avatar_cache")]
    pub cache_capacity: usize,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            default_size: default_avatar_size(),
            cache_capacity: default_avatar_cache(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8000
}

fn default_jwt_secret() -> String {
    String::from("scibowl-dev-secret-change-me")
}

const fn default_access_token_minutes() -> i64 {
    60
}

const fn default_refresh_token_days() -> i64 {
    7
}

fn default_log_level() -> String {
    String::from("info")
}

const fn default_avatar_size() -> u32 {
    64
}

const fn default_avatar_cache() -> usize {
    5000
}
