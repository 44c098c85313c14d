//! Configuration loading for the trade CLI.
//!
//! The YAML file holds one section per provider. Only the section for the
//! provider selected on the command line has to be present and valid.
//!
//! # Usage
//!
//! ```rust,ignore
//! use limit_trader::config::{Provider, load_config};
//!
//! // $HOME/.trade.yaml, then ./.trade.yaml
//! let config = load_config(None)?;
//! let provider = config.provider(Provider::Open)?;
//! ```

mod providers;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use providers::{
    Provider, ProviderConfig, ProvidersConfig, QuikPorts, QuikSettings, TinkoffSettings,
};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".trade.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// No configuration file in any default location.
    #[error("Config file not found, searched: {searched}")]
    NotFound {
        /// Paths tried, comma separated.
        searched: String,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),

    /// Selected provider has no section.
    #[error("Missing configuration for provider '{0}'")]
    MissingProvider(Provider),

    /// Selected provider's section does not match its settings.
    #[error("Invalid configuration for provider '{provider}': {source}")]
    InvalidProvider {
        /// Provider whose section failed.
        provider: Provider,
        /// The underlying YAML error.
        source: serde_yaml_bw::Error,
    },
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Per-provider settings.
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl Config {
    /// Validated settings for `provider`.
    pub fn provider(&self, provider: Provider) -> Result<ProviderConfig, ConfigError> {
        match provider {
            Provider::Open => {
                let settings: QuikSettings = section(self.providers.open.as_ref(), provider)?;
                settings.validate()?;
                Ok(ProviderConfig::Socket(settings))
            }
            Provider::Tinkoff => {
                let settings: TinkoffSettings =
                    section(self.providers.tinkoff.as_ref(), provider)?;
                settings.validate()?;
                Ok(ProviderConfig::Rest(settings))
            }
        }
    }
}

fn section<T: DeserializeOwned>(
    raw: Option<&serde_yaml_bw::Value>,
    provider: Provider,
) -> Result<T, ConfigError> {
    let raw = raw
        .filter(|value| !value.is_null())
        .ok_or(ConfigError::MissingProvider(provider))?;
    serde_yaml_bw::from_value(raw.clone())
        .map_err(|source| ConfigError::InvalidProvider { provider, source })
}

// ============================================
// Configuration Loading
// ============================================

/// Default lookup order: `$HOME/.trade.yaml`, then `./.trade.yaml`.
#[must_use]
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);
    if let Some(home) = std::env::var_os("HOME").filter(|home| !home.is_empty()) {
        paths.push(PathBuf::from(home).join(DEFAULT_CONFIG_FILE));
    }
    paths.push(PathBuf::from(DEFAULT_CONFIG_FILE));
    paths
}

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to the first existing
///   entry of [`default_config_paths`].
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be found, read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => find_config_file(&default_config_paths())?,
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), "Loading configuration");
    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    Ok(config)
}

fn find_config_file(candidates: &[PathBuf]) -> Result<PathBuf, ConfigError> {
    candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| ConfigError::NotFound {
            searched: candidates
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
pub fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}
