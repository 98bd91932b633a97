//! Configuration management.
//!
//! Settings come from an optional TOML file, overridden by
//! `MATERIALS_MASTER_*` environment variables (nested keys use `__`, e.g.
//! `MATERIALS_MASTER_PROVIDER__TIMEOUT_SECS=10`).
//!
//! # Configuration File Format
//!
//! ```toml
//! api_key = "your-materials-project-key"
//!
//! [provider]
//! base_url = "https://api.materialsproject.org"
//! timeout_secs = 30
//! max_results = 100
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::Credential;
use crate::providers::MATERIALS_PROJECT_API_BASE;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "MP_API_KEY";

const ENV_PREFIX: &str = "MATERIALS_MASTER";

const CONFIG_FILE_NAME: &str = "materials-master.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Materials Project API key. Kept in memory only; `save` never writes it.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Search provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum documents requested per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_results: default_max_results(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn default_base_url() -> String {
    MATERIALS_PROJECT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_results() -> usize {
    100
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Load error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

/// `MATERIALS_MASTER_SECTION__KEY` overrides
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigFileError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Configuration from environment overrides and defaults only
pub fn get_config() -> Result<Config, ConfigFileError> {
    let settings = config::Config::builder()
        .add_source(environment())
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Look for a config file in the working directory, then the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|p| p.is_file())
}

/// `<config_dir>/materials-master/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("materials-master").join("config.toml"))
}

/// Pick the credential: explicit value first (flag or `MP_API_KEY`), then config
pub fn resolve_credential(explicit: Option<String>, config: &Config) -> Credential {
    let explicit = explicit.filter(|k| !k.trim().is_empty());
    Credential::from(explicit.or_else(|| config.api_key.clone()))
}
