//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use regnet_ingest::IngestConfig;
use regnet_network::ExpanderConfig;
use regnet_risk::RiskConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "regnet.toml";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Graph database file
    pub database_path: PathBuf,

    /// Relationship ingestion settings
    pub ingest: IngestConfig,

    /// Network expansion settings
    pub network: ExpanderConfig,

    /// Risk detector thresholds
    pub risk: RiskConfig,

    /// Output settings
    pub settings: Settings,
}

/// Global output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enable colored output
    pub color: bool,

    /// Default output format
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// Table format
    Table,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("regnet.db"),
            ingest: IngestConfig::default(),
            network: ExpanderConfig::default(),
            risk: RiskConfig::default(),
            settings: Settings::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Json,
        }
    }
}

impl Config {
    /// Per-user configuration file path.
    pub fn user_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".regnet").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `regnet.toml` in the working
    /// directory is tried, then the per-user file, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let candidates = std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE)).chain(Self::user_path());
        for path in candidates {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Parse and validate a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.ingest
            .validate()
            .map_err(|e| CliError::Config(format!("[ingest] {}", e)))?;
        self.network
            .validate()
            .map_err(|e| CliError::Config(format!("[network] {}", e)))?;
        self.risk
            .validate()
            .map_err(|e| CliError::Config(format!("[risk] {}", e)))?;
        Ok(())
    }
}
