//! Configuration loading
//!
//! Configuration is a JSON file (`terrabuild.json`) with environment-variable
//! overrides. Every field has a sensible default so a missing file is valid.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use super::constants::{
    APP_NAME_LOWER, DEFAULT_FALLBACK_REGION, ENV_CONFIG, ENV_DATA_DIR, SQLITE_BUSY_TIMEOUT_SECS,
    SQLITE_MAX_CONNECTIONS,
};

/// Database settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Directory holding the SQLite database file
    pub data_dir: PathBuf,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_connections: SQLITE_MAX_CONNECTIONS,
            busy_timeout_secs: SQLITE_BUSY_TIMEOUT_SECS,
        }
    }
}

/// Cost-model settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CostConfig {
    /// Region tried when a material cost has no row for the requested region
    pub fallback_region: String,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            fallback_region: DEFAULT_FALLBACK_REGION.to_string(),
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub costs: CostConfig,
}

impl AppConfig {
    /// Load configuration: file named by `TERRABUILD_CONFIG` (or the default
    /// path) if present, then environment overrides, then validation.
    pub fn load() -> Result<Self> {
        let path = env::var(ENV_CONFIG)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path());

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var(ENV_DATA_DIR) {
            self.database.data_dir = PathBuf::from(dir);
        }
    }

    /// Reject configurations that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            bail!("database.max_connections must be at least 1");
        }
        if self.costs.fallback_region.trim().is_empty() {
            bail!("costs.fallback_region must not be empty");
        }
        Ok(())
    }
}

fn default_config_path() -> PathBuf {
    default_data_dir().join(super::constants::CONFIG_FILE_NAME)
}

fn default_data_dir() -> PathBuf {
    env::var(ENV_DATA_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(format!(".{APP_NAME_LOWER}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.costs.fallback_region, DEFAULT_FALLBACK_REGION);
        assert_eq!(config.database.max_connections, SQLITE_MAX_CONNECTIONS);
    }

    #[test]
    fn test_zero_connections_rejected() {
        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_fallback_region_rejected() {
        let mut config = AppConfig::default();
        config.costs.fallback_region = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"costs": {"fallback_region": "Benton"}}"#).unwrap();
        assert_eq!(config.costs.fallback_region, "Benton");
        assert_eq!(config.database.busy_timeout_secs, SQLITE_BUSY_TIMEOUT_SECS);
    }
}
