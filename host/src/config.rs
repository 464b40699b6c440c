//! Host configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::LogFormat;
use crate::HostError;

/// Where the preference store lives and how the host logs.
///
/// Can be loaded from a TOML file via [`HostConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HostConfig {
    /// Directory of the LMDB environment holding preferences.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Maximum size of the LMDB memory map, in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Maximum number of named LMDB databases.
    #[serde(default = "default_max_dbs")]
    pub max_dbs: u32,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./prefs_data")
}

fn default_map_size() -> usize {
    16 * 1024 * 1024
}

fn default_max_dbs() -> u32 {
    4
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl HostConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, HostError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HostError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, HostError> {
        let config: Self = toml::from_str(s).map_err(|e| HostError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, HostError> {
        toml::to_string_pretty(self).map_err(|e| HostError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), HostError> {
        if self.map_size == 0 {
            return Err(HostError::Config("map_size must be non-zero".to_string()));
        }
        if self.max_dbs == 0 {
            return Err(HostError::Config("max_dbs must be non-zero".to_string()));
        }
        self.log_format()?;
        Ok(())
    }

    pub fn log_format(&self) -> Result<LogFormat, HostError> {
        self.log_format.parse()
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            max_dbs: default_max_dbs(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
