//! Engine configuration.
//!
//! Read from `config.toml` in the app data directory. Every section and key
//! is optional:
//!
//! ```toml
//! [logging]
//! filter = "tablegraph_rs=debug"
//! directory = "/var/log/tablegraph"
//!
//! [csv]
//! separator = ";"
//! has_header = true
//! infer_schema_length = 1000
//!
//! [build]
//! autosave = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{app_data_dir, ensure_app_data_dir, CONFIG_FILE};
use crate::error::{Result, TableGraphError};

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "tablegraph_rs=info";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub logging: LoggingConfig,
    pub csv: CsvOptions,
    pub build: BuildConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub filter: String,
    /// Write daily rolling log files here in addition to stderr.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            directory: None,
        }
    }
}

/// CSV reading defaults for load nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub separator: char,
    pub has_header: bool,
    /// Rows scanned to infer column types. `None` scans the whole file.
    pub infer_schema_length: Option<usize>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            separator: ',',
            has_header: true,
            infer_schema_length: Some(100),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Save the graph file after every successful build.
    pub autosave: bool,
}

/// Path of the engine config file.
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

impl EngineConfig {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = config_path().ok_or_else(|| {
            TableGraphError::Config("Could not determine config path".to_string())
        })?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TableGraphError::Config(format!("Failed to read config {:?}: {}", path, e))
        })?;
        toml::from_str(&content).map_err(|e| {
            TableGraphError::Config(format!("Failed to parse config {:?}: {}", path, e))
        })
    }

    /// Load, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(CONFIG_FILE))
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| TableGraphError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            TableGraphError::Config(format!("Failed to write config {:?}: {}", path, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str("[csv]\nseparator = \";\"\n").unwrap();
        assert_eq!(config.csv.separator, ';');
        assert!(config.csv.has_header);
        assert_eq!(config.csv.infer_schema_length, Some(100));
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
        assert!(!config.build.autosave);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = EngineConfig::default();
        config.logging.directory = Some(dir.path().join("logs"));
        config.build.autosave = true;

        config.save_to(&path).unwrap();
        assert_eq!(EngineConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[csv\n").unwrap();
        assert!(matches!(
            EngineConfig::load_from(&path),
            Err(TableGraphError::Config(_))
        ));
    }
}
