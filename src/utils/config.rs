// Configuration utilities
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::DEFAULT_DATASET_URL;
use super::{validate_non_zero, validate_not_empty};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSection,
    pub dataset: DatasetSection,
    pub charts: ChartsSection,
    pub logging: LoggingSection,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub enable_cors: bool,
}

/// Dataset source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSection {
    pub url: String,
    pub timeout_secs: u64,
}

/// Chart series configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsSection {
    pub histogram_bins: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerSection::default(),
            dataset: DatasetSection::default(),
            charts: ChartsSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
            enable_cors: false,
        }
    }
}

impl Default for DatasetSection {
    fn default() -> Self {
        DatasetSection {
            url: DEFAULT_DATASET_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ChartsSection {
    fn default() -> Self {
        ChartsSection { histogram_bins: 20 }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        LoggingSection {
            level: "info".to_string(),
        }
    }
}

/// Represents an error while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from a JSON or YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let config: Config = match ext.as_str() {
            "json" => serde_json::from_str(&contents)?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_non_zero(self.server.port, "server.port")
            .and_then(|_| validate_non_zero(self.dataset.timeout_secs, "dataset.timeout_secs"))
            .and_then(|_| validate_non_zero(self.charts.histogram_bins, "charts.histogram_bins"))
            .and_then(|_| validate_not_empty(&self.dataset.url, "dataset.url"))
            .map_err(ConfigError::Invalid)?;

        if let Some(workers) = self.server.workers {
            validate_non_zero(workers, "server.workers").map_err(ConfigError::Invalid)?;
        }

        Ok(())
    }

    /// Fetch timeout for the dataset source
    pub fn dataset_timeout(&self) -> Duration {
        Duration::from_secs(self.dataset.timeout_secs)
    }

    /// Number of HTTP workers, defaulting to the CPU count
    pub fn workers(&self) -> usize {
        self.server.workers.unwrap_or_else(num_cpus::get)
    }

    /// Get the log level filter
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dataset.url, DEFAULT_DATASET_URL);
        assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let file = write_config(".yaml", "server:\n  port: 9090\nlogging:\n  level: debug\n");
        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.charts.histogram_bins, 20);
        assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_json_config() {
        let file = write_config(".json", r#"{"dataset": {"url": "http://localhost/iris.csv", "timeout_secs": 5}}"#);
        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.dataset.url, "http://localhost/iris.csv");
        assert_eq!(config.dataset_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = write_config(".json", r#"{"charts": {"histogram_bins": 0}}"#);
        assert!(matches!(Config::from_file(file.path()), Err(ConfigError::Invalid(_))));

        let file = write_config(".toml", "port = 1");
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
