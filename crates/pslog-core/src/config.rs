//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/pslog/config.toml, or the path given with `--config`)
//!
//! The data file location can additionally be overridden per invocation by
//! the CLI. No environment variables are read.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::HoursSort;

/// Default SQLite file name inside the data directory
pub const DEFAULT_DATABASE_FILE: &str = "printer_service.db";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the SQLite data file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Data file name, or an absolute path to use instead
    #[serde(default = "default_database_file")]
    pub database_file: PathBuf,

    /// Sort applied to `printer list` when none is given
    #[serde(default)]
    pub default_sort: HoursSort,

    /// Log filter level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Write logs to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_file: default_database_file(),
            default_sort: HoursSort::None,
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        toml::from_str(toml_content).context("Failed to parse config TOML")
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Get the config file path
    pub fn config_file_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pslog")
            .join("config.toml")
    }

    /// Get the path to the SQLite data file
    ///
    /// An absolute `database_file` is used as is.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pslog")
}

fn default_database_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_FILE)
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.data_dir.ends_with("pslog"));
        assert_eq!(config.default_sort, HoursSort::None);
        assert_eq!(config.log_level, "warn");
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_database_path() {
        let config = Config {
            data_dir: PathBuf::from("/data/pslog"),
            ..Config::default()
        };
        assert_eq!(
            config.database_path(),
            PathBuf::from("/data/pslog/printer_service.db")
        );
    }

    #[test]
    fn test_absolute_database_file_wins() {
        let config = Config {
            data_dir: PathBuf::from("/data/pslog"),
            database_file: PathBuf::from("/elsewhere/shop.db"),
            ..Config::default()
        };
        assert_eq!(config.database_path(), PathBuf::from("/elsewhere/shop.db"));
    }

    #[test]
    fn test_load_from_str() {
        let toml = r#"
            data_dir = "/custom/data"
            default_sort = "desc"
            log_level = "debug"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.default_sort, HoursSort::Descending);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.database_file, PathBuf::from(DEFAULT_DATABASE_FILE));
    }

    #[test]
    fn test_load_from_str_rejects_bad_sort() {
        assert!(Config::load_from_str(r#"default_sort = "sideways""#).is_err());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.default_sort, HoursSort::None);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            database_file: PathBuf::from("shop.db"),
            default_sort: HoursSort::Ascending,
            log_level: "info".to_string(),
            log_file: Some(temp_dir.path().join("pslog.log")),
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_with_cli_override(Some(&path)).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert_eq!(loaded.database_file, config.database_file);
        assert_eq!(loaded.default_sort, HoursSort::Ascending);
        assert_eq!(loaded.log_level, "info");
        assert_eq!(loaded.log_file, config.log_file);
    }
}
