//! Configuration file handling for ~/.quadcover/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),

    /// Refused to replace an existing file
    #[error("Config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.quadcover/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.quadcover/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path();
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
            }
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Write a default config file to `path`.
    ///
    /// An existing file is only replaced when `force` is set.
    pub fn write_default(path: &Path, force: bool) -> Result<Self, ConfigFileError> {
        if path.exists() && !force {
            return Err(ConfigFileError::AlreadyExists(path.to_path_buf()));
        }
        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }
}

/// Get the path to the config directory (~/.quadcover).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".quadcover")
}

/// Get the path to the config file (~/.quadcover/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_RADIUS_M, DEFAULT_START_DATE};

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.coverage.radius_m, DEFAULT_RADIUS_M);
        assert_eq!(config.coverage.fine_zoom, 18);
        assert_eq!(config.coverage.coarse_zoom, 7);
        assert_eq!(config.catalog.country.as_deref(), Some("US"));
        assert_eq!(config.targets.selectors.len(), 2);
        assert_eq!(
            config.download.start.map(|d| d.to_string()).as_deref(),
            Some(DEFAULT_START_DATE)
        );
        assert!(config.logging.file.ends_with(".quadcover/quadcover.log"));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sub").join("config.ini");

        let mut config = ConfigFile::default();
        config.coverage.radius_m = 50_000.0;
        config.save_to(&config_path).unwrap();

        let loaded = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(loaded.coverage.radius_m, 50_000.0);
    }

    #[test]
    fn test_write_default_respects_force() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        ConfigFile::write_default(&config_path, false).unwrap();
        assert!(matches!(
            ConfigFile::write_default(&config_path, false),
            Err(ConfigFileError::AlreadyExists(_))
        ));
        assert!(ConfigFile::write_default(&config_path, true).is_ok());
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, "[coverage]\nfine_zoom = 99\n").unwrap();

        let result = ConfigFile::load_from(&config_path);
        assert!(matches!(result, Err(ConfigFileError::InvalidValue { .. })));
    }
}
