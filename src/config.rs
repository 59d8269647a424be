//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::history::DEFAULT_MAX_DEPTH;
use crate::models::rack::{MAX_RACK_HEIGHT, RACK_WIDTHS};
use crate::models::DeviceFace;

/// Undo/redo history settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of undo steps kept
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

/// Defaults applied when the user does not say otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Height of new racks in U
    #[serde(default = "default_rack_height")]
    pub rack_height: u32,
    /// Width of new racks in inches (10 or 19)
    #[serde(default = "default_rack_width")]
    pub rack_width: u32,
    /// Face used for new placements
    #[serde(default)]
    pub face: DeviceFace,
}

const fn default_rack_height() -> u32 {
    42
}

const fn default_rack_width() -> u32 {
    19
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            rack_height: default_rack_height(),
            rack_width: default_rack_width(),
            face: DeviceFace::default(),
        }
    }
}

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Directory searched for relative layout paths
    pub layouts_dir: Option<PathBuf>,
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/RackPlan/config.toml`
/// - macOS: `~/Library/Application Support/RackPlan/config.toml`
/// - Windows: `%APPDATA%\RackPlan\config.toml`
///
/// # Validation
///
/// - `history.max_depth` must be at least 1
/// - `defaults.rack_height` must be between 1 and 100
/// - `defaults.rack_width` must be 10 or 19
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Undo/redo settings
    #[serde(default)]
    pub history: HistoryConfig,
    /// Defaults for new racks and placements
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/RackPlan/`
    /// - macOS: `~/Library/Application Support/RackPlan/`
    /// - Windows: `%APPDATA%\RackPlan\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("RackPlan");

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the platform config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit path.
    ///
    /// A missing file yields the default configuration. A present file must
    /// parse and validate.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Saves configuration to the platform config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to an explicit path using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = path.with_extension("toml.tmp");

        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write temp config file: {}", temp_path.display()))?;

        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename temp config file to: {}", path.display()))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.history.max_depth == 0 {
            anyhow::bail!("history.max_depth must be at least 1");
        }

        let height = self.defaults.rack_height;
        if height == 0 || height > MAX_RACK_HEIGHT {
            anyhow::bail!(
                "defaults.rack_height must be between 1 and {MAX_RACK_HEIGHT}, got {height}"
            );
        }

        if !RACK_WIDTHS.contains(&self.defaults.rack_width) {
            anyhow::bail!(
                "defaults.rack_width must be 10 or 19, got {}",
                self.defaults.rack_width
            );
        }

        Ok(())
    }

    /// Resolves a layout path against `paths.layouts_dir` when relative.
    #[must_use]
    pub fn resolve_layout_path(&self, path: &Path) -> PathBuf {
        match &self.paths.layouts_dir {
            Some(dir) if path.is_relative() && !path.exists() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.history.max_depth, 100);
        assert_eq!(config.defaults.rack_height, 42);
        assert_eq!(config.defaults.rack_width, 19);
        assert_eq!(config.defaults.face, DeviceFace::Front);
        assert_eq!(config.paths.layouts_dir, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::new();
        config.history.max_depth = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.defaults.rack_height = 101;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.defaults.rack_width = 23;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.history.max_depth = 25;
        config.defaults.face = DeviceFace::Rear;
        config.paths.layouts_dir = Some(temp_dir.path().to_path_buf());
        config.save_to(&config_file).unwrap();

        assert!(config_file.exists());
        assert!(!config_file.with_extension("toml.tmp").exists());

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::new());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[defaults]\nrack_height = 24\n").unwrap();

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded.defaults.rack_height, 24);
        assert_eq!(loaded.defaults.rack_width, 19);
        assert_eq!(loaded.history.max_depth, 100);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[defaults]\nrack_width = 21\n").unwrap();

        let err = Config::load_from(&config_file).unwrap_err();
        assert!(format!("{err:#}").contains("rack_width"));
    }

    #[test]
    fn test_resolve_layout_path() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::new();
        assert_eq!(
            config.resolve_layout_path(Path::new("dc.json")),
            PathBuf::from("dc.json")
        );

        config.paths.layouts_dir = Some(temp_dir.path().to_path_buf());
        assert_eq!(
            config.resolve_layout_path(Path::new("dc.json")),
            temp_dir.path().join("dc.json")
        );
    }
}
