//! Core configuration struct and loading logic.
//!
//! This module provides the main [`Config`] struct which aggregates all
//! configuration options for the cardgrid application.

use std::path::PathBuf;

use cardgrid_protocol::AutoCollapseSettings;
use cardgrid_protocol::deck::SiteMode;
use serde::{Deserialize, Serialize};

use crate::autosave::AutosaveConfig;
use crate::error::{ConfigError, Result};
use crate::persistence::{default_data_dir, find_config_file, read_config_file, write_config_file};
use crate::space::SpaceSettings;

/// The main configuration struct for the cardgrid application.
///
/// # Examples
///
/// ```
/// use cardgrid_config::{AutosaveConfig, Config};
/// use cardgrid_protocol::deck::SiteMode;
///
/// let config = Config::default();
/// assert_eq!(config.deck, SiteMode::Institutional);
/// assert!(config.auto_collapse.enabled);
///
/// let config = Config {
///     deck: SiteMode::Creator,
///     autosave: AutosaveConfig::with_debounce(500),
///     ..Config::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Crowding thresholds for the grid.
    #[serde(default)]
    pub space: SpaceSettings,

    /// Autosave behavior.
    #[serde(default)]
    pub autosave: AutosaveConfig,

    /// Auto-collapse settings used until a saved layout overrides them.
    #[serde(default)]
    pub auto_collapse: AutoCollapseSettings,

    /// Which deck of cards to show.
    #[serde(default)]
    pub deck: SiteMode,

    /// Where layouts are stored.
    ///
    /// Defaults to the platform data directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

impl Config {
    /// Creates a new default configuration.
    ///
    /// This is equivalent to `Config::default()`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the default file locations.
    ///
    /// Searches for configuration files in the following order:
    ///
    /// 1. Local: `./cardgrid.json5` or `./cardgrid.json`
    /// 2. User: `~/.config/cardgrid/config.json5` or `~/.config/cardgrid/config.json`
    ///
    /// If no configuration file is found, returns a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is found but cannot be
    /// read, parsed, or validated.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cardgrid_config::Config;
    ///
    /// # fn example() -> cardgrid_config::Result<()> {
    /// let config = Config::load()?;
    /// println!("Showing the {} deck", config.deck.name());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config: Config = read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a file as pretty-printed JSON.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to save to
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        write_config_file(path, self)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any section is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgrid_config::{AutosaveConfig, Config};
    ///
    /// let mut config = Config::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.autosave = AutosaveConfig::with_debounce(5); // Below minimum
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        self.space.validate()?;
        self.autosave.validate()?;
        validate_auto_collapse(&self.auto_collapse)?;
        Ok(())
    }

    /// Returns the directory layouts are stored in.
    ///
    /// # Errors
    ///
    /// Returns an error if no override is set and the home directory cannot
    /// be determined.
    pub fn resolved_storage_dir(&self) -> Result<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(default_data_dir()?.join("storage")),
        }
    }
}

/// Validates auto-collapse settings.
///
/// The threshold must be at least one and the percentage must lie in `(0, 1]`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidAutoCollapse`] describing the first problem.
pub fn validate_auto_collapse(settings: &AutoCollapseSettings) -> Result<()> {
    settings
        .validate()
        .map_err(|reason| ConfigError::InvalidAutoCollapse { reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.space, SpaceSettings::default());
        assert_eq!(config.autosave, AutosaveConfig::default());
        assert!(config.storage_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn new_config() {
        assert_eq!(Config::new(), Config::default());
    }

    #[test]
    fn validate_invalid_autosave() {
        let config = Config {
            autosave: AutosaveConfig::with_debounce(20_000),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidAutosave { .. })
        ));
    }

    #[test]
    fn validate_invalid_threshold() {
        let config = Config {
            auto_collapse: AutoCollapseSettings {
                threshold: 0,
                ..AutoCollapseSettings::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidAutoCollapse { .. })
        ));
    }

    #[test]
    fn validate_collapse_percentage_bounds() {
        for (pct, ok) in [(0.0, false), (0.01, true), (1.0, true), (1.5, false), (f64::NAN, false)] {
            let settings = AutoCollapseSettings {
                collapse_percentage: pct,
                ..AutoCollapseSettings::default()
            };
            assert_eq!(validate_auto_collapse(&settings).is_ok(), ok, "pct = {pct}");
        }
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json5");
        std::fs::write(
            &path,
            r#"
            {
                // Creator audience on a tablet
                deck: "creator",
                space: { min_card_width: 240 },
                autosave: { debounce_ms: 500 },
                auto_collapse: { threshold: 4, collapsePercentage: 0.5 },
                storage_dir: "/tmp/cardgrid-layouts",
            }
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.deck, SiteMode::Creator);
        assert_eq!(config.space.min_card_width, 240.0);
        assert_eq!(config.space.gap, 16.0);
        assert_eq!(config.autosave.debounce_ms, 500);
        assert_eq!(config.auto_collapse.threshold, 4);
        assert_eq!(config.auto_collapse.collapse_percentage, 0.5);
        assert!(config.auto_collapse.enabled);
        assert_eq!(
            config.resolved_storage_dir().unwrap(),
            PathBuf::from("/tmp/cardgrid-layouts")
        );
    }

    #[test]
    fn load_from_file_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json5");
        std::fs::write(&path, "{ autosave: { debounce_ms: 1 } }").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let original = Config {
            deck: SiteMode::Creator,
            autosave: AutosaveConfig::with_debounce(750),
            storage_dir: Some(dir.path().join("storage")),
            ..Default::default()
        };

        original.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(original, loaded);
    }

    #[test]
    fn storage_dir_not_serialized_when_none() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(!json.contains("storage_dir"));
    }
}
