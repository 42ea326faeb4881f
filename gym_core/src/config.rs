//! Configuration file support for gymlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/gymlog/config.toml`.

use crate::{Error, Result, Units};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "gymlog";
const DB_FILE: &str = "gym_tracker.db";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub units: UnitsConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Units assumed when a workout is logged without any
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UnitsConfig {
    #[serde(default = "default_strength_units")]
    pub strength: Units,

    #[serde(default = "default_cardio_units")]
    pub cardio: Units,
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            strength: default_strength_units(),
            cardio: default_cardio_units(),
        }
    }
}

fn home_relative(dir: &str) -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(dir)
}

// Default value functions
fn default_db_path() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_relative(".local/share"));
    base.join(APP_DIR).join(DB_FILE)
}

fn default_strength_units() -> Units {
    Units::Kg
}

fn default_cardio_units() -> Units {
    Units::Kph
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        if config.units.strength.mode() != crate::Mode::Strength
            || config.units.cardio.mode() != crate::Mode::Cardio
        {
            return Err(Error::Config(format!(
                "units in {:?} do not match their mode",
                path
            )));
        }
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_relative(".config"));
        base.join(APP_DIR).join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.units.strength, Units::Kg);
        assert_eq!(config.units.cardio, Units::Kph);
        assert!(config.data.db_path.ends_with("gymlog/gym_tracker.db"));
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.units.strength = Units::Lbs;
        config.data.db_path = temp_dir.path().join("gym.db");
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[units]
cardio = "mph"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.units.cardio, Units::Mph);
        assert_eq!(config.units.strength, Units::Kg); // default
        assert_eq!(config.data, DataConfig::default());
    }

    #[test]
    fn test_mismatched_units_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[units]\nstrength = \"kph\"\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_units_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[units]\nstrength = \"stone\"\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Toml(_))));
    }
}
