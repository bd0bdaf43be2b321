//! Application configuration.
//!
//! Stored as JSON at `~/.orchard/config.json`. Every field is optional in the
//! file; missing fields take their defaults.

use crate::consts::cli_consts::{sync, ui};
use crate::page::SlotId;
use crate::thresholds::WarningThresholds;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use std::{fs, path::Path};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Backend base URL. `None` means the local default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
    pub refresh_interval_secs: u64,
    pub notice_ttl_secs: u64,
    pub history_days: u32,
    /// Where exports are written. `None` means the working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    /// Slots mounted on the dashboard page.
    pub slots: Vec<SlotId>,
    pub thresholds: WarningThresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            refresh_interval_secs: sync::REFRESH_INTERVAL_SECS,
            notice_ttl_secs: ui::NOTICE_TTL_SECS,
            history_days: sync::HISTORY_DAYS,
            export_dir: None,
            slots: SlotId::all(),
            thresholds: WarningThresholds::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Loads the file if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, std::io::Error> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Refresh period, never shorter than one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    /// Banner lifetime, never shorter than one second.
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_ttl_secs.max(1))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Path of the configuration file, `~/.orchard/config.json`.
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home = home::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine the home directory",
        )
    })?;
    Ok(home.join(".orchard").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn config_for(backend_url: &str) -> Config {
        Config {
            backend_url: Some(backend_url.to_string()),
            ..Config::default()
        }
    }

    #[test]
    // Loading a saved configuration file should return the same configuration.
    fn test_load_recovers_saved_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = config_for("http://orchard.local:5000");
        config.slots = vec![SlotId::Temperature, SlotId::RiskLevel];
        config.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config, loaded_config);
    }

    #[test]
    // Saving a configuration should create directories if they don't exist.
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent_dir").join("config.json");

        let result = Config::default().save(&path);

        assert!(result.is_ok(), "Failed to save config");
        assert!(
            path.parent().unwrap().exists(),
            "Parent directory does not exist"
        );
    }

    #[test]
    // Saving a configuration should overwrite an existing file.
    fn test_save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config1 = config_for("http://first:5000");
        config1.save(&path).unwrap();

        let config2 = config_for("http://second:5000");
        config2.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config2, loaded_config);
    }

    #[test]
    // Loading an invalid JSON file should return an error.
    fn test_load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid_config.json");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "invalid json").unwrap();

        let result = Config::load_from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    // Missing fields fall back to their defaults.
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"refresh_interval_secs": 0, "slots": ["temperature"]}"#).unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.backend_url, None);
        assert_eq!(config.slots, vec![SlotId::Temperature]);
        assert_eq!(config.history_days, 7);
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
        assert_eq!(config.notice_ttl(), Duration::from_secs(5));
    }

    #[test]
    // A zero banner lifetime would expire banners before they are drawn.
    fn test_zero_notice_ttl_is_raised_to_one_second() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"notice_ttl_secs": 0}"#).unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.notice_ttl(), Duration::from_secs(1));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }
}
