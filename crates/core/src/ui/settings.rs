//! User settings persistence.
//!
//! The server URL and request timeout set in the settings panel are stored
//! as JSON in the user's config directory and reloaded on the next launch.

use crate::config::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User-configurable settings persisted between sessions.
///
/// Stored as JSON in the user's config directory
/// (e.g., `~/.config/leafscan/settings.json` on Linux).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the prediction server.
    pub server_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Settings {
    /// Returns the path to the settings file.
    ///
    /// Creates the config directory if it doesn't exist.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "leafscan").map(|dirs| {
            let config_dir = dirs.config_dir();
            if !config_dir.exists() {
                let _ = fs::create_dir_all(config_dir);
            }
            config_dir.join("settings.json")
        })
    }

    /// Loads settings from disk, falling back to the given config if the
    /// file is missing or unreadable.
    pub fn load(defaults: &Config) -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(&path).ok())
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_else(|| Self::with_defaults(defaults))
    }

    /// Builds settings mirroring the given config.
    pub fn with_defaults(config: &Config) -> Self {
        Self {
            server_url: config.server_url.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    /// Saves settings to disk as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory is unavailable or the file
    /// cannot be written.
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no config directory")
        })?;
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_the_config() {
        let config = Config::builder()
            .with_server_url("http://192.168.1.7:5000")
            .with_timeout_secs(45)
            .build()
            .unwrap();
        let settings = Settings::with_defaults(&config);
        assert_eq!(settings.server_url, "http://192.168.1.7:5000");
        assert_eq!(settings.timeout_secs, 45);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings = Settings {
            server_url: "http://10.0.0.1:5000".into(),
            timeout_secs: 30,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }
}
