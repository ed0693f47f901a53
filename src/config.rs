//! Configuration for termlock.
//!
//! An optional TOML file at `~/.lockfile/config.toml`:
//!
//! ```toml
//! # Echo the typed password in the result line (historical behavior,
//! # see DESIGN.md). Defaults to true.
//! reveal_password = true
//! ```
//!
//! A missing or malformed file yields the defaults.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Echo the typed password back in the verification output
    pub reveal_password: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reveal_password: true,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                if let Ok(content) = fs::read_to_string(&path) {
                    if let Ok(config) = toml::from_str(&content) {
                        return config;
                    }
                }
            }
        }
        Self::default()
    }

    /// Save configuration to file
    #[allow(dead_code)]
    pub fn save(&self) -> Result<(), String> {
        if let Some(path) = Self::config_path() {
            let content = toml::to_string_pretty(self)
                .map_err(|e| format!("Failed to serialize config: {}", e))?;
            fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))?;
            Ok(())
        } else {
            Err("Could not determine config path".to_string())
        }
    }

    fn config_path() -> Option<PathBuf> {
        data_dir().map(|d| d.join("config.toml"))
    }
}

/// The fixed per-user data directory, `~/.lockfile`.
pub(crate) fn data_dir() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".lockfile"))
}

// Get home directory
pub(crate) fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reveal_password() {
        let config = Config::default();
        assert!(config.reveal_password);
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str("reveal_password = false").unwrap();
        assert!(!config.reveal_password);

        let config: Config = toml::from_str("").unwrap();
        assert!(config.reveal_password);
    }
}
