//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the backend address, the last used username, the
//! inactivity timeout and where the session token is kept.
//!
//! Configuration is stored at `~/.config/passvault/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::client::DEFAULT_BASE_URL;
use crate::session::{DurableStore, FileStore, KeyringStore, INACTIVITY_TIMEOUT_MINUTES};

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "passvault";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment override for the backend address
const ENV_API_URL: &str = "PASSVAULT_API_URL";

/// Environment override for the prefilled username
const ENV_USERNAME: &str = "PASSVAULT_USERNAME";

/// Longest inactivity timeout accepted from the config file (24 hours)
const MAX_INACTIVITY_TIMEOUT_MINUTES: i64 = 24 * 60;

/// Where the session token is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub last_username: Option<String>,
    pub inactivity_timeout_minutes: i64,
    pub token_backend: TokenBackend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            last_username: None,
            inactivity_timeout_minutes: INACTIVITY_TIMEOUT_MINUTES,
            token_backend: TokenBackend::default(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults if it is missing or
    /// unreadable, then apply environment overrides.
    pub fn load() -> Self {
        let mut config = match Self::read() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        };
        config.apply_env();
        config
    }

    fn read() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.is_empty() {
                self.api_base_url = url;
            }
        }
        if let Ok(username) = std::env::var(ENV_USERNAME) {
            if !username.is_empty() {
                self.last_username = Some(username);
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Inactivity timeout, clamped to between one minute and one day.
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::minutes(
            self.inactivity_timeout_minutes
                .clamp(1, MAX_INACTIVITY_TIMEOUT_MINUTES),
        )
    }

    /// Build the durable store selected by `token_backend`.
    pub fn durable_store(&self) -> Result<Box<dyn DurableStore>> {
        Ok(match self.token_backend {
            TokenBackend::File => Box::new(FileStore::new(Self::cache_dir()?)),
            TokenBackend::Keyring => Box::new(KeyringStore::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:3000");
        assert_eq!(config.inactivity_timeout(), Duration::minutes(15));
        assert_eq!(config.token_backend, TokenBackend::File);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"token_backend": "keyring"}"#).unwrap();
        assert_eq!(config.token_backend, TokenBackend::Keyring);
        assert_eq!(config.inactivity_timeout_minutes, 15);
        assert_eq!(config.last_username, None);
    }

    #[test]
    fn test_timeout_clamped_to_one_minute() {
        let config = Config {
            inactivity_timeout_minutes: 0,
            ..Default::default()
        };
        assert_eq!(config.inactivity_timeout(), Duration::minutes(1));
    }

    #[test]
    fn test_cache_dir_needs_no_loaded_config() {
        if let Ok(dir) = Config::cache_dir() {
            assert!(dir.ends_with(APP_NAME));
        }
    }

    #[test]
    fn test_huge_timeout_clamped_to_one_day() {
        for minutes in [1_000_000_000_000, i64::MAX] {
            let config = Config {
                inactivity_timeout_minutes: minutes,
                ..Default::default()
            };
            assert_eq!(config.inactivity_timeout(), Duration::hours(24));
        }
    }
}
