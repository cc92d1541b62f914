//! Client configuration management.
//!
//! Settings come from three layers, later ones winning:
//! built-in defaults, `~/.config/anigmaa/config.json`, and environment
//! variables (`ANIGMAA_API_URL`, `ANIGMAA_TIMEOUT_SECS`).

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "anigmaa";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// API base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8081/api/v1";

/// HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const API_URL_ENV: &str = "ANIGMAA_API_URL";
pub const TIMEOUT_ENV: &str = "ANIGMAA_TIMEOUT_SECS";

/// Where session credentials are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    #[default]
    File,
    Keyring,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "file" => Ok(StoreKind::File),
            "keyring" => Ok(StoreKind::Keyring),
            other => Err(format!("unknown session store: {}", other)),
        }
    }
}

/// Settings the API client needs at construction time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "Ignoring invalid {}", TIMEOUT_ENV),
            }
        }
        self
    }
}

/// Persisted user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub session_store: Option<StoreKind>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            Ok(serde_json::from_str(&contents).context("Failed to parse config file")?)
        } else {
            Ok(Self::default())
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn store_kind(&self) -> StoreKind {
        self.session_store.unwrap_or_default()
    }

    /// Merge file settings over defaults, then apply the environment
    pub fn client_config(&self) -> ClientConfig {
        self.client_config_with(|key| std::env::var(key).ok())
    }

    fn client_config_with(&self, lookup: impl Fn(&str) -> Option<String>) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(url) = &self.api_url {
            config.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs.filter(|s| *s > 0) {
            config.timeout = Duration::from_secs(secs);
        }
        config.apply_env(lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = Config {
            api_url: Some("https://file.example/api/v1".into()),
            timeout_secs: Some(30),
            session_store: None,
        };
        let config = file.client_config_with(|key| match key {
            API_URL_ENV => Some("https://env.example/api/v1".into()),
            _ => None,
        });
        assert_eq!(config.base_url, "https://env.example/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_timeout_is_ignored() {
        let config = Config::default().client_config_with(|key| match key {
            TIMEOUT_ENV => Some("soon".into()),
            _ => None,
        });
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anigmaa").join(CONFIG_FILE);

        assert!(Config::load_from(&path).unwrap().api_url.is_none());

        let config = Config {
            api_url: Some("https://api.example/api/v1".into()),
            timeout_secs: Some(5),
            session_store: Some(StoreKind::Keyring),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_url.as_deref(), Some("https://api.example/api/v1"));
        assert_eq!(loaded.store_kind(), StoreKind::Keyring);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains(r#""session_store": "keyring""#));
    }

    #[test]
    fn test_store_kind_parse_and_default() {
        assert_eq!("Keyring".parse::<StoreKind>(), Ok(StoreKind::Keyring));
        assert!("cloud".parse::<StoreKind>().is_err());
        assert_eq!(Config::default().store_kind(), StoreKind::File);
    }
}
