//! Configuration management for campus-bus
//!
//! Config stored at: ~/.config/campus-bus/config.json

use campus_bus_types::{ConfigError, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Whether the driver broadcaster sends reports or only logs them
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    #[default]
    Sync,
    LogOnly,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Sync => write!(f, "sync"),
            SyncMode::LogOnly => write!(f, "log-only"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the fleet service listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Base URL clients use to reach the fleet service
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Fleet poll interval for watchers
    #[serde(default = "default_interval_secs")]
    pub poll_interval_secs: u64,

    /// Position publish interval for drivers
    #[serde(default = "default_interval_secs")]
    pub broadcast_interval_secs: u64,

    /// A bus whose last report is older than this is flagged stale
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,

    /// Capacity assumed for buses that are not on the roster
    #[serde(default = "default_capacity")]
    pub default_capacity: u32,

    #[serde(default)]
    pub sync_mode: SyncMode,

    /// TOML file with routes and roster; built-in DIU data when unset
    #[serde(default)]
    pub seed_file: Option<PathBuf>,

    #[serde(default = "default_assistant_model")]
    pub assistant_model: String,

    #[serde(default = "default_assistant_timeout_secs")]
    pub assistant_timeout_secs: u64,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_interval_secs() -> u64 {
    5
}

fn default_stale_after_secs() -> u64 {
    120
}

fn default_capacity() -> u32 {
    50
}

fn default_assistant_model() -> String {
    campus_bus_assistant::DEFAULT_MODEL.to_string()
}

fn default_assistant_timeout_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            server_url: default_server_url(),
            poll_interval_secs: default_interval_secs(),
            broadcast_interval_secs: default_interval_secs(),
            stale_after_secs: default_stale_after_secs(),
            default_capacity: default_capacity(),
            sync_mode: SyncMode::default(),
            seed_file: None,
            assistant_model: default_assistant_model(),
            assistant_timeout_secs: default_assistant_timeout_secs(),
            output_format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("campus-bus");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from a specific file, or create default if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Apply `CAMPUS_BUS_BIND` and `CAMPUS_BUS_SERVER_URL` overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(bind) = non_empty_var("CAMPUS_BUS_BIND") {
            info!("Using bind address from CAMPUS_BUS_BIND: {bind}");
            self.bind_address = bind;
        }
        if let Some(url) = non_empty_var("CAMPUS_BUS_SERVER_URL") {
            info!("Using server URL from CAMPUS_BUS_SERVER_URL: {url}");
            self.server_url = url;
        }
        self
    }

    /// Assistant API key from `GEMINI_API_KEY` or `API_KEY`. Never persisted.
    pub fn assistant_api_key() -> Option<String> {
        let key = non_empty_var("GEMINI_API_KEY").or_else(|| non_empty_var("API_KEY"));
        if key.is_none() {
            warn!("No assistant API key set, assistant will answer with the offline message");
        }
        key
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn broadcast_interval(&self) -> Duration {
        Duration::from_secs(self.broadcast_interval_secs.max(1))
    }

    /// Saturates at `TimeDelta::MAX` for values chrono cannot represent
    pub fn stale_after(&self) -> chrono::Duration {
        i64::try_from(self.stale_after_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn assistant_timeout(&self) -> Duration {
        Duration::from_secs(self.assistant_timeout_secs)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Campus Bus Configuration")?;
        writeln!(f, "========================")?;
        writeln!(f)?;
        writeln!(f, "Bind address:       {}", self.bind_address)?;
        writeln!(f, "Server URL:         {}", self.server_url)?;
        writeln!(f, "Poll interval:      {}s", self.poll_interval_secs)?;
        writeln!(f, "Broadcast interval: {}s", self.broadcast_interval_secs)?;
        writeln!(f, "Stale after:        {}s", self.stale_after_secs)?;
        writeln!(f, "Default capacity:   {}", self.default_capacity)?;
        writeln!(f, "Sync mode:          {}", self.sync_mode)?;
        writeln!(
            f,
            "Seed file:          {}",
            self.seed_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(built-in)".to_string())
        )?;
        writeln!(f, "Assistant model:    {}", self.assistant_model)?;
        writeln!(f, "Assistant timeout:  {}s", self.assistant_timeout_secs)?;
        writeln!(f, "Output format:      {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:        {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(config.stale_after_secs, 120);
        assert_eq!(config.default_capacity, 50);
        assert_eq!(config.sync_mode, SyncMode::Sync);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.sync_mode = SyncMode::LogOnly;
        config.seed_file = Some(PathBuf::from("/etc/campus-bus/fleet.toml"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.sync_mode, SyncMode::LogOnly);
        assert_eq!(loaded.seed_file, config.seed_file);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "stale_after_secs": 30, "sync_mode": "log-only" }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.stale_after(), chrono::Duration::seconds(30));
        assert_eq!(config.sync_mode, SyncMode::LogOnly);
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            campus_bus_types::Error::Config(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_zero_intervals_clamped() {
        let config = Config {
            poll_interval_secs: 0,
            broadcast_interval_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.broadcast_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_huge_stale_after_saturates() {
        let config = Config {
            stale_after_secs: u64::MAX,
            ..Config::default()
        };
        assert_eq!(config.stale_after(), chrono::Duration::MAX);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "stale_after_secs": 10000000000000000 }"#).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.stale_after(), chrono::Duration::MAX);
    }
}
