//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/geotrace/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/geotrace/` (~/.config/geotrace/)
//! - State/Logs: `$XDG_STATE_HOME/geotrace/` (~/.local/state/geotrace/)
//!
//! The agent section is session-immutable: it is read once at start and
//! threaded into the components as a value. Changing the interval or the
//! battery threshold requires a stop/start cycle.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Tracking agent configuration
    #[serde(default)]
    pub agent: AgentConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tracking agent configuration
///
/// Immutable for the lifetime of a session. `device_id` and `server_url`
/// have no usable defaults; [`AgentConfig::validate`] is expected to be
/// called by the binary before the agent is started; the core pipeline
/// itself never re-validates.
#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    /// Unique device identifier reported with every sample
    #[serde(default)]
    pub device_id: String,

    /// Collector base URL (e.g., `https://collector.example.com`)
    #[serde(default)]
    pub server_url: String,

    /// Sampling interval in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Battery percentage below which fixes are dropped
    #[serde(default = "default_battery_threshold")]
    pub battery_threshold: u8,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            device_id: String::new(),
            server_url: String::new(),
            interval_ms: default_interval_ms(),
            battery_threshold: default_battery_threshold(),
        }
    }
}

fn default_interval_ms() -> u64 {
    30_000
}

fn default_battery_threshold() -> u8 {
    15
}

impl AgentConfig {
    /// Validate configuration, returning an error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.device_id.trim().is_empty() {
            return Err(Error::Config("agent.device_id must not be empty".to_string()));
        }
        if self.server_url.trim().is_empty() {
            return Err(Error::Config("agent.server_url must not be empty".to_string()));
        }
        if self.interval_ms == 0 {
            return Err(Error::Config(
                "agent.interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.battery_threshold > 100 {
            return Err(Error::Config(
                "agent.battery_threshold must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }

    /// The sampling interval as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/geotrace/config.toml` (~/.config/geotrace/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("geotrace").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/geotrace/` (~/.local/state/geotrace/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("geotrace")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/geotrace/geotrace.log` (~/.local/state/geotrace/geotrace.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("geotrace.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.agent.device_id.is_empty());
        assert_eq!(config.agent.interval_ms, 30_000);
        assert_eq!(config.agent.battery_threshold, 15);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[agent]
device_id = "field-unit-7"
server_url = "https://collector.example.com"
interval_ms = 10000
battery_threshold = 20

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.agent.device_id, "field-unit-7");
        assert_eq!(config.agent.server_url, "https://collector.example.com");
        assert_eq!(config.agent.interval_ms, 10_000);
        assert_eq!(config.agent.battery_threshold, 20);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let toml = r#"
[agent]
device_id = "field-unit-7"
server_url = "https://collector.example.com"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.agent.interval_ms, 30_000);
        assert_eq!(config.agent.battery_threshold, 15);
    }

    #[test]
    fn test_validate_rejects_empty_identity() {
        let config = AgentConfig::default();
        assert!(config.validate().is_err());

        let config = AgentConfig {
            device_id: "  ".to_string(),
            server_url: "https://collector.example.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_bounds() {
        let config = AgentConfig {
            device_id: "d".to_string(),
            server_url: "https://collector.example.com".to_string(),
            interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AgentConfig {
            device_id: "d".to_string(),
            server_url: "https://collector.example.com".to_string(),
            battery_threshold: 101,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        let config = AgentConfig {
            device_id: "field-unit-7".to_string(),
            server_url: "https://collector.example.com".to_string(),
            interval_ms: 30_000,
            battery_threshold: 15,
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.interval(), Duration::from_millis(30_000));
    }
}
