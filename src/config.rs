use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest a single command send may take before it is abandoned
pub const MAX_REQUEST_TIMEOUT_MS: u64 = 500;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Robot endpoint the vision process posts commands to
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Address the robot server binds
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_command_path")]
    pub command_path: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Re-send interval for an unchanged command
    #[serde(default = "default_heartbeat_ms")]
    pub heartbeat_ms: u64,

    #[serde(default = "default_speed")]
    pub default_speed: f64,

    /// Wait after a frame the detector could not deliver
    #[serde(default = "default_frame_retry_ms")]
    pub frame_retry_ms: u64,

    #[serde(default)]
    pub driver: DriverConfig,
}

/// Motor hardware selection
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DriverConfig {
    #[default]
    Simulated,
    Pwm(PwmConfig),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PwmConfig {
    #[serde(default = "default_pwm_chip")]
    pub chip: PathBuf,

    #[serde(default = "default_pwm_period_ns")]
    pub period_ns: u64,

    pub left: MotorChannels,
    pub right: MotorChannels,
}

/// PWM channel numbers wired to one motor's H-bridge inputs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MotorChannels {
    pub forward: u32,
    pub backward: u32,
}

fn default_server_url() -> String {
    "http://192.168.1.39:5000/comando".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_command_path() -> String {
    "/comando".to_string()
}

fn default_request_timeout_ms() -> u64 {
    500
}

fn default_heartbeat_ms() -> u64 {
    1000
}

fn default_speed() -> f64 {
    crate::command::DEFAULT_SPEED
}

fn default_frame_retry_ms() -> u64 {
    30
}

fn default_pwm_chip() -> PathBuf {
    PathBuf::from("/sys/class/pwm/pwmchip0")
}

fn default_pwm_period_ns() -> u64 {
    1_000_000 // 1 kHz
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            listen_addr: default_listen_addr(),
            command_path: default_command_path(),
            request_timeout_ms: default_request_timeout_ms(),
            heartbeat_ms: default_heartbeat_ms(),
            default_speed: default_speed(),
            frame_retry_ms: default_frame_retry_ms(),
            driver: DriverConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.config/gesture-drive/config.json)
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it does not exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::info!(
                "Config file not found at {:?}, creating default config",
                config_path
            );
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        tracing::info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::info!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".config")
        };

        Ok(config_dir.join("gesture-drive").join("config.json"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.server_url.starts_with("http://") {
            return Err(anyhow::anyhow!("server_url must be an http:// URL"));
        }

        if !self.command_path.starts_with('/') {
            return Err(anyhow::anyhow!("command_path must start with '/'"));
        }

        if self.request_timeout_ms == 0 || self.request_timeout_ms > MAX_REQUEST_TIMEOUT_MS {
            return Err(anyhow::anyhow!(
                "request_timeout_ms must be between 1 and {}",
                MAX_REQUEST_TIMEOUT_MS
            ));
        }

        if self.heartbeat_ms == 0 {
            return Err(anyhow::anyhow!("heartbeat_ms must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&self.default_speed) {
            return Err(anyhow::anyhow!("default_speed must be within 0.0 and 1.0"));
        }

        if let DriverConfig::Pwm(pwm) = &self.driver {
            if pwm.period_ns == 0 {
                return Err(anyhow::anyhow!("driver.period_ns must be greater than 0"));
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms)
    }

    pub fn frame_retry(&self) -> Duration {
        Duration::from_millis(self.frame_retry_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.request_timeout(), Duration::from_millis(500));
        assert_eq!(config.heartbeat(), Duration::from_secs(1));
        assert_eq!(config.command_path, "/comando");
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.listen_addr, "0.0.0.0:5000");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "server_url": "http://10.0.0.7:5000/comando",
                "driver": {
                    "kind": "pwm",
                    "left": {"forward": 0, "backward": 1},
                    "right": {"forward": 2, "backward": 3}
                }
            }"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.server_url, "http://10.0.0.7:5000/comando");
        assert_eq!(config.heartbeat_ms, 1000);
        match config.driver {
            DriverConfig::Pwm(pwm) => {
                assert_eq!(pwm.chip, PathBuf::from("/sys/class/pwm/pwmchip0"));
                assert_eq!(pwm.right.backward, 3);
            }
            other => panic!("unexpected driver {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_slow_timeout() {
        let config = Config {
            request_timeout_ms: 2000,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_speed() {
        let config = Config {
            default_speed: 1.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
