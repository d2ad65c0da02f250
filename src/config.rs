//! Configuration loading and management
//!
//! Everything has a fixed default. At startup the defaults can be
//! overridden by a JSON file named in `SERIAL_KEYBRIDGE_CONFIG`, then by
//! individual environment variables. The button-to-key table is not
//! configurable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::port::DEFAULT_PATTERNS;

/// Environment variable naming an optional JSON config file
pub const CONFIG_ENV: &str = "SERIAL_KEYBRIDGE_CONFIG";
/// Environment variable forcing a specific port path
pub const PORT_ENV: &str = "SERIAL_KEYBRIDGE_PORT";
/// Environment variable enabling the logging-only keyboard sink
pub const DRY_RUN_ENV: &str = "SERIAL_KEYBRIDGE_DRY_RUN";

const DEFAULT_BAUD_RATE: u32 = 115_200;
const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(2);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Bridge configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Serial baud rate
    pub baud_rate: u32,

    /// Pause after opening the port while the board resets
    pub reset_delay: Duration,

    /// Upper bound on a single blocking read
    pub read_timeout: Duration,

    /// Discovery patterns, tried in order
    pub port_patterns: Vec<String>,

    /// Explicit port path; skips discovery when set
    pub port: Option<PathBuf>,

    /// Log key actions instead of synthesizing them
    pub dry_run: bool,
}

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// On-disk overrides; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    baud_rate: Option<u32>,
    reset_delay_ms: Option<u64>,
    read_timeout_ms: Option<u64>,
    port_patterns: Option<Vec<String>>,
    port: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            reset_delay: DEFAULT_RESET_DELAY,
            read_timeout: DEFAULT_READ_TIMEOUT,
            port_patterns: DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            port: None,
            dry_run: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment and defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration using `lookup` to read environment variables
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup(CONFIG_ENV).filter(|p| !p.is_empty()) {
            config.apply_file(Path::new(&path))?;
        }

        if let Some(port) = lookup(PORT_ENV).filter(|p| !p.is_empty()) {
            config.port = Some(PathBuf::from(port));
        }

        if let Some(value) = lookup(DRY_RUN_ENV) {
            config.dry_run = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let file: ConfigFile =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_owned(),
                source,
            })?;

        if let Some(baud_rate) = file.baud_rate {
            self.baud_rate = baud_rate;
        }
        if let Some(ms) = file.reset_delay_ms {
            self.reset_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = file.read_timeout_ms {
            self.read_timeout = Duration::from_millis(ms);
        }
        if let Some(patterns) = file.port_patterns {
            self.port_patterns = patterns;
        }
        if file.port.is_some() {
            self.port = file.port;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.baud_rate == 0 {
            return Err(ConfigError::Invalid("baud_rate must be positive"));
        }
        if self.read_timeout.is_zero() {
            return Err(ConfigError::Invalid("read_timeout_ms must be positive"));
        }
        if self.port.is_none() && self.port_patterns.is_empty() {
            return Err(ConfigError::Invalid("port_patterns must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn load_with(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    fn config_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_config_defaults() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.reset_delay, Duration::from_secs(2));
        assert_eq!(config.read_timeout, Duration::from_secs(1));
        assert_eq!(config.port_patterns, ["/dev/cu.usbmodem*", "/dev/cu.usbserial*"]);
        assert_eq!(config.port, None);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_env_overrides() {
        let config = load_with(&[(PORT_ENV, "/dev/cu.usbmodem101"), (DRY_RUN_ENV, "true")]).unwrap();
        assert_eq!(config.port, Some(PathBuf::from("/dev/cu.usbmodem101")));
        assert!(config.dry_run);

        let config = load_with(&[(DRY_RUN_ENV, "0")]).unwrap();
        assert!(!config.dry_run);
    }

    #[test]
    fn test_file_overrides() {
        let file = config_file(
            r#"{"baud_rate": 9600, "reset_delay_ms": 0, "read_timeout_ms": 250,
                "port_patterns": ["/dev/ttyACM*"], "port": "/dev/ttyACM0"}"#,
        );
        let path = file.path().to_string_lossy().into_owned();
        let config = load_with(&[(CONFIG_ENV, path.as_str())]).unwrap();

        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.reset_delay, Duration::ZERO);
        assert_eq!(config.read_timeout, Duration::from_millis(250));
        assert_eq!(config.port_patterns, ["/dev/ttyACM*"]);
        assert_eq!(config.port, Some(PathBuf::from("/dev/ttyACM0")));
    }

    #[test]
    fn test_env_wins_over_file() {
        let file = config_file(r#"{"port": "/dev/from-file"}"#);
        let path = file.path().to_string_lossy().into_owned();
        let config = load_with(&[(CONFIG_ENV, path.as_str()), (PORT_ENV, "/dev/from-env")]).unwrap();
        assert_eq!(config.port, Some(PathBuf::from("/dev/from-env")));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = config_file(r#"{"reset_delay_ms": 500}"#);
        let path = file.path().to_string_lossy().into_owned();
        let config = load_with(&[(CONFIG_ENV, path.as_str())]).unwrap();
        assert_eq!(config.reset_delay, Duration::from_millis(500));
        assert_eq!(config.baud_rate, 115_200);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let file = config_file(r#"{"mapping": {"B1": "q"}}"#);
        let path = file.path().to_string_lossy().into_owned();
        assert!(matches!(
            load_with(&[(CONFIG_ENV, path.as_str())]),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json").to_string_lossy().into_owned();
        assert!(matches!(
            load_with(&[(CONFIG_ENV, path.as_str())]),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_invalid_values() {
        let file = config_file(r#"{"baud_rate": 0}"#);
        let path = file.path().to_string_lossy().into_owned();
        assert!(matches!(
            load_with(&[(CONFIG_ENV, path.as_str())]),
            Err(ConfigError::Invalid(_))
        ));

        let file = config_file(r#"{"read_timeout_ms": 0}"#);
        let path = file.path().to_string_lossy().into_owned();
        assert!(matches!(
            load_with(&[(CONFIG_ENV, path.as_str())]),
            Err(ConfigError::Invalid(_))
        ));

        let file = config_file(r#"{"port_patterns": []}"#);
        let path = file.path().to_string_lossy().into_owned();
        assert!(matches!(
            load_with(&[(CONFIG_ENV, path.as_str())]),
            Err(ConfigError::Invalid(_))
        ));
    }
}
