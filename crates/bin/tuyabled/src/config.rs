//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `tuyable.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use tuyable_app::coordinator::DEFAULT_DISCONNECT_DELAY;
use tuyable_domain::device::DeviceIdentity;
use tuyable_domain::error::ValidationError;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Update coordinator settings.
    pub coordinator: CoordinatorConfig,
    /// Devices to register at startup.
    pub devices: Vec<DeviceConfig>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Update coordinator configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Seconds a device may stay disconnected before its entities become
    /// unavailable.
    pub disconnect_delay_secs: u64,
}

/// One configured device.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    pub address: String,
    pub device_id: String,
    pub category: String,
    pub product_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Config {
    /// Load configuration from `tuyable.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("tuyable.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("TUYABLE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("TUYABLE_DISCONNECT_DELAY_SECS") {
            if let Ok(secs) = val.parse() {
                self.coordinator.disconnect_delay_secs = secs;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.coordinator.disconnect_delay_secs == 0 {
            return Err(ConfigError::Validation(
                "disconnect_delay_secs must be non-zero".to_string(),
            ));
        }
        self.device_identities().map(|_| ())
    }

    #[must_use]
    pub fn disconnect_delay(&self) -> Duration {
        Duration::from_secs(self.coordinator.disconnect_delay_secs)
    }

    /// Build the identity of every configured device.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Device`] for the first device whose fields are
    /// missing or whose address is malformed.
    pub fn device_identities(&self) -> Result<Vec<DeviceIdentity>, ConfigError> {
        self.devices
            .iter()
            .map(|device| {
                let mut builder = DeviceIdentity::builder()
                    .address(&device.address)
                    .device_id(&device.device_id)
                    .category(&device.category)
                    .product_id(&device.product_id);
                if let Some(name) = &device.name {
                    builder = builder.name(name);
                }
                builder.build().map_err(|source| ConfigError::Device {
                    address: device.address.clone(),
                    source,
                })
            })
            .collect()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "tuyabled=info,tuyable_app=info".to_string(),
        }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            disconnect_delay_secs: DEFAULT_DISCONNECT_DELAY.as_secs(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
    /// A device entry that does not describe a valid device.
    #[error("invalid device {address:?}")]
    Device {
        address: String,
        #[source]
        source: ValidationError,
    },
}
