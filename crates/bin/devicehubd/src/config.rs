//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `devicehub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use devicehub_adapter_mqtt::{MqttConfig, qos_from_level};
use devicehub_app::registry::DeviceRegistry;
use devicehub_domain::device::{Device, DeviceKind, DeviceState};
use devicehub_domain::error::ValidationError;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// MQTT broker and topic settings.
    pub mqtt: MqttConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Device seed. Empty means the built-in seed.
    pub devices: Vec<DeviceSeed>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

/// One `[[devices]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceSeed {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "DeviceSeed::default_state")]
    pub state: DeviceState,
    #[serde(default = "DeviceSeed::default_online")]
    pub online: bool,
}

impl DeviceSeed {
    fn default_state() -> DeviceState {
        DeviceState::Off
    }

    fn default_online() -> bool {
        true
    }

    fn build(&self) -> Result<Device, ValidationError> {
        Device::builder()
            .id(self.id.as_str())
            .kind(self.kind)
            .name(self.name.as_str())
            .location(self.location.as_str())
            .state(self.state)
            .online(self.online)
            .build()
    }
}

impl Config {
    /// Load configuration from `devicehub.toml` (if present), apply
    /// environment-variable overrides, then validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("devicehub.toml")?;
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
        if let Ok(val) = std::env::var("DEVICEHUB_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Ok(val) = std::env::var("DEVICEHUB_MQTT_PORT") {
            if let Ok(port) = val.parse() {
                self.mqtt.broker_port = port;
            }
        }
        if let Ok(val) = std::env::var("DEVICEHUB_BASE_TOPIC") {
            self.mqtt.base_topic = val;
        }
        if let Ok(val) = std::env::var("DEVICEHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mqtt.broker_port == 0 {
            return Err(ConfigError::Validation(
                "mqtt.broker_port must be non-zero".to_string(),
            ));
        }
        if self.mqtt.base_topic.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation(
                "mqtt.base_topic must not be empty".to_string(),
            ));
        }
        if qos_from_level(self.mqtt.qos).is_err() {
            return Err(ConfigError::Validation(format!(
                "mqtt.qos must be 0, 1 or 2, got {}",
                self.mqtt.qos
            )));
        }
        self.registry()?;
        Ok(())
    }

    /// Build the device registry from `[[devices]]`, or from the built-in
    /// seed when none are configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Seed`] for an invalid entry or a duplicate id.
    pub fn registry(&self) -> Result<DeviceRegistry, ConfigError> {
        if self.devices.is_empty() {
            return Ok(DeviceRegistry::seeded()?);
        }
        let devices = self
            .devices
            .iter()
            .map(DeviceSeed::build)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DeviceRegistry::new(devices)?)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "devicehubd=info,devicehub_app=info,devicehub_adapter_mqtt=info,rumqttc=warn"
                .to_string(),
            json: false,
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
    /// A `[[devices]]` entry is invalid or duplicated.
    #[error("invalid device seed")]
    Seed(#[from] ValidationError),
}
