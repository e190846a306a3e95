//! MQTT bus configuration.

use serde::Deserialize;

/// Broker connection and topic settings, the `[mqtt]` config section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// Broker host name or address.
    pub broker_host: String,
    pub broker_port: u16,
    /// Client identifier presented to the broker. Must be unique per broker.
    pub client_id: String,
    /// Prefix for command and response topics, see [`crate::topic`].
    pub base_topic: String,
    /// MQTT keep-alive, in seconds.
    pub keep_alive_secs: u16,
    /// How long to wait for the broker's CONNACK during startup, in seconds.
    pub connect_timeout_secs: u16,
    /// Pause between polls after a connection error, in seconds.
    pub reconnect_delay_secs: u16,
    /// Quality of service for subscriptions and responses (0, 1 or 2).
    pub qos: u8,
    /// Optional broker username.
    pub username: Option<String>,
    /// Optional broker password.
    pub password: Option<String>,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "devicehub".to_string(),
            base_topic: "devicehub".to_string(),
            keep_alive_secs: 30,
            connect_timeout_secs: 5,
            reconnect_delay_secs: 1,
            qos: 1,
            username: None,
            password: None,
        }
    }
}

impl MqttConfig {
    /// Broker credentials, if both halves are configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}
