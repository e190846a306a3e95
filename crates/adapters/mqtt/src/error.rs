//! MQTT adapter error types.

use devicehub_domain::error::HubError;

/// Errors raised by the MQTT bus.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The broker connection failed.
    #[error("MQTT connection error")]
    Connection(#[source] rumqttc::ConnectionError),

    /// The broker did not acknowledge the connection in time.
    #[error("MQTT broker did not acknowledge connection within {secs}s")]
    ConnectTimeout { secs: u16 },

    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// Failed to parse an incoming MQTT payload as a command.
    #[error("failed to parse MQTT payload")]
    PayloadParse(#[source] serde_json::Error),

    /// Failed to encode an outgoing response.
    #[error("failed to encode MQTT payload")]
    PayloadEncode(#[source] serde_json::Error),

    /// The configured QoS level is not 0, 1 or 2.
    #[error("invalid MQTT QoS level {0}")]
    InvalidQos(u8),
}

impl MqttError {
    /// Convert into a [`HubError::Bus`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> HubError {
        HubError::Bus(Box::new(self))
    }
}

impl From<MqttError> for HubError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_connect_timeout_error() {
        let err = MqttError::ConnectTimeout { secs: 5 };
        assert_eq!(
            err.to_string(),
            "MQTT broker did not acknowledge connection within 5s"
        );
    }

    #[test]
    fn should_convert_invalid_qos_to_bus_error() {
        let err: HubError = MqttError::InvalidQos(3).into();
        assert!(matches!(err, HubError::Bus(_)));
    }

    #[test]
    fn should_keep_json_error_as_source_when_payload_is_malformed() {
        let json_err = serde_json::from_slice::<serde_json::Value>(b"{\"action\":").unwrap_err();
        let err = MqttError::PayloadParse(json_err);
        assert!(std::error::Error::source(&err).is_some());
    }
}
