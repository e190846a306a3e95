//! Command request and response — the JSON contract on the message bus.
//!
//! Field names are camelCase on the wire. Every request field is optional
//! when decoding; missing strings become empty, which the resolver treats as
//! "unspecified".

use serde::{Deserialize, Serialize};

use crate::id::{CorrelationId, DeviceId};

/// Inbound device command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommandRequest {
    /// Opaque token echoed back in the response.
    pub correlation_id: CorrelationId,
    /// Requested device type (`"lights"`, `"audio"`, …).
    pub device_type: String,
    /// Room or zone. Empty matches any location.
    pub location: String,
    /// Explicit target. Empty means "resolve by type and location".
    pub device_id: DeviceId,
    /// Verb to apply (`"on"`, `"off"`, `"play"`, …).
    pub action: String,
}

impl CommandRequest {
    /// Create a request with a freshly generated correlation id.
    #[must_use]
    pub fn new(device_type: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            correlation_id: CorrelationId::generate(),
            device_type: device_type.into(),
            action: action.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    #[must_use]
    pub fn with_device_id(mut self, device_id: impl Into<DeviceId>) -> Self {
        self.device_id = device_id.into();
        self
    }

    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<CorrelationId>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }
}

/// Outbound result of a command, correlated to its request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub correlation_id: CorrelationId,
    pub device_type: String,
    /// Resolved device, or the request's own `deviceId` when resolution failed.
    pub device_id: DeviceId,
    pub success: bool,
    pub message: String,
    /// Nanoseconds since the Unix epoch at emission time.
    pub timestamp: i64,
}
