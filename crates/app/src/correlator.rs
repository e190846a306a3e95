//! Response correlator — assembles the response for a request.
//!
//! Purely structural: every path through the command service (resolved or
//! not, success or failure) ends here, so each handled request gets exactly
//! one response carrying its correlation id.

use devicehub_domain::command::{CommandRequest, CommandResponse};
use devicehub_domain::device::DeviceKind;
use devicehub_domain::id::DeviceId;
use devicehub_domain::time::now_unix_nanos;
use devicehub_domain::transition::Outcome;

/// Which device a response refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub device_type: String,
    pub device_id: DeviceId,
}

impl Target {
    /// The device that resolution picked.
    #[must_use]
    pub fn resolved(kind: DeviceKind, device_id: &DeviceId) -> Self {
        Self {
            device_type: kind.as_str().to_string(),
            device_id: device_id.clone(),
        }
    }

    /// Resolution failed: echo what the request asked for.
    #[must_use]
    pub fn unresolved(request: &CommandRequest) -> Self {
        Self {
            device_type: request.device_type.clone(),
            device_id: request.device_id.clone(),
        }
    }
}

/// Build the response for `request`, stamped with the current time.
#[must_use]
pub fn build_response(request: &CommandRequest, target: Target, outcome: Outcome) -> CommandResponse {
    CommandResponse {
        correlation_id: request.correlation_id.clone(),
        device_type: target.device_type,
        device_id: target.device_id,
        success: outcome.success,
        message: outcome.message,
        timestamp: now_unix_nanos(),
    }
}
