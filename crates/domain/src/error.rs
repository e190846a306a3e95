//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HubError`]
//! via `#[from]` when crossing a port boundary.
//!
//! Per-request failures (device not found, offline, illegal action) are not
//! errors in this sense: they are [`CommandError`](crate::transition::CommandError)s
//! and always end up as a `success = false` response.

use crate::device::{DeviceKind, DeviceState};

/// Top-level error shared by ports and services.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The message bus failed (connect, subscribe, publish).
    #[error("message bus error")]
    Bus(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invariant violations detected while building domain objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A device id must not be empty.
    #[error("device id must not be empty")]
    EmptyId,

    /// A device name must not be empty.
    #[error("device name must not be empty")]
    EmptyName,

    /// The state is not in the legal set for the device kind.
    #[error("state {state} is not legal for {kind} devices")]
    IllegalState {
        kind: DeviceKind,
        state: DeviceState,
    },

    /// Two devices share the same id.
    #[error("duplicate device id {0}")]
    DuplicateId(String),

    /// The device type string is not a known kind.
    #[error("unknown device type {0}")]
    UnknownKind(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_illegal_state_error() {
        let err = ValidationError::IllegalState {
            kind: DeviceKind::Lights,
            state: DeviceState::Playing,
        };
        assert_eq!(err.to_string(), "state playing is not legal for lights devices");
    }

    #[test]
    fn should_convert_validation_error_into_hub_error() {
        let err: HubError = ValidationError::EmptyName.into();
        assert!(matches!(err, HubError::Validation(ValidationError::EmptyName)));
    }

    #[test]
    fn should_keep_bus_error_source() {
        let io = std::io::Error::other("broker gone");
        let err = HubError::Bus(Box::new(io));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "broker gone");
    }
}
