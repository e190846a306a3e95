//! State transition engine.
//!
//! [`apply`] checks availability, parses the action, consults the kind's
//! capability table and moves the device to the action's target state. It is
//! the only code path that mutates a device's state.

use crate::action::Action;
use crate::device::{Device, DeviceKind, DeviceState};

/// Why a command could not be carried out.
///
/// The `Display` output is the human-readable message sent back to the
/// requester.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Resolution found no matching device.
    #[error("{category} not found")]
    DeviceNotFound { category: &'static str },

    /// The device is offline and rejects every action.
    #[error("{name} is offline")]
    DeviceOffline { name: String },

    /// The device kind does not support the action.
    #[error("{}", .action.rejected_message(.name))]
    IllegalAction { action: Action, name: String },

    /// The action string is not recognised at all.
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

impl CommandError {
    /// Not-found error labelled for the requested device type.
    ///
    /// Known kinds get their category (`"Light"`, `"Audio device"`);
    /// anything else falls back to `"Device"`.
    #[must_use]
    pub fn not_found(device_type: &str) -> Self {
        let category = device_type
            .parse::<DeviceKind>()
            .map_or("Device", DeviceKind::category);
        Self::DeviceNotFound { category }
    }
}

/// A successful transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The parsed action that was applied.
    pub action: Action,
    /// State after the transition.
    pub state: DeviceState,
    /// `false` when an idempotent action found the device already in place.
    pub changed: bool,
    pub message: String,
}

/// Apply `action` to `device`, mutating its state on success.
///
/// # Errors
///
/// - [`CommandError::DeviceOffline`] when the device is offline (checked
///   before anything else, so even unknown actions report offline).
/// - [`CommandError::UnknownAction`] when `action` is not recognised.
/// - [`CommandError::IllegalAction`] when the kind does not support it.
///
/// No error path mutates the device.
pub fn apply(device: &mut Device, action: &str) -> Result<Transition, CommandError> {
    if !device.is_online() {
        return Err(CommandError::DeviceOffline {
            name: device.name().to_string(),
        });
    }

    let action: Action = action.parse()?;
    if !device.kind().supports(action) {
        return Err(CommandError::IllegalAction {
            action,
            name: device.name().to_string(),
        });
    }

    let target = action.target_state();
    if action.is_idempotent() && device.state() == target {
        return Ok(Transition {
            action,
            state: target,
            changed: false,
            message: action.unchanged_message(device.name()),
        });
    }

    device.set_state(target);
    Ok(Transition {
        action,
        state: target,
        changed: true,
        message: action.applied_message(device.name()),
    })
}

/// Flattened result of a command: a success flag and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    #[must_use]
    pub fn failure(err: &CommandError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
        }
    }
}

impl From<Result<Transition, CommandError>> for Outcome {
    fn from(result: Result<Transition, CommandError>) -> Self {
        match result {
            Ok(transition) => Self {
                success: true,
                message: transition.message,
            },
            Err(err) => Self::failure(&err),
        }
    }
}
