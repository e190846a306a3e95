//! Device state — the current operational state of a device.

use serde::{Deserialize, Serialize};

/// Discrete operational state of a device.
///
/// Which variants a device may hold depends on its
/// [`DeviceKind`](super::DeviceKind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceState {
    On,
    Off,
    Playing,
    Stopped,
    Paused,
}

impl DeviceState {
    /// The lowercase wire name of the state.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Playing => "playing",
            Self::Stopped => "stopped",
            Self::Paused => "paused",
        }
    }

    /// Whether the device is actively doing something (`on` or `playing`).
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::On | Self::Playing)
    }
}

impl std::fmt::Display for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
