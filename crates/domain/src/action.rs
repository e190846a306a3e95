//! Action — a command verb carried by a request (`on`, `off`, `play`, …).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::device::DeviceState;
use crate::transition::CommandError;

/// A recognised command verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    On,
    Off,
    Play,
    Stop,
    Pause,
}

impl Action {
    /// Every recognised action.
    pub const ALL: [Self; 5] = [Self::On, Self::Off, Self::Play, Self::Stop, Self::Pause];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Play => "play",
            Self::Stop => "stop",
            Self::Pause => "pause",
        }
    }

    /// State the device ends up in after the action succeeds.
    #[must_use]
    pub fn target_state(self) -> DeviceState {
        match self {
            Self::On => DeviceState::On,
            Self::Off => DeviceState::Off,
            Self::Play => DeviceState::Playing,
            Self::Stop => DeviceState::Stopped,
            Self::Pause => DeviceState::Paused,
        }
    }

    /// Idempotent actions report "already …" instead of re-applying.
    #[must_use]
    pub fn is_idempotent(self) -> bool {
        matches!(self, Self::On | Self::Off)
    }

    /// Message for a successful transition.
    pub(crate) fn applied_message(self, name: &str) -> String {
        match self {
            Self::On => format!("{name} turned on"),
            Self::Off => format!("{name} turned off"),
            Self::Play => format!("{name} started playing"),
            Self::Stop => format!("{name} stopped"),
            Self::Pause => format!("{name} paused"),
        }
    }

    /// Message for a device that already holds the target state.
    pub(crate) fn unchanged_message(self, name: &str) -> String {
        format!("{name} is already {}", self.target_state())
    }

    /// Message for an action the device kind does not support.
    pub(crate) fn rejected_message(self, name: &str) -> String {
        match self {
            Self::On => format!("Cannot turn on {name}"),
            Self::Off => format!("Cannot turn off {name}"),
            Self::Play => format!("Cannot play on {name}"),
            Self::Stop => format!("Cannot stop {name}"),
            Self::Pause => format!("Cannot pause {name}"),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| CommandError::UnknownAction(s.to_string()))
    }
}
