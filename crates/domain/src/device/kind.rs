//! Device kinds and the capability table.
//!
//! Each kind lists the actions it accepts and the states it may hold. Adding
//! a new kind means adding a variant and its two table rows; the transition
//! engine reads the table and never switches on kind names.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::ValidationError;

use super::DeviceState;

/// Category of a device. Determines which actions are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Lights,
    Audio,
}

impl DeviceKind {
    /// Every known kind.
    pub const ALL: [Self; 2] = [Self::Lights, Self::Audio];

    /// The lowercase wire name (`"lights"`, `"audio"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lights => "lights",
            Self::Audio => "audio",
        }
    }

    /// Actions this kind accepts.
    #[must_use]
    pub fn capabilities(self) -> &'static [Action] {
        match self {
            Self::Lights => &[Action::On, Action::Off],
            Self::Audio => &[
                Action::On,
                Action::Off,
                Action::Play,
                Action::Stop,
                Action::Pause,
            ],
        }
    }

    /// States a device of this kind may hold.
    #[must_use]
    pub fn legal_states(self) -> &'static [DeviceState] {
        match self {
            Self::Lights => &[DeviceState::On, DeviceState::Off],
            Self::Audio => &[
                DeviceState::On,
                DeviceState::Off,
                DeviceState::Playing,
                DeviceState::Stopped,
                DeviceState::Paused,
            ],
        }
    }

    #[must_use]
    pub fn supports(self, action: Action) -> bool {
        self.capabilities().contains(&action)
    }

    #[must_use]
    pub fn allows_state(self, state: DeviceState) -> bool {
        self.legal_states().contains(&state)
    }

    /// Label used in "not found" messages (`"Light"`, `"Audio device"`).
    #[must_use]
    pub fn category(self) -> &'static str {
        match self {
            Self::Lights => "Light",
            Self::Audio => "Audio device",
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownKind(s.to_string()))
    }
}
