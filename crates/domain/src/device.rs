//! Device — a simulated controllable endpoint with a kind, a location, and a
//! mutable operational state.
//!
//! Fields are private: identity, kind and placement are fixed at build time,
//! and the operational state only moves through
//! [`transition::apply`](crate::transition::apply).

pub mod kind;
pub mod state;

pub use kind::DeviceKind;
pub use state::DeviceState;

use serde::Serialize;

use crate::error::ValidationError;
use crate::id::DeviceId;

/// A controllable device held by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    id: DeviceId,
    #[serde(rename = "type")]
    kind: DeviceKind,
    name: String,
    location: String,
    state: DeviceState,
    online: bool,
}

impl Device {
    /// Start building a device.
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Check the device invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the id or name is empty, or when the
    /// state is outside the legal set for the kind.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !self.kind.allows_state(self.state) {
            return Err(ValidationError::IllegalState {
                kind: self.kind,
                state: self.state,
            });
        }
        Ok(())
    }

    pub(crate) fn set_state(&mut self, state: DeviceState) {
        debug_assert!(self.kind.allows_state(state));
        self.state = state;
    }
}

/// Builder for [`Device`]. New devices start `off` and online.
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    kind: Option<DeviceKind>,
    name: Option<String>,
    location: Option<String>,
    state: Option<DeviceState>,
    online: Option<bool>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DeviceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: DeviceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn state(mut self, state: DeviceState) -> Self {
        self.state = Some(state);
        self
    }

    #[must_use]
    pub fn online(mut self, online: bool) -> Self {
        self.online = Some(online);
        self
    }

    /// Build and validate the device.
    ///
    /// The kind defaults to [`DeviceKind::Lights`] when not set.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if any invariant fails.
    pub fn build(self) -> Result<Device, ValidationError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            kind: self.kind.unwrap_or(DeviceKind::Lights),
            name: self.name.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            state: self.state.unwrap_or(DeviceState::Off),
            online: self.online.unwrap_or(true),
        };
        device.validate()?;
        Ok(device)
    }
}
