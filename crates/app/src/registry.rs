//! Device registry — the in-memory set of known devices.
//!
//! The set is fixed once built: no device is added or removed afterwards, so
//! the map itself needs no lock. Each device sits behind its own [`Mutex`],
//! which serializes read-modify-write on that device without blocking
//! unrelated ones.
//!
//! Devices are ordered by id. When several devices match a type+location
//! query, the one with the lexicographically smallest id wins.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use devicehub_domain::device::{Device, DeviceKind};
use devicehub_domain::error::ValidationError;
use devicehub_domain::id::DeviceId;

/// One registered device.
///
/// Identity, kind and location are copied out of the device at registration
/// so lookups never take the lock; they cannot change afterwards.
#[derive(Debug)]
pub struct DeviceEntry {
    id: DeviceId,
    kind: DeviceKind,
    location: String,
    device: Mutex<Device>,
}

impl DeviceEntry {
    fn new(device: Device) -> Self {
        Self {
            id: device.id().clone(),
            kind: device.kind(),
            location: device.location().to_string(),
            device: Mutex::new(device),
        }
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
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Lock the stored device for a read-modify-write.
    ///
    /// Keep the guard short-lived and never hold it across an `.await`.
    pub fn lock(&self) -> MutexGuard<'_, Device> {
        self.device.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone the current device state.
    #[must_use]
    pub fn snapshot(&self) -> Device {
        self.lock().clone()
    }
}

/// Registry of all devices known to the service.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    entries: BTreeMap<DeviceId, DeviceEntry>,
}

impl DeviceRegistry {
    /// Build a registry from a seed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateId`] if two devices share an id,
    /// or any error from [`Device::validate`].
    pub fn new(devices: impl IntoIterator<Item = Device>) -> Result<Self, ValidationError> {
        let mut entries = BTreeMap::new();
        for device in devices {
            device.validate()?;
            if entries.contains_key(device.id()) {
                return Err(ValidationError::DuplicateId(device.id().to_string()));
            }
            entries.insert(device.id().clone(), DeviceEntry::new(device));
        }
        Ok(Self { entries })
    }

    /// Build a registry from [`crate::seed::default_devices`].
    ///
    /// # Errors
    ///
    /// Returns a validation error if the built-in seed is inconsistent.
    pub fn seeded() -> Result<Self, ValidationError> {
        Self::new(crate::seed::default_devices()?)
    }

    /// Look up a device by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DeviceEntry> {
        self.entries.get(id)
    }

    /// Iterate over every device, ordered by id.
    pub fn all(&self) -> impl Iterator<Item = &DeviceEntry> {
        self.entries.values()
    }

    /// First device of `kind`, additionally matching `location` exactly when
    /// it is non-empty.
    #[must_use]
    pub fn find_by_type_and_location(
        &self,
        kind: DeviceKind,
        location: &str,
    ) -> Option<&DeviceEntry> {
        self.all()
            .find(|entry| entry.kind == kind && (location.is_empty() || entry.location == location))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cloned state of one device.
    #[must_use]
    pub fn snapshot(&self, id: &str) -> Option<Device> {
        self.get(id).map(DeviceEntry::snapshot)
    }

    /// Cloned state of every device, ordered by id.
    #[must_use]
    pub fn snapshots(&self) -> Vec<Device> {
        self.all().map(DeviceEntry::snapshot).collect()
    }

    /// Log one line per device: name, kind, location and state.
    pub fn log_status(&self) {
        for device in self.snapshots() {
            if device.is_online() {
                tracing::info!(
                    device_id = %device.id(),
                    kind = %device.kind(),
                    location = device.location(),
                    state = %device.state(),
                    active = device.state().is_active(),
                    "{}",
                    device.name()
                );
            } else {
                tracing::info!(
                    device_id = %device.id(),
                    kind = %device.kind(),
                    location = device.location(),
                    "{} (offline)",
                    device.name()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devicehub_domain::device::DeviceState;

    fn device(id: &str, kind: DeviceKind, location: &str) -> Device {
        Device::builder()
            .id(id)
            .kind(kind)
            .name(id)
            .location(location)
            .build()
            .unwrap()
    }

    #[test]
    fn should_seed_four_default_devices() {
        let registry = DeviceRegistry::seeded().unwrap();
        assert_eq!(registry.len(), 4);
        assert!(registry.get("kitchen-lights").is_some());
        assert!(registry.get("living-room-audio").is_some());
    }

    #[test]
    fn should_reject_duplicate_ids() {
        let result = DeviceRegistry::new([
            device("lamp", DeviceKind::Lights, "hall"),
            device("lamp", DeviceKind::Lights, "attic"),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ValidationError::DuplicateId("lamp".to_string())
        );
    }

    #[test]
    fn should_return_none_for_unknown_id() {
        let registry = DeviceRegistry::seeded().unwrap();
        assert!(registry.get("garage-lights").is_none());
    }

    #[test]
    fn should_find_by_type_and_location() {
        let registry = DeviceRegistry::seeded().unwrap();
        let entry = registry
            .find_by_type_and_location(DeviceKind::Lights, "kitchen")
            .unwrap();
        assert_eq!(entry.id().as_str(), "kitchen-lights");
    }

    #[test]
    fn should_require_exact_location_match() {
        let registry = DeviceRegistry::seeded().unwrap();
        assert!(
            registry
                .find_by_type_and_location(DeviceKind::Lights, "Kitchen")
                .is_none()
        );
        assert!(
            registry
                .find_by_type_and_location(DeviceKind::Audio, "kitchen")
                .is_none()
        );
    }

    #[test]
    fn should_match_any_location_when_empty() {
        let registry = DeviceRegistry::seeded().unwrap();
        let entry = registry
            .find_by_type_and_location(DeviceKind::Audio, "")
            .unwrap();
        assert_eq!(entry.kind(), DeviceKind::Audio);
    }

    #[test]
    fn should_break_ties_by_smallest_id() {
        let registry = DeviceRegistry::new([
            device("lamp-b", DeviceKind::Lights, "hall"),
            device("lamp-a", DeviceKind::Lights, "hall"),
        ])
        .unwrap();
        let entry = registry
            .find_by_type_and_location(DeviceKind::Lights, "hall")
            .unwrap();
        assert_eq!(entry.id().as_str(), "lamp-a");
    }

    #[test]
    fn should_mutate_stored_device_through_lock() {
        let registry = DeviceRegistry::seeded().unwrap();
        let entry = registry.get("bedroom-lights").unwrap();
        devicehub_domain::transition::apply(&mut entry.lock(), "on").unwrap();
        assert_eq!(
            registry.snapshot("bedroom-lights").unwrap().state(),
            DeviceState::On
        );
    }

    #[test]
    fn should_list_snapshots_ordered_by_id() {
        let registry = DeviceRegistry::seeded().unwrap();
        let ids: Vec<String> = registry
            .snapshots()
            .iter()
            .map(|d| d.id().to_string())
            .collect();
        assert_eq!(
            ids,
            [
                "bedroom-lights",
                "kitchen-lights",
                "living-room-audio",
                "living-room-lights"
            ]
        );
    }
}
