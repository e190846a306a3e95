//! Command resolver — maps a command's target description to one device.

use devicehub_domain::device::DeviceKind;
use devicehub_domain::id::DeviceId;

use crate::registry::{DeviceEntry, DeviceRegistry};

/// Resolve the target of a command.
///
/// An explicit `device_id` wins: it resolves only if the device exists and is
/// of `kind`, otherwise nothing is returned (a mismatched kind is a miss, not
/// an error). Without an id, the first device of `kind` at `location` is
/// returned, with an empty `location` matching anywhere.
#[must_use]
pub fn resolve<'a>(
    registry: &'a DeviceRegistry,
    kind: DeviceKind,
    location: &str,
    device_id: &DeviceId,
) -> Option<&'a DeviceEntry> {
    if device_id.is_empty() {
        return registry.find_by_type_and_location(kind, location);
    }

    let entry = registry.get(device_id.as_str())?;
    if entry.kind() == kind {
        Some(entry)
    } else {
        tracing::debug!(
            %device_id,
            requested = %kind,
            actual = %entry.kind(),
            "device kind mismatch, treating as not found"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> DeviceRegistry {
        DeviceRegistry::seeded().unwrap()
    }

    #[test]
    fn should_resolve_by_explicit_id() {
        let registry = registry();
        let entry = resolve(
            &registry,
            DeviceKind::Lights,
            "",
            &DeviceId::new("bedroom-lights"),
        )
        .unwrap();
        assert_eq!(entry.id().as_str(), "bedroom-lights");
    }

    #[test]
    fn should_ignore_location_when_id_given() {
        let registry = registry();
        let entry = resolve(
            &registry,
            DeviceKind::Lights,
            "kitchen",
            &DeviceId::new("bedroom-lights"),
        )
        .unwrap();
        assert_eq!(entry.id().as_str(), "bedroom-lights");
    }

    #[test]
    fn should_return_none_when_id_kind_mismatches() {
        let registry = registry();
        let entry = resolve(
            &registry,
            DeviceKind::Audio,
            "",
            &DeviceId::new("bedroom-lights"),
        );
        assert!(entry.is_none());
    }

    #[test]
    fn should_return_none_when_id_unknown() {
        let registry = registry();
        let entry = resolve(
            &registry,
            DeviceKind::Lights,
            "kitchen",
            &DeviceId::new("garage-lights"),
        );
        assert!(entry.is_none());
    }

    #[test]
    fn should_resolve_by_type_and_location_without_id() {
        let registry = registry();
        let entry = resolve(&registry, DeviceKind::Lights, "kitchen", &DeviceId::default()).unwrap();
        assert_eq!(entry.id().as_str(), "kitchen-lights");
    }

    #[test]
    fn should_return_none_when_location_has_no_device() {
        let registry = registry();
        let entry = resolve(&registry, DeviceKind::Lights, "garage", &DeviceId::default());
        assert!(entry.is_none());
    }
}
