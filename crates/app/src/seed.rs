//! Built-in device seed used when no `[[devices]]` are configured.

use devicehub_domain::device::{Device, DeviceKind};
use devicehub_domain::error::ValidationError;

/// Three lights and one audio device, all `off` and online.
///
/// # Errors
///
/// Returns a validation error if the builder fails (should not happen with
/// hardcoded inputs).
pub fn default_devices() -> Result<Vec<Device>, ValidationError> {
    [
        ("living-room-lights", DeviceKind::Lights, "Living Room Lights", "living room"),
        ("bedroom-lights", DeviceKind::Lights, "Bedroom Lights", "bedroom"),
        ("kitchen-lights", DeviceKind::Lights, "Kitchen Lights", "kitchen"),
        ("living-room-audio", DeviceKind::Audio, "Living Room Audio", "living room"),
    ]
    .into_iter()
    .map(|(id, kind, name, location)| {
        Device::builder()
            .id(id)
            .kind(kind)
            .name(name)
            .location(location)
            .build()
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use devicehub_domain::device::DeviceState;

    #[test]
    fn should_start_every_device_off_and_online() {
        let devices = default_devices().unwrap();
        assert_eq!(devices.len(), 4);
        for device in &devices {
            assert_eq!(device.state(), DeviceState::Off);
            assert!(device.is_online());
        }
    }

    #[test]
    fn should_include_one_audio_device() {
        let devices = default_devices().unwrap();
        let audio: Vec<_> = devices
            .iter()
            .filter(|d| d.kind() == DeviceKind::Audio)
            .collect();
        assert_eq!(audio.len(), 1);
        assert_eq!(audio[0].location(), "living room");
    }
}
