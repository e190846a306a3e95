//! Routes — the logical subscriptions a command can arrive through.
//!
//! There is one route per handled device kind plus a catch-all for any other
//! device type. The catch-all acknowledges commands silently: no response, no
//! error.

use devicehub_domain::device::DeviceKind;

/// Logical subscription a command was delivered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Commands for a handled device kind.
    Device(DeviceKind),
    /// Commands for any device type without a dedicated handler.
    CatchAll,
}

impl Route {
    /// Every route the service subscribes to, most specific first.
    #[must_use]
    pub fn subscriptions() -> Vec<Self> {
        DeviceKind::ALL
            .into_iter()
            .map(Self::Device)
            .chain(std::iter::once(Self::CatchAll))
            .collect()
    }

    /// Route for a device type string taken from a topic or payload.
    #[must_use]
    pub fn for_device_type(device_type: &str) -> Self {
        device_type
            .parse::<DeviceKind>()
            .map_or(Self::CatchAll, Self::Device)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Device(kind) => write!(f, "{kind}"),
            Self::CatchAll => f.write_str("*"),
        }
    }
}
