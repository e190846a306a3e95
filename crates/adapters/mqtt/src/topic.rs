//! Topic scheme and route bookkeeping.
//!
//! ```text
//! {base}/devices/{device_type}/command   inbound requests
//! {base}/devices/response                outbound responses
//! ```
//!
//! A specific route subscribes `{base}/devices/lights/command`; the catch-all
//! subscribes `{base}/devices/+/command`. Once the catch-all is registered the
//! specific broker filters are redundant and dropped, so the broker delivers
//! each command once and [`RouteSet::route_for`] picks the most specific
//! handler.

use std::collections::BTreeSet;

use devicehub_app::routing::Route;
use devicehub_domain::device::DeviceKind;

const DEVICES: &str = "devices";
const COMMAND: &str = "command";
const RESPONSE: &str = "response";
const WILDCARD: &str = "+";

/// Builds and parses topics under a base prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    base: String,
}

impl Topics {
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// Broker filter matching commands for `route`.
    #[must_use]
    pub fn command_filter(&self, route: Route) -> String {
        let segment = match route {
            Route::Device(kind) => kind.as_str(),
            Route::CatchAll => WILDCARD,
        };
        format!("{}/{DEVICES}/{segment}/{COMMAND}", self.base)
    }

    /// Topic responses are published on.
    #[must_use]
    pub fn response(&self) -> String {
        format!("{}/{DEVICES}/{RESPONSE}", self.base)
    }

    /// Device type segment of a command topic, or `None` for anything else.
    #[must_use]
    pub fn device_type<'t>(&self, topic: &'t str) -> Option<&'t str> {
        let rest = topic.strip_prefix(self.base.as_str())?.strip_prefix('/')?;
        let rest = rest.strip_prefix(DEVICES)?.strip_prefix('/')?;
        let device_type = rest.strip_suffix(COMMAND)?.strip_suffix('/')?;
        (!device_type.is_empty() && !device_type.contains('/')).then_some(device_type)
    }
}

/// Broker subscriptions to create and remove after registering routes.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct FilterChange {
    pub(crate) added: Vec<String>,
    pub(crate) removed: Vec<String>,
}

/// Routes registered on the bus.
#[derive(Debug, Default)]
pub(crate) struct RouteSet {
    kinds: BTreeSet<DeviceKind>,
    catch_all: bool,
}

impl RouteSet {
    pub(crate) fn insert(&mut self, route: Route) {
        match route {
            Route::Device(kind) => {
                self.kinds.insert(kind);
            }
            Route::CatchAll => self.catch_all = true,
        }
    }

    /// Most specific registered route for a command on `device_type`.
    pub(crate) fn route_for(&self, device_type: &str) -> Option<Route> {
        match Route::for_device_type(device_type) {
            Route::Device(kind) if self.kinds.contains(&kind) => Some(Route::Device(kind)),
            _ if self.catch_all => Some(Route::CatchAll),
            _ => None,
        }
    }

    /// Register `routes` in one step and return the broker filters to add and
    /// to drop. Never adds a specific filter next to the wildcard.
    pub(crate) fn register(
        &mut self,
        routes: impl IntoIterator<Item = Route>,
        topics: &Topics,
    ) -> FilterChange {
        let before = self.broker_filters(topics);
        for route in routes {
            self.insert(route);
        }
        let after = self.broker_filters(topics);
        FilterChange {
            added: after.difference(&before).cloned().collect(),
            removed: before.difference(&after).cloned().collect(),
        }
    }

    /// Broker filters covering the registered routes without overlap.
    pub(crate) fn broker_filters(&self, topics: &Topics) -> BTreeSet<String> {
        if self.catch_all {
            return BTreeSet::from([topics.command_filter(Route::CatchAll)]);
        }
        self.kinds
            .iter()
            .map(|&kind| topics.command_filter(Route::Device(kind)))
            .collect()
    }
}
