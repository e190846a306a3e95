//! Command service — the request pipeline.
//!
//! resolve → apply → correlate → publish. Every routed request for a handled
//! kind produces exactly one response; catch-all requests produce none.

use std::sync::Arc;

use devicehub_domain::command::{CommandRequest, CommandResponse};
use devicehub_domain::device::DeviceKind;
use devicehub_domain::transition::{self, CommandError, Outcome};

use crate::correlator::{Target, build_response};
use crate::ports::ResponsePublisher;
use crate::registry::DeviceRegistry;
use crate::resolver::resolve;
use crate::routing::Route;

/// Application service that executes device commands.
pub struct CommandService<P> {
    registry: Arc<DeviceRegistry>,
    publisher: P,
}

impl<P: ResponsePublisher> CommandService<P> {
    /// Create a new service over a shared registry.
    pub fn new(registry: Arc<DeviceRegistry>, publisher: P) -> Self {
        Self {
            registry,
            publisher,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Handle a request delivered on `route` and publish the response.
    ///
    /// Returns the published response, or `None` for the catch-all route.
    /// A publish failure is logged and swallowed; the response is still
    /// returned.
    #[tracing::instrument(
        skip(self, route, request),
        fields(
            %route,
            correlation_id = %request.correlation_id,
            action = %request.action,
        )
    )]
    pub async fn handle(&self, route: Route, request: CommandRequest) -> Option<CommandResponse> {
        let Route::Device(kind) = route else {
            tracing::debug!(
                device_type = %request.device_type,
                "no handler for device type, acknowledging without response"
            );
            return None;
        };

        let response = self.execute(kind, &request);
        if let Err(err) = self.publisher.publish(response.clone()).await {
            tracing::warn!(%err, "failed to publish command response");
        }
        Some(response)
    }

    /// Run resolution and the transition engine, without publishing.
    #[must_use]
    pub fn execute(&self, kind: DeviceKind, request: &CommandRequest) -> CommandResponse {
        let Some(entry) = resolve(&self.registry, kind, &request.location, &request.device_id)
        else {
            let err = CommandError::not_found(kind.as_str());
            tracing::info!(
                location = %request.location,
                device_id = %request.device_id,
                "{err}"
            );
            return build_response(request, Target::unresolved(request), Outcome::failure(&err));
        };

        let result = transition::apply(&mut entry.lock(), &request.action);
        match &result {
            Ok(applied) => tracing::info!(
                device_id = %entry.id(),
                applied = applied.action.as_str(),
                state = %applied.state,
                changed = applied.changed,
                "{}",
                applied.message
            ),
            Err(err) => tracing::info!(device_id = %entry.id(), "{err}"),
        }

        build_response(
            request,
            Target::resolved(entry.kind(), entry.id()),
            Outcome::from(result),
        )
    }
}
