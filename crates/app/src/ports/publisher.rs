//! Response port — publishes correlated command responses to the bus.

use std::future::Future;

use devicehub_domain::command::CommandResponse;
use devicehub_domain::error::HubError;

/// Publishes [`CommandResponse`]s back to whoever sent the request.
///
/// Publishing is fire-and-forget from the caller's point of view: the
/// command service logs a failure and moves on.
pub trait ResponsePublisher {
    /// Publish one response.
    fn publish(
        &self,
        response: CommandResponse,
    ) -> impl Future<Output = Result<(), HubError>> + Send;
}

impl<T: ResponsePublisher + Send + Sync> ResponsePublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        response: CommandResponse,
    ) -> impl Future<Output = Result<(), HubError>> + Send {
        (**self).publish(response)
    }
}
